//! # Mesh Information
//!
//! A [`DomainBox`] holds the physical extent of a grid in simulation length units
//! (centimetres for FLASH). It does not know how many samples lie inside it: a
//! [`DenseField`](crate::DenseField) pairs a box with an array, and the sample
//! coordinates along each axis are always derived the same way, by spacing the
//! array's sample count evenly across the box with both endpoints included.
//!
//! Putting a `DomainBox` together with a [`Geometry`] gives a full description of
//! what the grid loader produced. For cylindrical snapshots the three box axes
//! are `(r, z, phi)` rather than `(x, y, z)`; the cylindrical resampler turns
//! such a box into a Cartesian one before any uniform resampling happens.
//!
//! ## Overriding the native domain
//!
//! A [`DomainOverride`] replaces the lower corner of the box that is requested
//! from the snapshot, and optionally the upper corner too. When the upper corner
//! is left out the snapshot's native right edge is used.

mod domain;
mod geometry;

pub use domain::{DomainBox, DomainOverride};
pub use geometry::Geometry;
