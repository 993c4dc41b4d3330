use crate::prelude::*;

/// Coordinate system of a snapshot, which decides the resampling path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Geometry {
    #[display(fmt = "cartesian 2D")]
    Cartesian2D,
    #[display(fmt = "cartesian 3D")]
    Cartesian3D,
    /// `(r, z, phi)` axes; 2D data has a single phi sample
    #[display(fmt = "cylindrical")]
    Cylindrical,
}

impl Geometry {
    /// interpret the geometry name and dimensionality declared by a snapshot.
    ///
    /// Returns `None` for coordinate systems this crate cannot resample
    /// (`polar`, `spherical`, ...).
    pub fn from_declared(name: &str, dimensionality: usize) -> Option<Self> {
        match (name.trim().to_ascii_lowercase().as_str(), dimensionality) {
            ("cartesian", 1 | 2) => Some(Self::Cartesian2D),
            ("cartesian", 3) => Some(Self::Cartesian3D),
            ("cylindrical", 1..=3) => Some(Self::Cylindrical),
            _ => None,
        }
    }

    pub fn is_cylindrical(self) -> bool {
        matches!(self, Self::Cylindrical)
    }
}

#[test]
fn declared_geometry_names() {
    assert_eq!(
        Geometry::from_declared("cartesian", 2),
        Some(Geometry::Cartesian2D)
    );
    assert_eq!(
        Geometry::from_declared("Cartesian", 3),
        Some(Geometry::Cartesian3D)
    );
    assert_eq!(
        Geometry::from_declared("cylindrical", 2),
        Some(Geometry::Cylindrical)
    );
    assert_eq!(Geometry::from_declared("spherical", 3), None);
}
