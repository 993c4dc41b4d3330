use super::write_atomically;
use crate::array::MeshRecord;
use crate::error::{self, EmitFailure};
use crate::prelude::*;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;
use std::path::{Path, PathBuf};

/// the encoding to use when writing an inline dataarray
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    Base64,
}

impl Encoding {
    fn to_str(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Base64 => "binary",
        }
    }
}

/// numeric type of a `DataArray` as VTK names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Precision {
    #[display(fmt = "Float32")]
    Float32,
    #[display(fmt = "Float64")]
    Float64,
}

/// floats that can be written into a `DataArray`
pub(crate) trait Numeric: ryu::Float {
    const PRECISION: Precision;

    fn extend_le_bytes(self, bytes: &mut Vec<u8>);
}

impl Numeric for f32 {
    const PRECISION: Precision = Precision::Float32;

    fn extend_le_bytes(self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_le_bytes());
    }
}

impl Numeric for f64 {
    const PRECISION: Precision = Precision::Float64;

    fn extend_le_bytes(self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_le_bytes());
    }
}

/// Mesh records written as a VTK XML `RectilinearGrid` (`.vtr`) for a quick look
/// in ParaView.
///
/// Every record becomes a point data array of the same grid, so all records
/// stored in one file must share shape, spacing and offset.
#[derive(Debug)]
pub struct VtkRectilinear {
    path: PathBuf,
    encoding: Encoding,
    records: Vec<MeshRecord>,
    flushed: bool,
}

impl VtkRectilinear {
    pub fn create<P: Into<PathBuf>>(path: P, encoding: Encoding) -> Self {
        Self {
            path: path.into(),
            encoding,
            records: Vec::new(),
            flushed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fail<T: Into<EmitFailure>>(&self, failure: T) -> Error {
        error::Emit::new(&self.path, failure).into()
    }
}

impl MeshSink for VtkRectilinear {
    fn store(&mut self, record: MeshRecord) -> Result<(), Error> {
        if self.flushed {
            return Err(self.fail(EmitFailure::AlreadyFlushed));
        }

        if self.records.iter().any(|r| r.name() == record.name()) {
            return Err(self.fail(EmitFailure::DuplicateRecord(record.name().to_string())));
        }

        if let Some(first) = self.records.first() {
            let same_grid = first.shape() == record.shape()
                && first.grid_spacing() == record.grid_spacing()
                && first.grid_global_offset() == record.grid_global_offset();

            if !same_grid {
                return Err(self.fail(EmitFailure::GridMismatch(record.name().to_string())));
            }
        }

        self.records.push(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<PathBuf, Error> {
        if self.flushed {
            return Err(self.fail(EmitFailure::AlreadyFlushed));
        }

        if self.records.is_empty() {
            return Err(self.fail(EmitFailure::Empty));
        }

        let (records, encoding) = (&self.records, self.encoding);
        write_atomically(&self.path, |writer| write_vtk(writer, records, encoding))?;

        self.flushed = true;
        info!(path = %self.path.display(), ?encoding, "wrote vtk rectilinear grid");

        Ok(self.path.clone())
    }
}

/// Write records sharing one grid to a `Write`r as a VTK rectilinear grid.
///
/// The coordinate arrays are `Float64`, the point data arrays `Float32`, with x
/// varying fastest the way VTK orders points.
pub fn write_vtk<W: Write>(
    writer: W,
    records: &[MeshRecord],
    encoding: Encoding,
) -> Result<(), EmitFailure> {
    let first = records.first().ok_or(EmitFailure::Empty)?;
    let mut writer = Writer::new(writer);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer.write_event(Event::Start(BytesStart::new("VTKFile").with_attributes([
        ("type", "RectilinearGrid"),
        ("version", "1.0"),
        ("byte_order", "LittleEndian"),
        ("header_type", "UInt64"),
    ])))?;

    // output the spans
    let [nz, ny, nx] = first.shape();
    let extent = format!(
        "0 {} 0 {} 0 {}",
        nx.saturating_sub(1),
        ny.saturating_sub(1),
        nz.saturating_sub(1)
    );

    writer.write_event(Event::Start(
        BytesStart::new("RectilinearGrid").with_attributes([("WholeExtent", extent.as_str())]),
    ))?;
    writer.write_event(Event::Start(
        BytesStart::new("Piece").with_attributes([("Extent", extent.as_str())]),
    ))?;

    writer.write_event(Event::Start(BytesStart::new("Coordinates")))?;
    // stored axis order is z, y, x
    write_inline_array(&mut writer, "X", first.coordinates(2), encoding)?;
    write_inline_array(&mut writer, "Y", first.coordinates(1), encoding)?;
    write_inline_array(&mut writer, "Z", first.coordinates(0), encoding)?;
    writer.write_event(Event::End(BytesEnd::new("Coordinates")))?;

    writer.write_event(Event::Start(
        BytesStart::new("PointData").with_attributes([("Scalars", first.name())]),
    ))?;
    for record in records {
        write_inline_array(&mut writer, record.name(), record.values().iter().copied(), encoding)?;
    }
    writer.write_event(Event::End(BytesEnd::new("PointData")))?;

    writer.write_event(Event::End(BytesEnd::new("Piece")))?;
    writer.write_event(Event::End(BytesEnd::new("RectilinearGrid")))?;
    writer.write_event(Event::End(BytesEnd::new("VTKFile")))?;

    Ok(())
}

/// write a single (inline) array of data such as the `X` coordinates or a density
pub(crate) fn write_inline_array<W, I, N>(
    writer: &mut Writer<W>,
    name: &str,
    values: I,
    encoding: Encoding,
) -> Result<(), EmitFailure>
where
    W: Write,
    I: IntoIterator<Item = N>,
    N: Numeric,
{
    let precision = N::PRECISION.to_string();

    writer.write_event(Event::Start(BytesStart::new("DataArray").with_attributes([
        ("type", precision.as_str()),
        ("NumberOfComponents", "1"),
        ("Name", name),
        ("format", encoding.to_str()),
    ])))?;

    let data = match encoding {
        Encoding::Ascii => {
            let mut buffer = ryu::Buffer::new();
            let mut text = String::new();

            for value in values {
                text.push_str(buffer.format(value));
                text.push(' ');
            }

            text
        }
        Encoding::Base64 => {
            let mut bytes = Vec::new();
            values
                .into_iter()
                .for_each(|value| value.extend_le_bytes(&mut bytes));

            // inline binary data is prefixed by its length in bytes
            let mut encoded = Vec::with_capacity(bytes.len() + 8);
            encoded.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
            encoded.extend_from_slice(&bytes);

            base64::encode(encoded)
        }
    };

    writer.write_event(Event::Text(BytesText::new(&data)))?;
    writer.write_event(Event::End(BytesEnd::new("DataArray")))?;

    Ok(())
}
