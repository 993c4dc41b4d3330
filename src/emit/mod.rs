//! [`MeshSink`] implementations.
//!
//! Both sinks buffer their records in memory and only touch the filesystem in
//! [`MeshSink::flush`]. The container is first written to `<file>.partial`,
//! synced, and then renamed onto its final name, so a failed or abandoned
//! conversion never leaves a complete looking file behind.

mod openpmd;
mod write_vtk;

pub use openpmd::{read_mesh_record, OpenPmdJson};
pub use write_vtk::{write_vtk, Encoding, Precision, VtkRectilinear};

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{self, EmitFailure};
use crate::{Error, MeshSink};

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// build the sink selected by an output configuration
pub fn open_sink(output: &OutputConfig) -> Box<dyn MeshSink> {
    let path = output.path();

    match output.format {
        OutputFormat::OpenpmdJson => {
            let mut sink = OpenPmdJson::create(path);
            if let Some(author) = &output.author {
                sink = sink.with_author(author);
            }
            Box::new(sink)
        }
        OutputFormat::VtkAscii => Box::new(VtkRectilinear::create(path, Encoding::Ascii)),
        OutputFormat::VtkBase64 => Box::new(VtkRectilinear::create(path, Encoding::Base64)),
    }
}

/// `<path>.partial`, the name a container is written under before it is complete
pub(crate) fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Write `path` through a partial file that is renamed once `write` succeeded.
///
/// On any failure the partial file is removed and the destination is left
/// untouched.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<(), Error>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), EmitFailure>,
{
    let partial = partial_path(path);

    match write_partial(path, &partial, write) {
        Ok(()) => Ok(()),
        Err(failure) => {
            // the partial file may not exist if creating it was what failed
            let _ = fs::remove_file(&partial);
            Err(error::Emit::new(path, failure).into())
        }
    }
}

fn write_partial<F>(path: &Path, partial: &Path, write: F) -> Result<(), EmitFailure>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), EmitFailure>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(partial)?);
    write(&mut writer)?;
    writer.flush()?;

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    fs::rename(partial, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_sits_next_to_destination() {
        let path = Path::new("output").join("laser.json");
        assert_eq!(partial_path(&path), Path::new("output").join("laser.json.partial"));
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");

        let err = write_atomically(&path, |writer| {
            writer.write_all(b"{ half a docum")?;
            Err(EmitFailure::Empty)
        })
        .unwrap_err();

        assert!(matches!(err, Error::Emit(_)));
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn successful_write_is_renamed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ok.txt");

        write_atomically(&path, |writer| Ok(writer.write_all(b"done")?)).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "done");
        assert!(!partial_path(&path).exists());
    }
}
