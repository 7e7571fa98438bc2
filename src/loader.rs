use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{LayerDescriptor, ModelDocument};

/// Member of a `.keras` archive holding the architecture JSON.
const KERAS_CONFIG_MEMBER: &str = "config.json";

/// Turns a model file into an ordered list of layer descriptors.
pub trait ModelLoader {
    fn load(&self, path: &Path) -> Result<Vec<LayerDescriptor>>;

    /// Lower-case file extensions this loader accepts.
    fn extensions(&self) -> &[&str];

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
    }
}

/// Reads native or Keras-architecture JSON, and `.keras` archives.
///
/// A `.keras` file is a zip whose `config.json` is the architecture; the
/// weights live in an HDF5 member and are not read.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileModelLoader;

impl FileModelLoader {
    fn read_text(path: &Path) -> Result<String> {
        let is_archive = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("keras"));
        if !is_archive {
            return std::fs::read_to_string(path).map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            });
        }

        let file = std::fs::File::open(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let archive_err = |source| Error::Archive {
            path: path.to_path_buf(),
            source,
        };
        let mut archive = zip::ZipArchive::new(file).map_err(archive_err)?;
        let mut member = archive.by_name(KERAS_CONFIG_MEMBER).map_err(archive_err)?;
        let mut text = String::new();
        member
            .read_to_string(&mut text)
            .map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(text)
    }
}

impl ModelLoader for FileModelLoader {
    fn load(&self, path: &Path) -> Result<Vec<LayerDescriptor>> {
        if !self.accepts(path) {
            return Err(Error::UnsupportedFormat(path.to_path_buf()));
        }
        let text = Self::read_text(path)?;
        let document = ModelDocument::from_json_str(&text).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            name = document.name().unwrap_or("<unnamed>"),
            "parsed model document"
        );
        document.into_descriptors()
    }

    fn extensions(&self) -> &[&str] {
        &["json", "keras"]
    }
}
