use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read model file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse model file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to open model archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        source: zip::result::ZipError,
    },
    #[error("unsupported model file: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("layer {index} ({kind}) has no unit count")]
    MissingUnits { index: usize, kind: String },
    #[error(
        "layer {index} weight matrix does not match its layers: expected {expected_rows}x{expected_cols}, found {found}"
    )]
    WeightShape {
        index: usize,
        expected_rows: usize,
        expected_cols: usize,
        found: String,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read style file {}: {source}", path.display())]
    StyleRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse style file {}: {source}", path.display())]
    StyleParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize scene: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
