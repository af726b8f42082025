use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, InvertError>;

/// Every failure is fatal to the run; `main` logs it and exits non-zero.
#[derive(thiserror::Error, Debug)]
pub enum InvertError {
    #[error("Error walking the path: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Error creating directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to open input file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to create output file {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to save {format} image {}: {source}", path.display())]
    Encode {
        format: &'static str,
        path: PathBuf,
        source: image::ImageError,
    },
}
