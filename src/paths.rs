//! Input filtering and output path derivation.

use std::fs::DirBuilder;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{InvertError, Result};

/// Extensions picked up by the walk, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Name of the directory created under the root to hold results.
pub const OUTPUT_DIR_NAME: &str = "inverted";

const OUTPUT_SUFFIX: &str = "_inverted";

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

pub fn output_dir(root: &Path) -> PathBuf {
    root.join(OUTPUT_DIR_NAME)
}

/// Source file and the path its inverted copy is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl OutputTarget {
    /// `root/inverted/<stem>_inverted.<ext>`. Subdirectories between `root`
    /// and `input` are not mirrored.
    pub fn new(root: &Path, input: &Path) -> Self {
        // Built as an OsString so non-UTF-8 stems keep their exact bytes.
        let mut file_name = input.file_stem().unwrap_or_default().to_os_string();
        file_name.push(OUTPUT_SUFFIX);
        if let Some(ext) = input.extension() {
            file_name.push(".");
            file_name.push(ext);
        }

        Self {
            input: input.to_path_buf(),
            output: output_dir(root).join(file_name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    Existing,
}

/// Make sure `root/inverted` exists, creating it (mode 0755 on Unix) if not.
pub fn ensure_output_dir(root: &Path) -> Result<(PathBuf, DirStatus)> {
    let dir = output_dir(root);
    if dir.is_dir() {
        return Ok((dir, DirStatus::Existing));
    }

    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    match builder.create(&dir) {
        Ok(()) => Ok((dir, DirStatus::Created)),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {
            Ok((dir, DirStatus::Existing))
        }
        Err(source) => Err(InvertError::CreateDir { path: dir, source }),
    }
}
