//! On-disk cache for the rendered summary image.
//!
//! There is exactly one cached file, `<dir>/summary.png`. Each write goes to
//! its own uniquely named temporary file in the same directory and is then
//! renamed into place, so readers never see a partially written image and
//! overlapping writers never share a temp file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// File name of the cached image inside the cache directory.
pub const SUMMARY_IMAGE_FILE: &str = "summary.png";

/// Location of the cached summary image.
#[derive(Debug, Clone)]
pub struct SummaryImageCache {
    dir: PathBuf,
}

impl SummaryImageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path of the cached image.
    pub fn path(&self) -> PathBuf {
        self.dir.join(SUMMARY_IMAGE_FILE)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Replace the cached image with `bytes`, creating the directory if
    /// needed. Returns the final path.
    pub async fn write(&self, bytes: Vec<u8>) -> io::Result<PathBuf> {
        let dir = self.dir.clone();
        let final_path = self.path();

        tokio::task::spawn_blocking(move || -> io::Result<PathBuf> {
            std::fs::create_dir_all(&dir)?;

            let mut temp = NamedTempFile::new_in(&dir)?;
            temp.write_all(&bytes)?;
            temp.as_file().sync_all()?;
            temp.persist(&final_path).map_err(|e| e.error)?;

            Ok(final_path)
        })
        .await
        .map_err(io::Error::other)?
    }

    /// Read the cached image, or `None` if it has never been generated.
    pub async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path()).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
