//! Results directory on local disk.
//!
//! Plain create-or-truncate writes, no temp file and rename: a crash in the
//! middle of a write can leave a truncated result behind.

use crate::error::IngestError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default results directory, relative to the working directory.
pub const DEFAULT_RESULTS_DIR: &str = "results";

#[cfg(unix)]
const DIR_MODE: u32 = 0o755;
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Directory that accepted results are written into.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory and any missing parents.
    ///
    /// Succeeds if the directory already exists, including when another
    /// request created it concurrently.
    pub fn ensure_dir(&self) -> Result<(), IngestError> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(DIR_MODE);
        }
        builder
            .create(&self.dir)
            .map_err(|source| IngestError::CreateDir {
                path: self.dir.clone(),
                source,
            })
    }

    /// Create or truncate `path` and write all of `bytes` to it.
    pub fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), IngestError> {
        let wrap = |source: std::io::Error| IngestError::WriteFile {
            path: path.to_path_buf(),
            source,
        };

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(FILE_MODE);
        }
        let mut file = options.open(path).map_err(wrap)?;
        file.write_all(bytes).map_err(wrap)?;
        Ok(())
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new(DEFAULT_RESULTS_DIR)
    }
}
