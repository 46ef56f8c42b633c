use std::path::{Path, PathBuf};

/// Archive extracted when nothing else is configured
pub const DEFAULT_ARCHIVE_PATH: &str = "A47/A203.zip";

/// Destination used when nothing else is configured
pub const DEFAULT_DESTINATION: &str = ".";

/// Where to read the archive from and where to put its contents.
///
/// Relative paths resolve against the process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    pub archive_path: PathBuf,
    pub destination: PathBuf,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            destination: PathBuf::from(DEFAULT_DESTINATION),
        }
    }
}

impl ExtractConfig {
    pub fn with_archive_path(mut self, path: impl AsRef<Path>) -> Self {
        self.archive_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_destination(mut self, path: impl AsRef<Path>) -> Self {
        self.destination = path.as_ref().to_path_buf();
        self
    }
}
