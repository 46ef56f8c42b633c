use tracing::info;

use crate::config::ExtractConfig;
use crate::error::Result;
use crate::zip::{ExtractSummary, ZipArchive};

/// Line printed to stdout after a successful run
pub const COMPLETION_MESSAGE: &str = "Extraction complete";

/// Unpacks the configured archive into the configured destination
pub struct Extractor {
    config: ExtractConfig,
}

impl Extractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Open the archive, write every entry, and release the archive.
    ///
    /// The archive handle is dropped on every return path. Errors are
    /// returned as-is; nothing already written is rolled back.
    pub async fn run(&self) -> Result<ExtractSummary> {
        let archive = ZipArchive::open(&self.config.archive_path).await?;
        info!(
            entries = archive.len(),
            destination = %self.config.destination.display(),
            "extracting archive"
        );
        archive.extract_all(&self.config.destination).await
    }
}
