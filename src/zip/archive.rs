use flate2::read::DeflateDecoder;
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{ExtractError, Result};
use crate::io::{LocalFileReader, ReadAt};

use super::parser::ZipParser;
use super::path::entry_relative_path;
use super::structures::{CompressionMethod, ZipFileEntry};

/// Upper bound on buffer space reserved up front from a recorded entry size
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// Totals for one extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

/// An open zip archive.
///
/// Owns its data source exclusively. The central directory is read when
/// the archive is opened; [`extract_all`](Self::extract_all) consumes the
/// handle so the source is released as soon as extraction ends.
pub struct ZipArchive<R: ReadAt> {
    parser: ZipParser<R>,
    entries: Vec<ZipFileEntry>,
}

impl ZipArchive<LocalFileReader> {
    /// Open the archive file at `path` and read its central directory
    pub async fn open(path: &Path) -> Result<Self> {
        let reader = LocalFileReader::new(path)?;
        info!(path = %reader.path().display(), size = reader.size(), "opened archive");
        Self::new(reader).await
    }
}

impl<R: ReadAt> ZipArchive<R> {
    pub async fn new(reader: R) -> Result<Self> {
        let parser = ZipParser::new(reader);
        let entries = parser.list_files().await?;
        debug!(entries = entries.len(), "read central directory");
        Ok(Self { parser, entries })
    }

    /// Entries in central directory order
    pub fn entries(&self) -> &[ZipFileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decompress an entry into memory, checking its size and CRC-32
    pub async fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        if entry.is_encrypted() {
            return Err(ExtractError::format(format!(
                "{} is encrypted, password required for extraction",
                entry.file_name
            )));
        }

        if let CompressionMethod::Unknown(method) = entry.compression_method {
            return Err(ExtractError::UnsupportedMethod {
                name: entry.file_name.clone(),
                method,
            });
        }

        let data_offset = self.parser.get_data_offset(entry).await?;

        let mut compressed = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut compressed)
            .await?;

        let data = match entry.compression_method {
            CompressionMethod::Deflate => inflate(&compressed, entry)?,
            _ => compressed,
        };

        if data.len() as u64 != entry.uncompressed_size {
            return Err(ExtractError::format(format!(
                "size mismatch for {}: expected {} bytes, got {}",
                entry.file_name,
                entry.uncompressed_size,
                data.len()
            )));
        }

        if crc32fast::hash(&data) != entry.crc32 {
            return Err(ExtractError::format(format!(
                "bad CRC-32 for file {}",
                entry.file_name
            )));
        }

        Ok(data)
    }

    /// Extract one file entry to `output_path`, creating parent directories.
    ///
    /// Existing files are truncated and overwritten.
    pub async fn extract_to_file(&self, entry: &ZipFileEntry, output_path: &Path) -> Result<u64> {
        let data = self.extract_to_memory(entry).await?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ExtractError::from_io(parent, e))?;
            }
        }

        fs::write(output_path, &data)
            .await
            .map_err(|e| ExtractError::from_io(output_path, e))?;

        Ok(data.len() as u64)
    }

    /// Extract every entry under `destination`, preserving relative paths.
    ///
    /// An entry whose name maps to no path targets `destination` itself: a
    /// directory entry is then a no-op, a file entry fails to open it.
    /// Stops at the first failure; entries written before it stay on disk.
    pub async fn extract_all(self, destination: &Path) -> Result<ExtractSummary> {
        let mut summary = ExtractSummary::default();

        for entry in &self.entries {
            let target: PathBuf = match entry_relative_path(&entry.file_name) {
                Some(relative) => destination.join(relative),
                None => destination.to_path_buf(),
            };

            if entry.is_directory {
                debug!(path = %target.display(), "creating directory");
                fs::create_dir_all(&target)
                    .await
                    .map_err(|e| ExtractError::from_io(&target, e))?;
                summary.directories += 1;
            } else {
                debug!(
                    name = %entry.file_name,
                    size = entry.uncompressed_size,
                    "extracting"
                );
                summary.bytes += self.extract_to_file(entry, &target).await?;
                summary.files += 1;
            }
        }

        info!(
            files = summary.files,
            directories = summary.directories,
            bytes = summary.bytes,
            "extraction finished"
        );

        Ok(summary)
    }
}

fn inflate(compressed: &[u8], entry: &ZipFileEntry) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(entry.uncompressed_size.min(MAX_PREALLOC) as usize);
    // One byte past the recorded size is enough to detect an overlong stream
    DeflateDecoder::new(compressed)
        .take(entry.uncompressed_size.saturating_add(1))
        .read_to_end(&mut out)
        .map_err(|e| {
            ExtractError::format(format!("error decompressing {}: {}", entry.file_name, e))
        })?;
    Ok(out)
}
