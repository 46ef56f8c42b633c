//! # a203-extract
//!
//! Unpacks the zip archive at `A47/A203.zip` into the current directory.
//!
//! The archive is read through the [`ReadAt`] trait: the end of central
//! directory record is located first, then the whole central directory is
//! parsed, and only then are entries decompressed and written. A malformed
//! archive is therefore rejected before anything touches the destination.
//!
//! ## Features
//!
//! - STORED and DEFLATE entries, verified against their CRC-32
//! - ZIP64 archives, archive comments and prepended data
//! - Entry names mapped so `..`, `.` and absolute prefixes never leave the destination
//!
//! ## Example
//!
//! ```no_run
//! use a203_extract::{ExtractConfig, Extractor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ExtractConfig::default().with_destination("out");
//!     let summary = Extractor::new(config).run().await?;
//!     println!("{} files", summary.files);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod io;
pub mod zip;

#[cfg(test)]
mod test_helpers;

pub use cli::Cli;
pub use config::ExtractConfig;
pub use error::{ErrorKind, ExtractError, Result};
pub use extractor::{COMPLETION_MESSAGE, Extractor};
pub use crate::io::{LocalFileReader, MemoryReader, ReadAt};
pub use crate::zip::{ExtractSummary, ZipArchive, ZipFileEntry};
