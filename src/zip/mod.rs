//! ZIP archive parsing and extraction.
//!
//! - [`structures`]: on-disk records (EOCD, ZIP64 records, entry metadata)
//! - [`parser`]: locating and decoding those records from a [`ReadAt`](crate::io::ReadAt) source
//! - [`archive`]: the archive handle that decompresses entries to disk
//! - [`path`]: mapping entry names onto destination paths
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for files > 4GB
//! - Archive comments and prepended data
//! - STORED (no compression) and DEFLATE compression methods
//! - CRC-32 verification of every extracted entry
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

mod archive;
mod parser;
mod path;
mod structures;

pub use archive::{ExtractSummary, ZipArchive};
pub use parser::{CentralDirectory, ZipParser};
pub use path::{entry_relative_path, windows_component};
pub use structures::*;
