//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures,
//! reading from any source that implements the [`ReadAt`] trait.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the file's end
//! 2. If ZIP64, read the ZIP64 EOCD for large file support
//! 3. Read the Central Directory to get metadata for all files
//! 4. For extraction, read each file's Local File Header and data
//!
//! Archives with bytes prepended to them (self-extracting stubs and the
//! like) are handled by measuring the gap between where the central
//! directory claims to end and where the end record actually sits, and
//! shifting every recorded offset by that amount.

use byteorder::{LittleEndian, ReadBytesExt};
use codepage_437::{CP437_CONTROL, FromCp437};
use std::io::{self, Cursor, Read};

use crate::error::{ExtractError, Result};
use crate::io::ReadAt;

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: u64 = 65535;

/// Extra field id of the ZIP64 extended information block
const ZIP64_EXTRA_ID: u16 = 0x0001;

/// Location of the central directory after resolving ZIP64 and prefix data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralDirectory {
    /// Absolute offset of the first central directory header
    pub offset: u64,
    pub size: u64,
    pub total_entries: u64,
    /// Bytes found in front of the archive proper
    pub prefix_len: u64,
}

/// Low-level ZIP file parser.
///
/// Owns its data source; dropping the parser releases it.
///
/// ## Example
///
/// ```ignore
/// let parser = ZipParser::new(reader);
/// let entries = parser.list_files().await?;
/// for entry in entries {
///     let offset = parser.get_data_offset(&entry).await?;
///     // Read file data from offset...
/// }
/// ```
pub struct ZipParser<R: ReadAt> {
    /// The underlying data source
    reader: R,
    /// Total size of the archive in bytes
    size: u64,
}

impl<R: ReadAt> ZipParser<R> {
    pub fn new(reader: R) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// Tries the common no-comment layout first, then searches backwards
    /// across a possible archive comment. A record whose comment length
    /// accounts for every trailing byte is preferred; failing that, the last
    /// complete record wins, which tolerates padding appended after the archive.
    ///
    /// # Returns
    ///
    /// A tuple of (EOCD record, offset of EOCD in file).
    pub async fn find_eocd(&self) -> Result<(EndOfCentralDirectory, u64)> {
        if self.size < EndOfCentralDirectory::SIZE as u64 {
            return Err(ExtractError::format("file is not a zip file"));
        }

        let offset = self.size - EndOfCentralDirectory::SIZE as u64;
        let mut buf = vec![0u8; EndOfCentralDirectory::SIZE];
        self.reader.read_exact_at(offset, &mut buf).await?;

        // Signature plus zero-length comment
        if &buf[0..4] == EndOfCentralDirectory::SIGNATURE && &buf[20..22] == b"\x00\x00" {
            let eocd = EndOfCentralDirectory::from_bytes(&buf)?;
            return Ok((eocd, offset));
        }

        let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE as u64).min(self.size);
        let search_start = self.size - search_size;

        let mut buf = vec![0u8; search_size as usize];
        self.reader.read_exact_at(search_start, &mut buf).await?;

        let mut last_record = None;
        for i in (0..=buf.len() - EndOfCentralDirectory::SIZE).rev() {
            if &buf[i..i + 4] != EndOfCentralDirectory::SIGNATURE {
                continue;
            }
            let eocd = EndOfCentralDirectory::from_bytes(&buf[i..i + EndOfCentralDirectory::SIZE])?;
            let trailing = buf.len() - i - EndOfCentralDirectory::SIZE;
            if eocd.comment_len as usize == trailing {
                return Ok((eocd, search_start + i as u64));
            }
            if last_record.is_none() {
                last_record = Some((eocd, search_start + i as u64));
            }
        }

        last_record.ok_or_else(|| ExtractError::format("file is not a zip file"))
    }

    /// Read the ZIP64 End of Central Directory record.
    ///
    /// The locator sits immediately before the regular EOCD and the ZIP64
    /// record immediately before the locator.
    ///
    /// # Returns
    ///
    /// The parsed record and its actual offset in the file.
    pub async fn read_zip64_eocd(&self, eocd_offset: u64) -> Result<(Zip64EOCD, u64)> {
        let record_offset = eocd_offset
            .checked_sub((Zip64EOCDLocator::SIZE + Zip64EOCD::MIN_SIZE) as u64)
            .ok_or_else(|| ExtractError::format("missing ZIP64 end of central directory"))?;
        let locator_offset = record_offset + Zip64EOCD::MIN_SIZE as u64;

        let mut locator_buf = vec![0u8; Zip64EOCDLocator::SIZE];
        self.reader
            .read_exact_at(locator_offset, &mut locator_buf)
            .await?;
        let locator = Zip64EOCDLocator::from_bytes(&locator_buf)?;

        if locator.disk_with_eocd64 != 0 || locator.total_disks > 1 {
            return Err(ExtractError::format("zipfiles that span multiple disks are not supported"));
        }

        let mut eocd64_buf = vec![0u8; Zip64EOCD::MIN_SIZE];
        self.reader
            .read_exact_at(record_offset, &mut eocd64_buf)
            .await?;

        Ok((Zip64EOCD::from_bytes(&eocd64_buf)?, record_offset))
    }

    /// Resolve where the central directory lives.
    pub async fn central_directory(&self) -> Result<CentralDirectory> {
        let (eocd, eocd_offset) = self.find_eocd().await?;

        if eocd.disk_number != eocd.disk_with_cd || eocd.disk_entries != eocd.total_entries {
            return Err(ExtractError::format("zipfiles that span multiple disks are not supported"));
        }

        let (cd_offset, cd_size, total_entries, end_offset) = if eocd.is_zip64() {
            let (eocd64, record_offset) = self.read_zip64_eocd(eocd_offset).await?;
            if eocd64.disk_number != eocd64.disk_with_cd
                || eocd64.disk_entries != eocd64.total_entries
            {
                return Err(ExtractError::format(
                    "zipfiles that span multiple disks are not supported",
                ));
            }
            (
                eocd64.cd_offset,
                eocd64.cd_size,
                eocd64.total_entries,
                record_offset,
            )
        } else {
            (
                eocd.cd_offset as u64,
                eocd.cd_size as u64,
                eocd.total_entries as u64,
                eocd_offset,
            )
        };

        let cd_end = cd_offset
            .checked_add(cd_size)
            .filter(|end| *end <= end_offset)
            .ok_or_else(|| ExtractError::format("central directory extends past end record"))?;
        let prefix_len = end_offset - cd_end;

        Ok(CentralDirectory {
            offset: cd_offset + prefix_len,
            size: cd_size,
            total_entries,
            prefix_len,
        })
    }

    /// List all entries in the archive, in central directory order.
    ///
    /// The whole central directory is read and parsed up front, so a
    /// malformed archive is rejected before anything is extracted.
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let cd = self.central_directory().await?;

        let mut cd_data = vec![0u8; cd.size as usize];
        self.reader.read_exact_at(cd.offset, &mut cd_data).await?;

        let capacity = cd.total_entries.min(cd.size / CDFH_MIN_SIZE as u64) as usize;
        let mut entries = Vec::with_capacity(capacity);
        let mut cursor = Cursor::new(cd_data.as_slice());

        for _ in 0..cd.total_entries {
            let mut entry = Self::parse_cdfh(&mut cursor)?;
            entry.lfh_offset += cd.prefix_len;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Parse one Central Directory File Header, mapping truncation to a format error.
    fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry> {
        Self::read_cdfh(cursor).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => ExtractError::format("truncated central directory"),
            _ => ExtractError::format(e.to_string()),
        })
    }

    fn read_cdfh(cursor: &mut Cursor<&[u8]>) -> io::Result<ZipFileEntry> {
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        if sig != CDFH_SIGNATURE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "bad magic number for central directory",
            ));
        }

        let _version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let _last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let _last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let mut compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let mut uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let _external_attrs = cursor.read_u32::<LittleEndian>()?;
        let mut lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

        let mut raw_name = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut raw_name)?;

        // Names stop at the first NUL byte
        let visible = raw_name
            .iter()
            .position(|&b| b == 0)
            .map_or(raw_name.as_slice(), |nul| &raw_name[..nul]);
        let file_name = if flags & FLAG_UTF8 != 0 {
            String::from_utf8_lossy(visible).into_owned()
        } else {
            String::from_cp437(visible.to_vec(), &CP437_CONTROL)
        };
        let is_directory = file_name.ends_with('/');

        let mut extra = vec![0u8; extra_field_length as usize];
        cursor.read_exact(&mut extra)?;
        let mut extra = Cursor::new(extra.as_slice());
        let extra_end = extra_field_length as u64;

        while extra.position() + 4 <= extra_end {
            let header_id = extra.read_u16::<LittleEndian>()?;
            let field_size = extra.read_u16::<LittleEndian>()? as u64;
            let field_end = extra.position() + field_size;

            if header_id == ZIP64_EXTRA_ID {
                // Present only for header fields saturated at 0xFFFFFFFF, in this order
                if uncompressed_size == 0xFFFFFFFF {
                    uncompressed_size = extra.read_u64::<LittleEndian>()?;
                }
                if compressed_size == 0xFFFFFFFF {
                    compressed_size = extra.read_u64::<LittleEndian>()?;
                }
                if lfh_offset == 0xFFFFFFFF {
                    lfh_offset = extra.read_u64::<LittleEndian>()?;
                }
                if extra.position() > field_end {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "corrupt ZIP64 extra field",
                    ));
                }
            }
            extra.set_position(field_end);
        }

        cursor.set_position(cursor.position() + file_comment_length as u64);

        Ok(ZipFileEntry {
            file_name,
            raw_name,
            compression_method: CompressionMethod::from_u16(compression_method),
            flags,
            compressed_size,
            uncompressed_size,
            crc32,
            lfh_offset,
            is_directory,
        })
    }

    /// Get the offset where an entry's compressed data begins.
    ///
    /// The Local File Header repeats the name and carries its own extra
    /// field, so its length has to be read from the header itself. The
    /// stored name must match the central directory's.
    pub async fn get_data_offset(&self, entry: &ZipFileEntry) -> Result<u64> {
        let mut lfh_buf = vec![0u8; LFH_SIZE];
        self.reader.read_exact_at(entry.lfh_offset, &mut lfh_buf).await?;

        if &lfh_buf[0..4] != LFH_SIGNATURE {
            return Err(ExtractError::format(format!(
                "bad magic number for file header of {}",
                entry.file_name
            )));
        }

        let file_name_length = u16::from_le_bytes([lfh_buf[26], lfh_buf[27]]) as u64;
        let extra_field_length = u16::from_le_bytes([lfh_buf[28], lfh_buf[29]]) as u64;

        let mut name = vec![0u8; file_name_length as usize];
        self.reader
            .read_exact_at(entry.lfh_offset + LFH_SIZE as u64, &mut name)
            .await?;
        if name != entry.raw_name {
            return Err(ExtractError::format(format!(
                "file name in directory {:?} and header {:?} differ",
                entry.file_name,
                String::from_utf8_lossy(&name)
            )));
        }

        let data_offset =
            entry.lfh_offset + LFH_SIZE as u64 + file_name_length + extra_field_length;

        let data_end = data_offset.checked_add(entry.compressed_size);
        if data_end.is_none_or(|end| end > self.size) {
            return Err(ExtractError::format(format!(
                "data for {} extends past end of archive",
                entry.file_name
            )));
        }

        Ok(data_offset)
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }
}
