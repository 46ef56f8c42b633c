//! Fixture archives for unit tests.

use std::io::{Cursor, Write};

use ::zip::write::FileOptions;
use byteorder::{LittleEndian, WriteBytesExt};
use ::zip::{CompressionMethod, ZipWriter};

pub enum FixtureEntry<'a> {
    Dir(&'a str),
    File {
        name: &'a str,
        content: &'a [u8],
        method: CompressionMethod,
    },
}

impl<'a> FixtureEntry<'a> {
    pub fn dir(name: &'a str) -> Self {
        FixtureEntry::Dir(name)
    }

    pub fn stored(name: &'a str, content: &'a [u8]) -> Self {
        FixtureEntry::File {
            name,
            content,
            method: CompressionMethod::Stored,
        }
    }

    pub fn deflated(name: &'a str, content: &'a [u8]) -> Self {
        FixtureEntry::File {
            name,
            content,
            method: CompressionMethod::Deflated,
        }
    }
}

/// Build a zip archive in memory
pub fn build_zip(entries: &[FixtureEntry]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        match entry {
            FixtureEntry::Dir(name) => {
                writer.add_directory(*name, FileOptions::default()).unwrap();
            }
            FixtureEntry::File {
                name,
                content,
                method,
            } => {
                let options = FileOptions::default().compression_method(*method);
                writer.start_file(*name, options).unwrap();
                writer.write_all(content).unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Replace every occurrence of `from` with the same-length `to`, in local and central headers alike
pub fn patch_all(data: &mut [u8], from: &[u8], to: &[u8]) {
    assert_eq!(from.len(), to.len());
    let mut i = 0;
    while i + from.len() <= data.len() {
        if &data[i..i + from.len()] == from {
            data[i..i + from.len()].copy_from_slice(to);
            i += from.len();
        } else {
            i += 1;
        }
    }
}

/// Build a single-entry STORED archive that uses every ZIP64 record:
/// saturated sizes and offset in both headers, a ZIP64 extra field,
/// the ZIP64 end record and its locator.
pub fn build_zip64_stored(name: &str, content: &[u8]) -> Vec<u8> {
    let crc = crc32fast::hash(content);
    let size = content.len() as u64;
    let mut out = Vec::new();

    // Local file header with a ZIP64 extra carrying both sizes
    out.extend_from_slice(b"PK\x03\x04");
    out.write_u16::<LittleEndian>(45).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(crc).unwrap();
    out.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
    out.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
    out.write_u16::<LittleEndian>(name.len() as u16).unwrap();
    out.write_u16::<LittleEndian>(20).unwrap();
    out.extend_from_slice(name.as_bytes());
    out.write_u16::<LittleEndian>(0x0001).unwrap();
    out.write_u16::<LittleEndian>(16).unwrap();
    out.write_u64::<LittleEndian>(size).unwrap();
    out.write_u64::<LittleEndian>(size).unwrap();
    out.extend_from_slice(content);

    // Central directory header, sizes and offset all deferred to the extra field
    let cd_offset = out.len() as u64;
    out.extend_from_slice(b"PK\x01\x02");
    out.write_u16::<LittleEndian>(45).unwrap();
    out.write_u16::<LittleEndian>(45).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(crc).unwrap();
    out.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
    out.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
    out.write_u16::<LittleEndian>(name.len() as u16).unwrap();
    out.write_u16::<LittleEndian>(28).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
    out.extend_from_slice(name.as_bytes());
    out.write_u16::<LittleEndian>(0x0001).unwrap();
    out.write_u16::<LittleEndian>(24).unwrap();
    out.write_u64::<LittleEndian>(size).unwrap();
    out.write_u64::<LittleEndian>(size).unwrap();
    out.write_u64::<LittleEndian>(0).unwrap();
    let cd_size = out.len() as u64 - cd_offset;

    // ZIP64 end of central directory record
    let eocd64_offset = out.len() as u64;
    out.extend_from_slice(b"PK\x06\x06");
    out.write_u64::<LittleEndian>(44).unwrap();
    out.write_u16::<LittleEndian>(45).unwrap();
    out.write_u16::<LittleEndian>(45).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u64::<LittleEndian>(1).unwrap();
    out.write_u64::<LittleEndian>(1).unwrap();
    out.write_u64::<LittleEndian>(cd_size).unwrap();
    out.write_u64::<LittleEndian>(cd_offset).unwrap();

    // ZIP64 locator
    out.extend_from_slice(b"PK\x06\x07");
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u64::<LittleEndian>(eocd64_offset).unwrap();
    out.write_u32::<LittleEndian>(1).unwrap();

    // End of central directory with every field saturated
    out.extend_from_slice(b"PK\x05\x06");
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u16::<LittleEndian>(0xFFFF).unwrap();
    out.write_u16::<LittleEndian>(0xFFFF).unwrap();
    out.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
    out.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();

    out
}
