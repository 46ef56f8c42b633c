use std::io::{Cursor, Write};
use std::path::Path;
use std::process::{Command, Output};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Build a zip archive of (name, content) pairs; names ending in `/` become directories
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Place `data` at `A47/A203.zip` under `workdir`
pub fn install_archive(workdir: &Path, data: &[u8]) {
    let dir = workdir.join("A47");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("A203.zip"), data).unwrap();
}

/// Run the binary with no arguments inside `workdir`
pub fn run_in(workdir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_a203-extract"))
        .current_dir(workdir)
        .output()
        .unwrap()
}
