use super::ReadAt;
use crate::error::{ExtractError, Result};
use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Read-only handle on an archive file.
///
/// The file descriptor is owned exclusively and closed when the reader is dropped.
pub struct LocalFileReader {
    file: File,
    path: PathBuf,
    size: u64,
}

impl LocalFileReader {
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ExtractError::from_io(path, e))?;
        let metadata = file.metadata().map_err(|e| ExtractError::from_io(path, e))?;
        if metadata.is_dir() {
            return Err(ExtractError::format(format!(
                "{} is a directory",
                path.display()
            )));
        }
        Ok(Self {
            file,
            path: path.to_path_buf(),
            size: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReadAt for LocalFileReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        #[cfg(unix)]
        let n = {
            use std::os::unix::fs::FileExt;
            self.file.read_at(buf, offset)
        };

        #[cfg(windows)]
        let n = {
            use std::os::windows::fs::FileExt;
            self.file.seek_read(buf, offset)
        };

        #[cfg(not(any(unix, windows)))]
        let n = {
            use std::io::{Read, Seek, SeekFrom};
            let mut file = &self.file;
            file.seek(SeekFrom::Start(offset))
                .and_then(|_| file.read(buf))
        };

        n.map_err(|e| ExtractError::from_io(&self.path, e))
    }

    fn size(&self) -> u64 {
        self.size
    }
}
