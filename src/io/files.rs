// File-backed resources

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use super::resource::{Resource, DEFAULT_BUFFER_SIZE};
use crate::error::{StreamError, StreamResult};

/// A file on disk read through a read-ahead window.
///
/// Decoders tend to read small, nearly sequential pieces; the window turns
/// those into one `read` syscall per `buffer_size` bytes.
pub struct FileResource {
    file: Option<File>,
    name: String,
    size: u64,
    buffer: Vec<u8>,
    buffer_offset: u64,
    buffer_valid: usize,
    stream_index: i32,
}

impl FileResource {
    /// Open `path` with the default read-ahead size.
    pub fn open_path(path: &Path) -> StreamResult<Self> {
        Self::with_buffer_size(path, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(path: &Path, buffer_size: usize) -> StreamResult<Self> {
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        if metadata.is_dir() {
            return Err(StreamError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", path.display()),
            )));
        }

        let buffer_size = if buffer_size == 0 {
            DEFAULT_BUFFER_SIZE
        } else {
            buffer_size
        };

        Ok(Self {
            file: Some(file),
            name: path.to_string_lossy().into_owned(),
            size: metadata.len(),
            buffer: vec![0u8; buffer_size],
            buffer_offset: 0,
            buffer_valid: 0,
            stream_index: 0,
        })
    }

    /// Request a specific subsong from whoever probes this resource.
    pub fn set_stream_index(&mut self, index: i32) {
        self.stream_index = index;
    }

    fn fill(&mut self, offset: u64) -> usize {
        self.buffer_offset = offset;
        self.buffer_valid = 0;

        let Some(file) = self.file.as_mut() else {
            return 0;
        };
        if file.seek(SeekFrom::Start(offset)).is_err() {
            return 0;
        }

        while self.buffer_valid < self.buffer.len() {
            match file.read(&mut self.buffer[self.buffer_valid..]) {
                Ok(0) => break,
                Ok(n) => self.buffer_valid += n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("read error in {} at {:#x}: {}", self.name, offset, e);
                    break;
                }
            }
        }
        self.buffer_valid
    }
}

impl Resource for FileResource {
    fn read(&mut self, offset: u64, buf: &mut [u8]) -> usize {
        let mut done = 0;
        let mut pos = offset;

        while done < buf.len() && pos < self.size {
            let in_window =
                pos >= self.buffer_offset && pos < self.buffer_offset + self.buffer_valid as u64;
            if !in_window && self.fill(pos) == 0 {
                break;
            }

            let start = (pos - self.buffer_offset) as usize;
            let n = (self.buffer_valid - start).min(buf.len() - done);
            buf[done..done + n].copy_from_slice(&self.buffer[start..start + n]);
            done += n;
            pos += n as u64;
        }
        done
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn open(&self, name: &str, buffer_size: usize) -> StreamResult<Box<dyn Resource>> {
        let mut file = FileResource::with_buffer_size(Path::new(name), buffer_size)?;
        file.stream_index = self.stream_index;
        Ok(Box::new(file))
    }

    fn stream_index(&self) -> i32 {
        self.stream_index
    }

    fn close(&mut self) {
        self.file = None;
        self.buffer_valid = 0;
    }
}
