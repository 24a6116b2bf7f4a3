//! In-memory resources
//!
//! [`MemoryFs`] is a set of named byte buffers that behaves like a tiny
//! filesystem: resources opened from it can open their siblings by name.
//! Every open and close is counted per name so callers can check that a
//! stream released exactly what it acquired.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::resource::Resource;
use crate::error::{StreamError, StreamResult};

#[derive(Default)]
struct FsInner {
    files: HashMap<String, Arc<Vec<u8>>>,
    opens: HashMap<String, usize>,
    closes: HashMap<String, usize>,
}

/// A shared set of named in-memory files.
#[derive(Clone, Default)]
pub struct MemoryFs {
    inner: Arc<Mutex<FsInner>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&self, name: impl Into<String>, data: Vec<u8>) {
        self.inner.lock().files.insert(name.into(), Arc::new(data));
    }

    /// Remove a file. Resources already opened keep their data.
    pub fn remove(&self, name: &str) {
        self.inner.lock().files.remove(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().files.contains_key(name)
    }

    /// Open a file by name.
    pub fn open(&self, name: &str) -> StreamResult<MemoryResource> {
        let mut inner = self.inner.lock();
        let data = inner.files.get(name).cloned().ok_or_else(|| {
            StreamError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", name),
            ))
        })?;
        *inner.opens.entry(name.to_string()).or_insert(0) += 1;

        Ok(MemoryResource {
            fs: self.clone(),
            name: name.to_string(),
            data,
            stream_index: 0,
            closed: false,
        })
    }

    /// Number of times `name` has been opened.
    pub fn open_count(&self, name: &str) -> usize {
        self.inner.lock().opens.get(name).copied().unwrap_or(0)
    }

    /// Number of times a resource named `name` has been closed.
    pub fn close_count(&self, name: &str) -> usize {
        self.inner.lock().closes.get(name).copied().unwrap_or(0)
    }

    /// Opens minus closes, summed over every name.
    pub fn live_handles(&self) -> usize {
        let inner = self.inner.lock();
        let opens: usize = inner.opens.values().sum();
        let closes: usize = inner.closes.values().sum();
        opens.saturating_sub(closes)
    }

    fn record_close(&self, name: &str) {
        *self.inner.lock().closes.entry(name.to_string()).or_insert(0) += 1;
    }
}

/// A resource opened from a [`MemoryFs`].
pub struct MemoryResource {
    fs: MemoryFs,
    name: String,
    data: Arc<Vec<u8>>,
    stream_index: i32,
    closed: bool,
}

impl MemoryResource {
    pub fn set_stream_index(&mut self, index: i32) {
        self.stream_index = index;
    }
}

impl Resource for MemoryResource {
    fn read(&mut self, offset: u64, buf: &mut [u8]) -> usize {
        if self.closed || offset >= self.data.len() as u64 {
            return 0;
        }
        let start = offset as usize;
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        n
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn open(&self, name: &str, _buffer_size: usize) -> StreamResult<Box<dyn Resource>> {
        let mut res = self.fs.open(name)?;
        res.stream_index = self.stream_index;
        Ok(Box::new(res))
    }

    fn stream_index(&self) -> i32 {
        self.stream_index
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.fs.record_close(&self.name);
        }
    }
}
