//! `Read + Seek` over a [`Resource`], for decoders that want a byte stream.

use std::io::{self, Read, Seek, SeekFrom};

use super::resource::Resource;

pub struct ResourceReader {
    resource: Box<dyn Resource>,
    pos: u64,
}

impl ResourceReader {
    pub fn new(resource: Box<dyn Resource>) -> Self {
        Self { resource, pos: 0 }
    }

    pub fn name(&self) -> &str {
        self.resource.name()
    }

    pub fn size(&self) -> u64 {
        self.resource.size()
    }
}

impl Read for ResourceReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.resource.read(self.pos, buf);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for ResourceReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(p) => Some(p),
            SeekFrom::End(d) => self.resource.size().checked_add_signed(d),
            SeekFrom::Current(d) => self.pos.checked_add_signed(d),
        };
        match target {
            Some(p) => {
                self.pos = p;
                Ok(p)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of resource",
            )),
        }
    }
}

impl Drop for ResourceReader {
    fn drop(&mut self) {
        self.resource.close();
    }
}
