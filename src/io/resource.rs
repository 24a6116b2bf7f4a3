//! Seekable resource abstraction
//!
//! A [`Resource`] is a named, sized, randomly readable byte source. Probers
//! read headers through it and ask it to open further resources (the
//! per-channel handles of a stream, or the sibling file of a dual-file
//! stereo pair).

use crate::error::{StreamError, StreamResult};

/// Default read-ahead buffer size for newly opened resources.
pub const DEFAULT_BUFFER_SIZE: usize = 0x8000;

/// A byte-addressable input.
pub trait Resource: Send {
    /// Read up to `buf.len()` bytes at `offset`, returning how many were read.
    ///
    /// Short reads only happen at the end of the resource.
    fn read(&mut self, offset: u64, buf: &mut [u8]) -> usize;

    /// Full name (path) of this resource.
    fn name(&self) -> &str;

    /// Total size in bytes.
    fn size(&self) -> u64;

    /// Open another resource by name through the same backend.
    fn open(&self, name: &str, buffer_size: usize) -> StreamResult<Box<dyn Resource>>;

    /// Subsong requested by whoever opened this resource (0 = no preference).
    fn stream_index(&self) -> i32 {
        0
    }

    /// Release the underlying handle. Called once by the owner.
    fn close(&mut self) {}
}

/// Header-reading helpers for probers.
///
/// Unlike decoder reads, these fail with [`StreamError::UnexpectedEof`]
/// when the field lies past the end of the resource.
pub trait ResourceExt: Resource {
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> StreamResult<()> {
        if self.read(offset, buf) != buf.len() {
            return Err(StreamError::UnexpectedEof {
                name: self.name().to_string(),
                offset,
            });
        }
        Ok(())
    }

    fn read_u8_at(&mut self, offset: u64) -> StreamResult<u8> {
        let mut b = [0u8; 1];
        self.read_exact_at(offset, &mut b)?;
        Ok(b[0])
    }

    fn read_u16le_at(&mut self, offset: u64) -> StreamResult<u16> {
        let mut b = [0u8; 2];
        self.read_exact_at(offset, &mut b)?;
        Ok(u16::from_le_bytes(b))
    }

    fn read_u16be_at(&mut self, offset: u64) -> StreamResult<u16> {
        let mut b = [0u8; 2];
        self.read_exact_at(offset, &mut b)?;
        Ok(u16::from_be_bytes(b))
    }

    fn read_u32le_at(&mut self, offset: u64) -> StreamResult<u32> {
        let mut b = [0u8; 4];
        self.read_exact_at(offset, &mut b)?;
        Ok(u32::from_le_bytes(b))
    }

    fn read_u32be_at(&mut self, offset: u64) -> StreamResult<u32> {
        let mut b = [0u8; 4];
        self.read_exact_at(offset, &mut b)?;
        Ok(u32::from_be_bytes(b))
    }

    fn read_i16be_at(&mut self, offset: u64) -> StreamResult<i16> {
        Ok(self.read_u16be_at(offset)? as i16)
    }

    /// Compare the bytes at `offset` with `magic`.
    fn has_magic(&mut self, offset: u64, magic: &[u8]) -> bool {
        let mut buf = vec![0u8; magic.len()];
        self.read(offset, &mut buf) == magic.len() && buf == magic
    }
}

impl<T: Resource + ?Sized> ResourceExt for T {}

/// Split a file name into (base, extension) where the extension keeps its dot.
///
/// Only the final path component is searched, so `dir.v2/track` has no
/// extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let file_start = name.rfind(['/', '\\']).map(|p| p + 1).unwrap_or(0);
    match name[file_start..].rfind('.') {
        Some(dot) => name.split_at(file_start + dot),
        None => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("music/bgm_L.dsp"), ("music/bgm_L", ".dsp"));
        assert_eq!(split_extension("track.V0"), ("track", ".V0"));
        assert_eq!(split_extension("noext"), ("noext", ""));
        assert_eq!(split_extension("dir.v2/noext"), ("dir.v2/noext", ""));
        assert_eq!(split_extension("c:\\snd\\a.b.wav"), ("c:\\snd\\a.b", ".wav"));
    }
}
