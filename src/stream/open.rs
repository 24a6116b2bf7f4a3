//! Resource sharing for channel cursors

use crate::error::StreamResult;
use crate::io::{Resource, DEFAULT_BUFFER_SIZE};

use super::handle::StreamHandle;
use super::types::{CodingType, LayoutType};

impl StreamHandle {
    /// Open the resources the channel cursors read from and set their
    /// start offsets.
    ///
    /// Probers call this last, after tags and interleave are set. One
    /// resource is shared by every channel unless the interleave is large
    /// enough to thrash a single read-ahead buffer or the layout jumps
    /// between blocks.
    pub fn open_stream(&mut self, base: &dyn Resource, start_offset: u64) -> StreamResult<()> {
        if self.desc.layout.is_composite() || self.desc.coding.is_codec_managed() {
            return Ok(());
        }

        let channels = self.desc.channels;
        let interleave = self.desc.interleave_block_size;

        let per_channel = interleave * channels as u64 >= DEFAULT_BUFFER_SIZE as u64
            || !matches!(self.desc.layout, LayoutType::None | LayoutType::Interleave);
        let same_offset = self.desc.layout == LayoutType::None;
        // stereo codec: channel pairs share the same bytes
        let stereo_codec = self.desc.layout == LayoutType::Interleave
            && self.desc.coding == CodingType::XboxIma;

        let name = base.name().to_string();
        let shared = if per_channel {
            None
        } else {
            Some(self.resources.insert(base.open(&name, DEFAULT_BUFFER_SIZE)?))
        };

        for ch in 0..channels {
            let offset = if same_offset {
                start_offset
            } else if stereo_codec {
                let ch_mod = ch & !1;
                start_offset + interleave * ch_mod as u64
            } else {
                start_offset + interleave * ch as u64
            };

            let resource = match shared {
                Some(id) => id,
                None => self.resources.insert(base.open(&name, DEFAULT_BUFFER_SIZE)?),
            };

            let cursor = &mut self.ch[ch];
            cursor.resource = Some(resource);
            cursor.offset = offset;
            cursor.channel_start_offset = offset;
        }

        Ok(())
    }
}
