//! Render dispatch
//!
//! Picks the layout renderer, then applies channel remapping and masking
//! to whatever was rendered.

use crate::layout::{aix, blocked, flat, interleave, layered, segmented};

use super::handle::{StreamHandle, MAX_CHANNEL_MAPPINGS};
use super::types::LayoutType;

impl StreamHandle {
    /// Decode `sample_count` sample frames into `buffer` (interleaved).
    ///
    /// `sample_count` is clamped to what `buffer` can hold. Returns the
    /// number of frames written.
    pub fn render(&mut self, buffer: &mut [i16], sample_count: usize) -> usize {
        let channels = self.desc.channels;
        if channels == 0 {
            return 0;
        }
        let sample_count = sample_count.min(buffer.len() / channels);
        if sample_count == 0 {
            return 0;
        }

        match self.desc.layout {
            LayoutType::None => flat::render_flat(buffer, sample_count, self),
            LayoutType::Interleave => interleave::render_interleave(buffer, sample_count, self),
            LayoutType::Blocked(kind) => blocked::render_blocked(buffer, sample_count, self, kind),
            LayoutType::Segmented => segmented::render_segmented(buffer, sample_count, self),
            LayoutType::Layered => layered::render_layered(buffer, sample_count, self),
            LayoutType::Aix => aix::render_aix(buffer, sample_count, self),
        }

        let filled = &mut buffer[..sample_count * channels];
        self.remap_channels(filled);
        self.mask_channels(filled);

        sample_count
    }

    fn remap_channels(&self, buffer: &mut [i16]) {
        let Some(mapping) = self.desc.channel_mapping.as_ref() else {
            return;
        };
        let channels = self.desc.channels;
        let limit = channels.min(MAX_CHANNEL_MAPPINGS);

        for frame in buffer.chunks_exact_mut(channels) {
            for ch_from in 0..limit {
                let ch_to = mapping[ch_from] as usize;
                if ch_to < 1 || ch_to >= MAX_CHANNEL_MAPPINGS || ch_to >= channels || ch_to == ch_from {
                    continue;
                }
                frame.swap(ch_from, ch_to);
            }
        }
    }

    fn mask_channels(&self, buffer: &mut [i16]) {
        let mask = self.desc.channel_mask;
        if mask == 0 {
            return;
        }
        let channels = self.desc.channels;
        let limit = channels.min(32);

        for frame in buffer.chunks_exact_mut(channels) {
            for (ch, sample) in frame.iter_mut().take(limit).enumerate() {
                if (mask >> ch) & 1 == 0 {
                    *sample = 0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::io::MemoryFs;
    use crate::stream::{CodingType, StreamHandle};

    fn pcm_stereo(frames: &[(i16, i16)]) -> (MemoryFs, StreamHandle) {
        let fs = MemoryFs::new();
        let mut data = Vec::new();
        for (l, r) in frames {
            data.extend_from_slice(&l.to_le_bytes());
            data.extend_from_slice(&r.to_le_bytes());
        }
        fs.insert("pcm.raw", data);

        let mut h = StreamHandle::allocate(2, false).unwrap();
        h.desc.sample_rate = 8000;
        h.desc.num_samples = frames.len() as i32;
        h.desc.coding = CodingType::Pcm16Int;
        let base = fs.open("pcm.raw").unwrap();
        h.open_stream(&base, 0).unwrap();
        h.ch[1].offset = 2;
        h.finalize();
        (fs, h)
    }

    #[test]
    fn test_render_plain() {
        let (_fs, mut h) = pcm_stereo(&[(1, 2), (3, 4)]);
        let mut buf = [0i16; 4];
        assert_eq!(h.render(&mut buf, 2), 2);
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn test_render_clamps_to_buffer() {
        let (_fs, mut h) = pcm_stereo(&[(1, 2), (3, 4), (5, 6)]);
        let mut buf = [0i16; 3];
        assert_eq!(h.render(&mut buf, 10), 1);
        assert_eq!(&buf[..2], &[1, 2]);
    }

    #[test]
    fn test_mask_zeroes_cleared_channels() {
        let (_fs, mut h) = pcm_stereo(&[(1, 2), (3, 4)]);
        h.desc.channel_mask = 0b10;
        let mut buf = [0i16; 4];
        h.render(&mut buf, 2);
        assert_eq!(buf, [0, 2, 0, 4]);
    }

    #[test]
    fn test_remap_swaps_channels() {
        let (_fs, mut h) = pcm_stereo(&[(1, 2), (3, 4)]);
        let mut mapping = [0u8; 32];
        mapping[0] = 1;
        h.desc.channel_mapping = Some(mapping);
        let mut buf = [0i16; 4];
        h.render(&mut buf, 2);
        assert_eq!(buf, [2, 1, 4, 3]);
    }

    #[test]
    fn test_remap_ignores_out_of_range_targets() {
        let (_fs, mut h) = pcm_stereo(&[(1, 2)]);
        let mut mapping = [0u8; 32];
        mapping[0] = 5;
        mapping[1] = 1;
        h.desc.channel_mapping = Some(mapping);
        let mut buf = [0i16; 2];
        h.render(&mut buf, 1);
        assert_eq!(buf, [1, 2]);
    }

    #[test]
    fn test_past_end_is_silence() {
        let (_fs, mut h) = pcm_stereo(&[(7, 8)]);
        let mut buf = [9i16; 6];
        h.render(&mut buf, 3);
        assert_eq!(buf, [7, 8, 0, 0, 0, 0]);
    }
}
