//! Nintendo DSP 4-bit ADPCM
//!
//! Frames are 8 bytes: a header byte (coefficient pair index, scale) and
//! 14 nibbles. Prediction uses the per-channel coefficient table and the
//! 16-bit history pair.

use crate::io::ResourceRegistry;
use crate::stream::ChannelState;

pub const DSP_FRAME_SIZE: u64 = 0x08;
pub const DSP_SAMPLES_PER_FRAME: i32 = 14;

fn nibble_signed(byte: u8, high: bool) -> i32 {
    let nibble = if high { byte >> 4 } else { byte & 0x0F };
    ((nibble as i32) << 28) >> 28
}

pub fn decode_ngc_dsp(
    res: &mut ResourceRegistry,
    stream: &mut ChannelState,
    out: &mut [i16],
    spacing: usize,
    first_sample: i32,
    samples_to_do: i32,
) {
    let frames_in = (first_sample / DSP_SAMPLES_PER_FRAME) as u64;
    let frame_offset = stream.offset + frames_in * DSP_FRAME_SIZE;

    let header = res.read_u8(stream.resource, frame_offset);
    let scale = 1i32 << (header & 0x0F);
    let coef_index = ((header >> 4) & 0x07) as usize;
    let coef1 = stream.adpcm_coef[coef_index * 2] as i32;
    let coef2 = stream.adpcm_coef[coef_index * 2 + 1] as i32;

    let mut hist1 = stream.adpcm_history1_16 as i32;
    let mut hist2 = stream.adpcm_history2_16 as i32;

    let first = first_sample % DSP_SAMPLES_PER_FRAME;
    for (n, i) in (first..first + samples_to_do).enumerate() {
        let byte = res.read_u8(stream.resource, frame_offset + 1 + (i / 2) as u64);
        let nibble = nibble_signed(byte, i & 1 == 0);

        let predicted = ((nibble * scale) << 11) + 1024 + coef1 * hist1 + coef2 * hist2;
        let sample = (predicted >> 11).clamp(i16::MIN as i32, i16::MAX as i32);

        out[n * spacing] = sample as i16;
        hist2 = hist1;
        hist1 = sample;
    }

    stream.adpcm_history1_16 = hist1 as i16;
    stream.adpcm_history2_16 = hist2 as i16;
}

/// Samples held by `nibbles` nibbles of DSP data (headers included).
pub fn nibbles_to_samples(nibbles: u32) -> i32 {
    let whole_frames = nibbles / 16;
    let remainder = nibbles % 16;
    let samples = whole_frames * 14 + remainder.saturating_sub(2);
    samples.min(i32::MAX as u32) as i32
}

/// Samples held by `bytes` bytes of DSP data.
pub fn bytes_to_samples(bytes: u64, channels: usize) -> i32 {
    if channels == 0 {
        return 0;
    }
    let samples = bytes / channels as u64 / DSP_FRAME_SIZE * DSP_SAMPLES_PER_FRAME as u64;
    samples.min(i32::MAX as u64) as i32
}
