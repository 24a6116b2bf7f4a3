//! IMA ADPCM
//!
//! Plain IMA is a bare nibble stream (low nibble first) with the predictor
//! and step index carried in the channel registers. MS IMA stores a header
//! (initial sample, step index) per channel at the start of each block.

use crate::io::ResourceRegistry;
use crate::stream::ChannelState;

#[rustfmt::skip]
static IMA_STEP: [i32; 89] = [
    7, 8, 9, 10, 11, 12, 13, 14,
    16, 17, 19, 21, 23, 25, 28, 31,
    34, 37, 41, 45, 50, 55, 60, 66,
    73, 80, 88, 97, 107, 118, 130, 143,
    157, 173, 190, 209, 230, 253, 279, 307,
    337, 371, 408, 449, 494, 544, 598, 658,
    724, 796, 876, 963, 1060, 1166, 1282, 1411,
    1552, 1707, 1878, 2066, 2272, 2499, 2749, 3024,
    3327, 3660, 4026, 4428, 4871, 5358, 5894, 6484,
    7132, 7845, 8630, 9493, 10442, 11487, 12635, 13899,
    15289, 16818, 18500, 20350, 22385, 24623, 27086, 29794,
    32767,
];

#[rustfmt::skip]
static IMA_INDEX: [i32; 16] = [
    -1, -1, -1, -1, 2, 4, 6, 8,
    -1, -1, -1, -1, 2, 4, 6, 8,
];

/// Apply one nibble to the predictor and step index.
fn expand_nibble(nibble: u8, hist1: &mut i32, step_index: &mut i32) {
    let nibble = (nibble & 0x0F) as usize;
    let step = IMA_STEP[(*step_index).clamp(0, 88) as usize];

    let mut delta = step >> 3;
    if nibble & 1 != 0 {
        delta += step >> 2;
    }
    if nibble & 2 != 0 {
        delta += step >> 1;
    }
    if nibble & 4 != 0 {
        delta += step;
    }
    if nibble & 8 != 0 {
        delta = -delta;
    }

    *hist1 = (*hist1 + delta).clamp(i16::MIN as i32, i16::MAX as i32);
    *step_index = (*step_index + IMA_INDEX[nibble]).clamp(0, 88);
}

pub fn decode_ima(
    res: &mut ResourceRegistry,
    stream: &mut ChannelState,
    out: &mut [i16],
    spacing: usize,
    first_sample: i32,
    samples_to_do: i32,
) {
    let mut hist1 = stream.adpcm_history1_32;
    let mut step_index = stream.adpcm_step_index;

    for (n, i) in (first_sample..first_sample + samples_to_do).enumerate() {
        let byte = res.read_u8(stream.resource, stream.offset + (i / 2) as u64);
        let nibble = if i & 1 == 1 { byte >> 4 } else { byte & 0x0F };
        expand_nibble(nibble, &mut hist1, &mut step_index);
        out[n * spacing] = hist1 as i16;
    }

    stream.adpcm_history1_32 = hist1;
    stream.adpcm_step_index = step_index;
}

/// Microsoft IMA, channels sharing one block.
///
/// Block: 4-byte header per channel, then groups of 4 bytes (8 samples)
/// per channel in turn. The channel's offset moves to the next block once
/// the last sample of the block is decoded.
#[allow(clippy::too_many_arguments)]
pub fn decode_ms_ima(
    res: &mut ResourceRegistry,
    stream: &mut ChannelState,
    out: &mut [i16],
    spacing: usize,
    first_sample: i32,
    samples_to_do: i32,
    channel: usize,
    channels: usize,
    block_size: u64,
) {
    let channels_i = channels.max(1) as i64;
    let block_samples = ((block_size as i64 - 4 * channels_i) * 2 / channels_i + 1) as i32;
    if block_samples <= 1 {
        for n in 0..samples_to_do as usize {
            out[n * spacing] = 0;
        }
        return;
    }

    let mut hist1 = stream.adpcm_history1_32;
    let mut step_index = stream.adpcm_step_index;
    let mut first = first_sample % block_samples;
    let mut remaining = samples_to_do;
    let mut n = 0usize;

    if first == 0 {
        let header_offset = stream.offset + 4 * channel as u64;
        hist1 = res.read_i16le(stream.resource, header_offset) as i32;
        step_index = (res.read_u8(stream.resource, header_offset + 2) as i8 as i32).clamp(0, 88);

        if remaining > 0 {
            out[0] = hist1 as i16;
            n = 1;
            first = 1;
            remaining -= 1;
        }
    }

    let mut i = first;
    while i < first + remaining {
        let k = (i - 1) as u64;
        let byte_offset = stream.offset
            + 4 * channels as u64
            + 4 * channel as u64
            + 4 * channels as u64 * (k / 8)
            + (k % 8) / 2;
        let byte = res.read_u8(stream.resource, byte_offset);
        let nibble = if k & 1 == 1 { byte >> 4 } else { byte & 0x0F };
        expand_nibble(nibble, &mut hist1, &mut step_index);
        out[n * spacing] = hist1 as i16;
        n += 1;
        i += 1;
    }

    if i == block_samples {
        stream.offset += block_size;
    }

    stream.adpcm_history1_32 = hist1;
    stream.adpcm_step_index = step_index;
}

/// Samples held by `bytes` bytes of MS IMA data in `block_align` blocks.
pub fn ms_ima_bytes_to_samples(bytes: u64, block_align: u64, channels: usize) -> i32 {
    let header = 4 * channels as u64;
    if channels == 0 || block_align <= header {
        return 0;
    }
    let block_samples = |size: u64| (size - header) * 2 / channels as u64 + 1;

    let full = bytes / block_align * block_samples(block_align);
    let rest = bytes % block_align;
    let partial = if rest > header { block_samples(rest) } else { 0 };
    (full + partial).min(i32::MAX as u64) as i32
}
