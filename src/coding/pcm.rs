//! Linear PCM
//!
//! Every decoder here writes `samples_to_do` samples to `out[0]`,
//! `out[spacing]`, `out[2 * spacing]`, ... starting at sample
//! `first_sample` of the channel's current block.

use crate::io::ResourceRegistry;
use crate::stream::ChannelState;

pub fn decode_pcm16le(
    res: &mut ResourceRegistry,
    stream: &ChannelState,
    out: &mut [i16],
    spacing: usize,
    first_sample: i32,
    samples_to_do: i32,
) {
    for (n, i) in (first_sample..first_sample + samples_to_do).enumerate() {
        out[n * spacing] = res.read_i16le(stream.resource, stream.offset + i as u64 * 2);
    }
}

pub fn decode_pcm16be(
    res: &mut ResourceRegistry,
    stream: &ChannelState,
    out: &mut [i16],
    spacing: usize,
    first_sample: i32,
    samples_to_do: i32,
) {
    for (n, i) in (first_sample..first_sample + samples_to_do).enumerate() {
        out[n * spacing] = res.read_i16be(stream.resource, stream.offset + i as u64 * 2);
    }
}

/// 16-bit little endian, channels interleaved sample by sample from one offset.
pub fn decode_pcm16_int(
    res: &mut ResourceRegistry,
    stream: &ChannelState,
    out: &mut [i16],
    spacing: usize,
    first_sample: i32,
    samples_to_do: i32,
) {
    for (n, i) in (first_sample..first_sample + samples_to_do).enumerate() {
        let offset = stream.offset + i as u64 * 2 * spacing as u64;
        out[n * spacing] = res.read_i16le(stream.resource, offset);
    }
}

/// Signed 8-bit. `interleaved` reads one byte per channel per sample.
pub fn decode_pcm8(
    res: &mut ResourceRegistry,
    stream: &ChannelState,
    out: &mut [i16],
    spacing: usize,
    first_sample: i32,
    samples_to_do: i32,
    interleaved: bool,
) {
    let step = if interleaved { spacing as u64 } else { 1 };
    for (n, i) in (first_sample..first_sample + samples_to_do).enumerate() {
        let byte = res.read_u8(stream.resource, stream.offset + i as u64 * step);
        out[n * spacing] = (byte as i8 as i16) << 8;
    }
}

/// Unsigned 8-bit (0x80 is silence).
pub fn decode_pcm8_unsigned(
    res: &mut ResourceRegistry,
    stream: &ChannelState,
    out: &mut [i16],
    spacing: usize,
    first_sample: i32,
    samples_to_do: i32,
    interleaved: bool,
) {
    let step = if interleaved { spacing as u64 } else { 1 };
    for (n, i) in (first_sample..first_sample + samples_to_do).enumerate() {
        let byte = res.read_u8(stream.resource, stream.offset + i as u64 * step);
        out[n * spacing] = ((byte ^ 0x80) as i8 as i16) << 8;
    }
}
