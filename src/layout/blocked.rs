//! Blocked layouts
//!
//! The stream is a chain of blocks, each with a small header giving its
//! size and where the next one starts. One renderer handles every blocked
//! format; [`BlockedKind`] only selects the header parser.

use crate::coding::decode_frames;
use crate::stream::{BlockedKind, StreamHandle};

/// Block offset meaning "no further blocks".
pub const INVALID_BLOCK_OFFSET: u64 = u64::MAX;

/// Move every channel to the block at `block_offset`.
pub fn block_update(h: &mut StreamHandle, kind: BlockedKind, block_offset: u64) {
    let resource = h.ch.first().and_then(|c| c.resource);
    let channels = h.desc.channels as u64;

    let size = match resource {
        Some(id) => h.resources.size(id),
        None => 0,
    };
    if block_offset == INVALID_BLOCK_OFFSET || block_offset >= size {
        h.state.current_block_offset = INVALID_BLOCK_OFFSET;
        h.state.current_block_size = 0;
        h.state.next_block_offset = INVALID_BLOCK_OFFSET;
        return;
    }

    match kind {
        BlockedKind::Ast => {
            // "BLCK", per-channel data size, padding to 0x20
            let header_size = 0x20;
            let block_data = h.resources.read_u32be(resource, block_offset + 0x04) as u64;

            h.state.current_block_offset = block_offset;
            h.state.current_block_size = block_data;
            h.state.next_block_offset = block_offset + header_size + block_data * channels;
            for (i, cursor) in h.ch.iter_mut().enumerate() {
                cursor.offset = block_offset + header_size + block_data * i as u64;
            }
        }
        BlockedKind::Halpst => {
            // total data size, unused, next block offset (-1 at the end)
            let header_size = 0x20 * (1 + (8 + 4 * channels - 1) / 0x20);
            let block_size = h.resources.read_u32be(resource, block_offset) as u64 / channels;
            let next = h.resources.read_u32be(resource, block_offset + 0x08);

            h.state.current_block_offset = block_offset;
            h.state.current_block_size = block_size;
            h.state.next_block_offset = if next == u32::MAX {
                INVALID_BLOCK_OFFSET
            } else {
                next as u64
            };
            for (i, cursor) in h.ch.iter_mut().enumerate() {
                cursor.offset = block_offset + header_size + block_size * i as u64;
            }
        }
    }
}

fn block_samples(h: &StreamHandle) -> i32 {
    let frame_size = h.desc.frame_size();
    let samples_per_frame = h.desc.samples_per_frame() as i64;
    let block_size = h.state.current_block_size as i64;

    let samples = if h.state.current_block_samples != 0 {
        h.state.current_block_samples as i64
    } else if frame_size == 0 {
        // assume 4-bit
        block_size * 2 * samples_per_frame
    } else {
        block_size / frame_size as i64 * samples_per_frame
    };
    samples.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

pub fn render_blocked(
    buffer: &mut [i16],
    sample_count: usize,
    h: &mut StreamHandle,
    kind: BlockedKind,
) {
    let channels = h.desc.channels;
    let mut samples_written = 0usize;
    let mut samples_per_frame = h.desc.samples_per_frame();
    let mut samples_this_block = block_samples(h);

    while samples_written < sample_count {
        if h.desc.loop_flag && h.do_loop() {
            samples_this_block = block_samples(h);
            continue;
        }

        if samples_this_block < 0 {
            log::warn!(
                "wrong block samples at {:#x}",
                h.state.current_block_offset
            );
            buffer[samples_written * channels..sample_count * channels].fill(0);
            break;
        }

        if h.state.current_block_offset == INVALID_BLOCK_OFFSET {
            log::debug!("no more blocks");
            buffer[samples_written * channels..sample_count * channels].fill(0);
            break;
        }

        let mut samples_to_do = h.samples_to_do(samples_this_block, samples_per_frame);
        let remaining = (sample_count - samples_written) as i32;
        if samples_to_do > remaining {
            samples_to_do = remaining;
        }
        if samples_to_do < 0 {
            buffer[samples_written * channels..sample_count * channels].fill(0);
            break;
        }

        // empty blocks decode nothing
        if samples_to_do > 0 {
            decode_frames(h, buffer, samples_written, samples_to_do);
        }

        samples_written += samples_to_do as usize;
        h.state.current_sample += samples_to_do;
        h.state.samples_into_block += samples_to_do;

        if h.state.samples_into_block == samples_this_block {
            let previous = h.state.current_block_offset;
            let next = h.state.next_block_offset;
            block_update(h, kind, next);

            samples_per_frame = h.desc.samples_per_frame();
            samples_this_block = block_samples(h);
            h.state.samples_into_block = 0;

            if samples_this_block == 0 && h.state.current_block_offset == previous {
                // empty block chained to itself
                h.state.current_block_offset = INVALID_BLOCK_OFFSET;
            }
        }
    }
}
