//! Interleave layout: fixed-size blocks per channel, in channel order.
//!
//! The last block of each channel may be shorter
//! (`interleave_last_block_size`), in which case offsets jump over the
//! remaining full blocks of the other channels.

use crate::coding::decode_frames;
use crate::stream::StreamHandle;

struct BlockGeometry {
    samples_per_frame: i32,
    samples_this_block: i32,
}

fn default_geometry(h: &StreamHandle) -> Option<BlockGeometry> {
    let frame_size = h.desc.frame_size();
    let samples_per_frame = h.desc.samples_per_frame();
    if frame_size == 0 || samples_per_frame == 0 {
        return None;
    }

    let mut samples_this_block =
        (h.desc.interleave_block_size / frame_size) as i32 * samples_per_frame;
    // mono with no interleave set behaves like a flat stream
    if samples_this_block == 0 && h.desc.channels == 1 {
        samples_this_block = h.desc.num_samples;
    }

    Some(BlockGeometry {
        samples_per_frame,
        samples_this_block,
    })
}

fn last_geometry(h: &StreamHandle) -> Option<BlockGeometry> {
    let frame_size = h.desc.shortframe_size();
    let samples_per_frame = h.desc.samples_per_shortframe();
    if frame_size == 0 || samples_per_frame == 0 {
        return None;
    }

    Some(BlockGeometry {
        samples_per_frame,
        samples_this_block: (h.desc.interleave_last_block_size / frame_size) as i32
            * samples_per_frame,
    })
}

pub fn render_interleave(buffer: &mut [i16], sample_count: usize, h: &mut StreamHandle) {
    let channels = h.desc.channels;
    let mut samples_written = 0usize;

    let has_last_block = h.desc.interleave_last_block_size > 0 && channels > 1;

    let geometry = default_geometry(h);
    let last = if has_last_block { last_geometry(h) } else { None };

    let Some(default) = geometry.filter(|_| !has_last_block || last.is_some()) else {
        log::warn!("interleave layout without frame geometry for {:?}", h.desc.coding);
        buffer[..sample_count * channels].fill(0);
        return;
    };

    let mut samples_per_frame = default.samples_per_frame;
    let mut samples_this_block = default.samples_this_block;

    while samples_written < sample_count {
        if h.desc.loop_flag && h.do_loop() {
            samples_per_frame = default.samples_per_frame;
            samples_this_block = default.samples_this_block;
            continue;
        }

        let mut samples_to_do = h.samples_to_do(samples_this_block, samples_per_frame);
        let remaining = (sample_count - samples_written) as i32;
        if samples_to_do > remaining {
            samples_to_do = remaining;
        }

        if samples_to_do <= 0 {
            // interleave not set, or past the loop end
            buffer[samples_written * channels..sample_count * channels].fill(0);
            break;
        }

        decode_frames(h, buffer, samples_written, samples_to_do);

        samples_written += samples_to_do as usize;
        h.state.current_sample += samples_to_do;
        h.state.samples_into_block += samples_to_do;

        if h.state.samples_into_block == samples_this_block {
            let interleave = h.desc.interleave_block_size;
            let current_sample = h.state.current_sample;
            let num_samples = h.desc.num_samples;
            let entering_last = last
                .as_ref()
                .filter(|_| current_sample + samples_this_block > num_samples);

            match entering_last {
                Some(last) => {
                    samples_per_frame = last.samples_per_frame;
                    samples_this_block = last.samples_this_block;
                    let last_size = h.desc.interleave_last_block_size;
                    for (ch, cursor) in h.ch.iter_mut().enumerate() {
                        cursor.offset +=
                            interleave * (channels - ch) as u64 + last_size * ch as u64;
                    }
                }
                None => {
                    for cursor in h.ch.iter_mut() {
                        cursor.offset += interleave * channels as u64;
                    }
                }
            }
            h.state.samples_into_block = 0;
        }
    }
}
