//! Flat layout: the whole stream is one block.

use crate::coding::decode_frames;
use crate::stream::StreamHandle;

pub fn render_flat(buffer: &mut [i16], sample_count: usize, h: &mut StreamHandle) {
    let channels = h.desc.channels;
    let samples_per_frame = h.desc.samples_per_frame();
    let samples_this_block = h.desc.num_samples;
    let mut samples_written = 0usize;

    while samples_written < sample_count {
        if h.desc.loop_flag && h.do_loop() {
            continue;
        }

        let mut samples_to_do = h.samples_to_do(samples_this_block, samples_per_frame);
        let remaining = (sample_count - samples_written) as i32;
        if samples_to_do > remaining {
            samples_to_do = remaining;
        }

        if samples_to_do <= 0 {
            // asked for more than num_samples
            buffer[samples_written * channels..sample_count * channels].fill(0);
            break;
        }

        decode_frames(h, buffer, samples_written, samples_to_do);

        samples_written += samples_to_do as usize;
        h.state.current_sample += samples_to_do;
        h.state.samples_into_block += samples_to_do;
    }
}
