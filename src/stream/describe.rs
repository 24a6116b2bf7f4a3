//! Human-readable stream summary

use std::fmt::Write;

use super::handle::StreamHandle;
use super::types::LayoutType;

/// `m:ss.sss` for `samples` at `sample_rate`.
fn format_time(samples: i32, sample_rate: i32) -> String {
    if sample_rate <= 0 {
        return "0:00.000".to_string();
    }
    let seconds = samples as f64 / sample_rate as f64;
    let minutes = (seconds / 60.0).floor();
    format!("{:.0}:{:06.3}", minutes, seconds - minutes * 60.0)
}

/// Cut `text` to at most `max_len` bytes without splitting a character.
fn truncate_at_char(text: &mut String, max_len: usize) {
    if text.len() <= max_len {
        return;
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

impl StreamHandle {
    /// Multi-line description of the stream, at most `max_len` bytes.
    pub fn describe(&self, max_len: usize) -> String {
        let desc = &self.desc;
        let mut out = String::new();

        // writing to a String cannot fail
        let _ = writeln!(out, "sample rate: {} Hz", desc.sample_rate);
        let _ = writeln!(out, "channels: {}", desc.channels);
        if desc.channel_mask != 0 {
            let _ = writeln!(out, "channel mask: {:#x}", desc.channel_mask);
        }

        if desc.loop_flag {
            let _ = writeln!(
                out,
                "loop start: {} samples ({} seconds)",
                desc.loop_start_sample,
                format_time(desc.loop_start_sample, desc.sample_rate)
            );
            let _ = writeln!(
                out,
                "loop end: {} samples ({} seconds)",
                desc.loop_end_sample,
                format_time(desc.loop_end_sample, desc.sample_rate)
            );
        }

        let _ = writeln!(
            out,
            "stream total samples: {} ({} seconds)",
            desc.num_samples,
            format_time(desc.num_samples, desc.sample_rate)
        );

        let _ = writeln!(out, "encoding: {}", desc.coding.description());

        match desc.layout {
            LayoutType::Segmented | LayoutType::Layered => {
                let children = self.layout_data.children().len();
                let unit = if desc.layout == LayoutType::Segmented {
                    "segments"
                } else {
                    "layers"
                };
                let _ = writeln!(
                    out,
                    "layout: {} ({} {})",
                    desc.layout.description(),
                    children,
                    unit
                );
            }
            layout => {
                let _ = writeln!(out, "layout: {}", layout.description());
            }
        }

        if desc.layout == LayoutType::Interleave && desc.channels > 1 {
            let _ = writeln!(out, "interleave: {:#x} bytes", desc.interleave_block_size);
            if desc.interleave_last_block_size > 0 {
                let _ = writeln!(
                    out,
                    "interleave last block: {:#x} bytes",
                    desc.interleave_last_block_size
                );
            }
        }

        let frame_size = desc.frame_size();
        if !desc.layout.is_composite() && frame_size > 0 {
            let _ = writeln!(out, "frame size: {:#x} bytes", frame_size);
        }

        let _ = writeln!(out, "metadata from: {}", desc.meta.description());
        let _ = writeln!(out, "bitrate: {} kbps", self.average_bitrate() / 1000);

        if desc.num_streams > 1 {
            let _ = writeln!(out, "stream count: {}", desc.num_streams);
            let index = if desc.stream_index == 0 { 1 } else { desc.stream_index };
            let _ = writeln!(out, "stream index: {}", index);
        }

        if !desc.stream_name.is_empty() {
            let _ = writeln!(out, "stream name: {}", desc.stream_name);
        }

        truncate_at_char(&mut out, max_len);
        out
    }
}
