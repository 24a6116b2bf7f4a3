//! Segmented layout: child streams played one after another.

use crate::error::{StreamError, StreamResult};
use crate::stream::{CodingType, LayoutType, MetaType, StreamHandle};

use super::LayoutData;

pub struct SegmentedData {
    pub segments: Vec<StreamHandle>,
    pub current_segment: usize,
    pub output_channels: usize,
}

impl SegmentedData {
    /// Validate and finalize the segments.
    pub fn new(mut segments: Vec<StreamHandle>) -> StreamResult<Self> {
        let Some(first) = segments.first() else {
            return Err(StreamError::InvalidStream("no segments".to_string()));
        };
        let output_channels = first.desc.channels;

        for (i, segment) in segments.iter_mut().enumerate() {
            if segment.desc.channels != output_channels {
                return Err(StreamError::InvalidStream(format!(
                    "segment {} has {} channels, expected {}",
                    i, segment.desc.channels, output_channels
                )));
            }
            if segment.desc.num_samples <= 0 {
                return Err(StreamError::InvalidStream(format!(
                    "segment {} is empty",
                    i
                )));
            }
            // segments never loop on their own
            segment.desc.loop_flag = false;
            segment.finalize();
        }

        Ok(Self {
            segments,
            current_segment: 0,
            output_channels,
        })
    }

    pub fn reset(&mut self) {
        self.current_segment = 0;
        for segment in self.segments.iter_mut() {
            segment.reset();
        }
    }

    /// Segment holding `sample` and how far into it the sample lies.
    pub fn locate(&self, sample: i32) -> Option<(usize, i32)> {
        let mut start = 0;
        for (i, segment) in self.segments.iter().enumerate() {
            let count = segment.desc.num_samples;
            if sample >= start && sample < start + count {
                return Some((i, sample - start));
            }
            start += count;
        }
        None
    }
}

/// Wrap `segments` into one stream, optionally looping over
/// `[loop_start, loop_end)` of the whole.
pub fn build_segmented(
    segments: Vec<StreamHandle>,
    loop_points: Option<(i32, i32)>,
) -> StreamResult<StreamHandle> {
    let data = SegmentedData::new(segments)?;
    let num_samples: i32 = data.segments.iter().map(|s| s.desc.num_samples).sum();
    let first = &data.segments[0].desc;
    let sample_rate = first.sample_rate;
    let coding = first.coding;

    let mut h = StreamHandle::allocate(data.output_channels, loop_points.is_some())?;
    h.desc.sample_rate = sample_rate;
    h.desc.num_samples = num_samples;
    h.desc.coding = if data.segments.iter().all(|s| s.desc.coding == coding) {
        coding
    } else {
        CodingType::Silence
    };
    h.desc.layout = LayoutType::Segmented;
    h.desc.meta = MetaType::Segmented;
    if let Some((start, end)) = loop_points {
        h.desc.loop_start_sample = start;
        h.desc.loop_end_sample = end;
    }
    h.layout_data = LayoutData::Segmented(data);
    Ok(h)
}

pub fn render_segmented(buffer: &mut [i16], sample_count: usize, h: &mut StreamHandle) {
    let channels = h.desc.channels;
    let mut samples_written = 0usize;

    while samples_written < sample_count {
        if h.desc.loop_flag && h.do_loop() {
            let loop_start = h.desc.loop_start_sample;
            let LayoutData::Segmented(data) = &mut h.layout_data else {
                return;
            };

            let (loop_segment, skip) = data.locate(loop_start).unwrap_or_else(|| {
                log::warn!("can't find loop segment");
                (0, 0)
            });
            data.current_segment = loop_segment;
            let segment = &mut data.segments[loop_segment];
            segment.reset();
            if skip > 0 {
                skip_samples(segment, skip as usize);
            }
            h.state.samples_into_block = skip;
            continue;
        }

        let LayoutData::Segmented(data) = &h.layout_data else {
            buffer[samples_written * channels..sample_count * channels].fill(0);
            return;
        };
        let current = data.current_segment;
        let segment_count = data.segments.len();
        let samples_this_block = data.segments[current].desc.num_samples;

        let mut samples_to_do = h.samples_to_do(samples_this_block, 1);
        let remaining = (sample_count - samples_written) as i32;
        if samples_to_do > remaining {
            samples_to_do = remaining;
        }

        if samples_to_do <= 0 {
            if samples_to_do < 0 || current + 1 >= segment_count {
                // past the last segment
                buffer[samples_written * channels..sample_count * channels].fill(0);
                break;
            }
            if let LayoutData::Segmented(data) = &mut h.layout_data {
                data.current_segment += 1;
                data.segments[current + 1].reset();
            }
            h.state.samples_into_block = 0;
            continue;
        }

        let start = samples_written * channels;
        let end = start + samples_to_do as usize * channels;
        if let LayoutData::Segmented(data) = &mut h.layout_data {
            data.segments[current].render(&mut buffer[start..end], samples_to_do as usize);
        }

        samples_written += samples_to_do as usize;
        h.state.current_sample += samples_to_do;
        h.state.samples_into_block += samples_to_do;
    }
}

/// Decode and discard `count` samples of `h`.
pub(crate) fn skip_samples(h: &mut StreamHandle, count: usize) {
    let channels = h.desc.channels;
    let mut scratch = vec![0i16; super::LAYER_SAMPLE_BUFFER * channels];
    let mut left = count;
    while left > 0 {
        let n = left.min(super::LAYER_SAMPLE_BUFFER);
        h.render(&mut scratch[..n * channels], n);
        left -= n;
    }
}
