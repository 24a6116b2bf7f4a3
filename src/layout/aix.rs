//! AIX layout: a grid of segments, each made of layers.
//!
//! Every segment holds one child per layer; the layers of a segment play at
//! the same time and segments play one after another. When moving into a
//! segment, each layer inherits the prediction history of the same layer in
//! the segment before it.

use crate::error::{StreamError, StreamResult};
use crate::stream::{LayoutType, MetaType, StreamHandle};

use super::segmented::skip_samples;
use super::{LayoutData, LAYER_SAMPLE_BUFFER};

pub struct AixData {
    /// `segments[segment][layer]`
    pub segments: Vec<Vec<StreamHandle>>,
    pub sample_counts: Vec<i32>,
    pub current_segment: usize,
    buffer: Vec<i16>,
}

impl AixData {
    pub fn new(mut segments: Vec<Vec<StreamHandle>>) -> StreamResult<Self> {
        let Some(first) = segments.first() else {
            return Err(StreamError::InvalidStream("no AIX segments".to_string()));
        };
        let layout: Vec<usize> = first.iter().map(|l| l.desc.channels).collect();
        if layout.is_empty() {
            return Err(StreamError::InvalidStream("no AIX layers".to_string()));
        }

        let mut sample_counts = Vec::with_capacity(segments.len());
        for (i, segment) in segments.iter_mut().enumerate() {
            let channels: Vec<usize> = segment.iter().map(|l| l.desc.channels).collect();
            if channels != layout {
                return Err(StreamError::InvalidStream(format!(
                    "AIX segment {} has layers {:?}, expected {:?}",
                    i, channels, layout
                )));
            }
            sample_counts.push(segment[0].desc.num_samples);
            for layer in segment.iter_mut() {
                layer.desc.loop_flag = false;
                layer.finalize();
            }
        }

        let max_channels = layout.iter().copied().max().unwrap_or(1);
        Ok(Self {
            segments,
            sample_counts,
            current_segment: 0,
            buffer: vec![0; LAYER_SAMPLE_BUFFER * max_channels],
        })
    }

    pub fn output_channels(&self) -> usize {
        self.segments[0].iter().map(|l| l.desc.channels).sum()
    }

    pub fn reset(&mut self) {
        self.current_segment = 0;
        for segment in self.segments.iter_mut() {
            for layer in segment.iter_mut() {
                layer.reset();
            }
        }
    }

    /// Reset `segment` and carry history over from the segment before it.
    fn enter_segment(&mut self, segment: usize) {
        self.current_segment = segment;
        for layer in 0..self.segments[segment].len() {
            self.segments[segment][layer].reset();
            if segment == 0 {
                continue;
            }
            let previous: Vec<_> = self.segments[segment - 1][layer].ch.clone();
            for (cursor, prev) in self.segments[segment][layer].ch.iter_mut().zip(previous.iter()) {
                cursor.adpcm_history1_32 = prev.adpcm_history1_32;
                cursor.adpcm_history2_32 = prev.adpcm_history2_32;
            }
        }
    }

    /// Segment holding `sample` and how far into it the sample lies.
    fn locate(&self, sample: i32) -> Option<(usize, i32)> {
        let mut start = 0;
        for (i, count) in self.sample_counts.iter().enumerate() {
            if sample >= start && sample < start + count {
                return Some((i, sample - start));
            }
            start += count;
        }
        None
    }
}

pub fn build_aix(
    segments: Vec<Vec<StreamHandle>>,
    loop_points: Option<(i32, i32)>,
) -> StreamResult<StreamHandle> {
    let data = AixData::new(segments)?;
    let first = &data.segments[0][0].desc;
    let sample_rate = first.sample_rate;
    let coding = first.coding;
    let num_samples = data.sample_counts.iter().sum();

    let mut h = StreamHandle::allocate(data.output_channels(), loop_points.is_some())?;
    h.desc.sample_rate = sample_rate;
    h.desc.num_samples = num_samples;
    h.desc.coding = coding;
    h.desc.layout = LayoutType::Aix;
    h.desc.meta = MetaType::Aix;
    if let Some((start, end)) = loop_points {
        h.desc.loop_start_sample = start;
        h.desc.loop_end_sample = end;
    }
    h.layout_data = LayoutData::Aix(data);
    Ok(h)
}

pub fn render_aix(buffer: &mut [i16], sample_count: usize, h: &mut StreamHandle) {
    let channels = h.desc.channels;
    let mut samples_written = 0usize;

    while samples_written < sample_count {
        if h.desc.loop_flag && h.do_loop() {
            let loop_start = h.desc.loop_start_sample;
            let LayoutData::Aix(data) = &mut h.layout_data else {
                return;
            };
            let (segment, skip) = data.locate(loop_start).unwrap_or_else(|| {
                log::warn!("can't find AIX loop segment");
                (0, 0)
            });
            data.enter_segment(segment);
            if skip > 0 {
                for layer in data.segments[segment].iter_mut() {
                    skip_samples(layer, skip as usize);
                }
            }
            h.state.samples_into_block = skip;
            continue;
        }

        let (current, samples_this_block) = match &h.layout_data {
            LayoutData::Aix(data) => (
                data.current_segment,
                data.sample_counts[data.current_segment],
            ),
            _ => {
                buffer[samples_written * channels..sample_count * channels].fill(0);
                return;
            }
        };

        let mut samples_to_do = h.samples_to_do(samples_this_block, 1);
        let remaining = (sample_count - samples_written) as i32;
        if samples_to_do > remaining {
            samples_to_do = remaining;
        }
        if samples_to_do <= 0 {
            // past the last segment
            buffer[samples_written * channels..sample_count * channels].fill(0);
            break;
        }
        let todo = samples_to_do as usize;

        let LayoutData::Aix(data) = &mut h.layout_data else {
            return;
        };
        let mut channels_so_far = 0;
        for layer in data.segments[current].iter_mut() {
            let layer_channels = layer.desc.channels;
            let scratch = &mut data.buffer[..todo * layer_channels];
            layer.render(scratch, todo);
            for s in 0..todo {
                for c in 0..layer_channels {
                    buffer[(samples_written + s) * channels + channels_so_far + c] =
                        scratch[s * layer_channels + c];
                }
            }
            channels_so_far += layer_channels;
        }

        samples_written += todo;
        h.state.current_sample += samples_to_do;
        h.state.samples_into_block += samples_to_do;

        if h.state.samples_into_block == samples_this_block && current + 1 < data.segments.len() {
            data.enter_segment(current + 1);
            h.state.samples_into_block = 0;
        }
    }
}
