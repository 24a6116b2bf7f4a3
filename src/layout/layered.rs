//! Layered layout: child streams played at the same time, their channels
//! laid side by side in the output.

use crate::error::{StreamError, StreamResult};
use crate::stream::{LayoutType, MetaType, StreamHandle};

use super::{LayoutData, LAYER_SAMPLE_BUFFER};

pub struct LayeredData {
    pub layers: Vec<StreamHandle>,
    pub output_channels: usize,
    buffer: Vec<i16>,
}

impl LayeredData {
    /// Validate and finalize the layers.
    pub fn new(mut layers: Vec<StreamHandle>) -> StreamResult<Self> {
        if layers.is_empty() {
            return Err(StreamError::InvalidStream("no layers".to_string()));
        }

        let output_channels: usize = layers.iter().map(|l| l.desc.channels).sum();
        let max_channels = layers.iter().map(|l| l.desc.channels).max().unwrap_or(1);

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(LAYER_SAMPLE_BUFFER * max_channels)
            .map_err(|_| StreamError::ResourceExhausted("layer buffer"))?;
        buffer.resize(LAYER_SAMPLE_BUFFER * max_channels, 0);

        for layer in layers.iter_mut() {
            layer.finalize();
        }

        Ok(Self {
            layers,
            output_channels,
            buffer,
        })
    }

    pub fn reset(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.reset();
        }
    }
}

/// Stack `layers` into one stream. Loop points, when given, are pushed
/// into every layer.
pub fn build_layered(
    layers: Vec<StreamHandle>,
    loop_points: Option<(i32, i32)>,
) -> StreamResult<StreamHandle> {
    let data = LayeredData::new(layers)?;
    let first = &data.layers[0].desc;
    let sample_rate = first.sample_rate;
    let coding = first.coding;
    let num_samples = data
        .layers
        .iter()
        .map(|l| l.desc.num_samples)
        .max()
        .unwrap_or(0);

    let mut h = StreamHandle::allocate(data.output_channels, loop_points.is_some())?;
    h.desc.sample_rate = sample_rate;
    h.desc.num_samples = num_samples;
    h.desc.coding = coding;
    h.desc.layout = LayoutType::Layered;
    h.desc.meta = MetaType::Layered;
    h.layout_data = LayoutData::Layered(data);

    if let Some((start, end)) = loop_points {
        h.force_loop(true, start, end);
        if let LayoutData::Layered(data) = &mut h.layout_data {
            for layer in data.layers.iter_mut() {
                layer.finalize();
            }
        }
    }
    Ok(h)
}

pub fn render_layered(buffer: &mut [i16], sample_count: usize, h: &mut StreamHandle) {
    let channels = h.desc.channels;
    let mut samples_written = 0usize;

    while samples_written < sample_count {
        // layers loop on their own
        if h.desc.loop_flag && h.do_loop() {
            continue;
        }

        let mut samples_to_do = h.samples_to_do(LAYER_SAMPLE_BUFFER as i32, 1);
        let remaining = (sample_count - samples_written) as i32;
        if samples_to_do > remaining {
            samples_to_do = remaining;
        }
        if samples_to_do <= 0 {
            buffer[samples_written * channels..sample_count * channels].fill(0);
            break;
        }
        let todo = samples_to_do as usize;

        let LayoutData::Layered(data) = &mut h.layout_data else {
            buffer[samples_written * channels..sample_count * channels].fill(0);
            return;
        };

        let mut out_ch = 0;
        for layer in data.layers.iter_mut() {
            let layer_channels = layer.desc.channels;
            let scratch = &mut data.buffer[..todo * layer_channels];
            layer.render(scratch, todo);

            for layer_ch in 0..layer_channels {
                for s in 0..todo {
                    buffer[(samples_written + s) * channels + out_ch] =
                        scratch[s * layer_channels + layer_ch];
                }
                out_ch += 1;
            }
        }

        samples_written += todo;
        h.state.current_sample = data.layers[0].state.current_sample;
    }
}
