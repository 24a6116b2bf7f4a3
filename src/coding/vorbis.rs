//! Ogg Vorbis decoding
//!
//! Uses the `lewton` crate. The codec owns its own resource (through a
//! [`ResourceReader`]); lewton has no sample-accurate seek, so seeking
//! rewinds to the start and decodes forward, discarding samples.

use std::io::{Seek, SeekFrom};

use lewton::inside_ogg::OggStreamReader;

use crate::error::{StreamError, StreamResult};
use crate::io::{Resource, ResourceReader};

/// Lewton-backed decoder state.
pub struct VorbisCodec {
    reader: Option<OggStreamReader<ResourceReader>>,
    channels: usize,
    sample_rate: u32,
    /// Decoded but not yet consumed interleaved samples.
    pending: Vec<i16>,
    pending_pos: usize,
    /// Sample frames handed out since the start.
    current_sample: i64,
    name: String,
    size: u64,
}

/// Vorbis comment fields, lowercased keys.
pub type VorbisComments = Vec<(String, String)>;

impl VorbisCodec {
    /// Set up the decoder; reads the three Vorbis headers.
    pub fn open(resource: Box<dyn Resource>) -> StreamResult<Self> {
        let name = resource.name().to_string();
        let size = resource.size();
        let reader = OggStreamReader::new(ResourceReader::new(resource))?;

        let channels = reader.ident_hdr.audio_channels as usize;
        let sample_rate = reader.ident_hdr.audio_sample_rate;
        if channels == 0 {
            return Err(StreamError::Vorbis("stream has no channels".to_string()));
        }

        Ok(Self {
            reader: Some(reader),
            channels,
            sample_rate,
            pending: Vec::new(),
            pending_pos: 0,
            current_sample: 0,
            name,
            size,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Name of the resource the codec reads from.
    pub fn resource_name(&self) -> &str {
        &self.name
    }

    pub fn resource_size(&self) -> u64 {
        self.size
    }

    /// Comment header entries with lowercased keys.
    pub fn comments(&self) -> VorbisComments {
        self.reader
            .as_ref()
            .map(|r| {
                r.comment_hdr
                    .comment_list
                    .iter()
                    .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn next_packet(&mut self) -> bool {
        let Some(reader) = self.reader.as_mut() else {
            return false;
        };
        loop {
            match reader.read_dec_packet_itl() {
                Ok(Some(samples)) if samples.is_empty() => continue,
                Ok(Some(samples)) => {
                    self.pending = samples;
                    self.pending_pos = 0;
                    return true;
                }
                Ok(None) => return false,
                Err(e) => {
                    log::warn!("Ogg decode error in {}: {:?}", self.name, e);
                    return false;
                }
            }
        }
    }

    /// Decode `frames` sample frames into `out` (interleaved, `channels`
    /// wide). Past the end of the stream the rest is silence.
    pub fn decode(&mut self, out: &mut [i16], channels: usize, frames: usize) {
        let wanted = frames * channels;
        let mut written = 0;

        while written < wanted {
            if self.pending_pos >= self.pending.len() && !self.next_packet() {
                break;
            }

            let available = (self.pending.len() - self.pending_pos) / self.channels;
            let todo = available.min((wanted - written) / channels);
            if todo == 0 {
                break;
            }

            for f in 0..todo {
                let src = self.pending_pos + f * self.channels;
                let dst = written + f * channels;
                for c in 0..channels {
                    out[dst + c] = if c < self.channels { self.pending[src + c] } else { 0 };
                }
            }

            self.pending_pos += todo * self.channels;
            self.current_sample += todo as i64;
            written += todo * channels;
        }

        out[written..wanted].fill(0);
    }

    /// Rewind the stream to its first sample.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.pending_pos = 0;
        self.current_sample = 0;

        let Some(reader) = self.reader.take() else {
            return;
        };
        let mut inner = reader.into_inner().into_inner();
        if let Err(e) = inner.seek(SeekFrom::Start(0)) {
            log::warn!("cannot rewind {}: {}", self.name, e);
            return;
        }
        match OggStreamReader::new(inner) {
            Ok(reader) => self.reader = Some(reader),
            Err(e) => log::warn!("cannot restart Vorbis stream {}: {:?}", self.name, e),
        }
    }

    /// Position the decoder at `sample`.
    pub fn seek(&mut self, sample: i32) {
        let target = sample.max(0) as i64;
        if target < self.current_sample {
            self.reset();
        }

        while self.current_sample < target {
            if self.pending_pos >= self.pending.len() && !self.next_packet() {
                break;
            }
            let available = ((self.pending.len() - self.pending_pos) / self.channels) as i64;
            let skip = available.min(target - self.current_sample);
            self.pending_pos += skip as usize * self.channels;
            self.current_sample += skip;
        }
    }
}
