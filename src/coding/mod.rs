//! Sample decoders
//!
//! Frame-based decoders (PCM, DSP, PSX, IMA) are stateless functions over a
//! channel cursor; everything they carry between calls lives in
//! [`ChannelState`]. Decoders that keep their own state (Vorbis) live in
//! the handle's [`CodecData`] payload.

pub mod dsp;
pub mod ima;
pub mod pcm;
pub mod psx;
pub mod vorbis;

pub use vorbis::VorbisCodec;

use crate::stream::{ChannelState, CodingType, StreamHandle};

/// Codec-owned state of a handle.
#[derive(Default)]
pub enum CodecData {
    #[default]
    None,
    Vorbis(Box<VorbisCodec>),
}

impl CodecData {
    /// Restart hook, run by [`StreamHandle::reset`].
    pub fn reset(&mut self) {
        match self {
            CodecData::None => {}
            CodecData::Vorbis(codec) => codec.reset(),
        }
    }

    /// Loop hook: position transform codecs at `sample`.
    pub fn seek(&mut self, sample: i32) {
        match self {
            CodecData::None => {}
            CodecData::Vorbis(codec) => codec.seek(sample),
        }
    }

    /// Name and size of the resource the codec reads itself, if any.
    pub fn resource(&self) -> Option<(&str, u64)> {
        match self {
            CodecData::None => None,
            CodecData::Vorbis(codec) => Some((codec.resource_name(), codec.resource_size())),
        }
    }
}

/// Whether the crate has a decoder for `coding`.
pub fn can_decode(coding: CodingType) -> bool {
    use CodingType::*;
    matches!(
        coding,
        Pcm16Le
            | Pcm16Be
            | Pcm16Int
            | Pcm8
            | Pcm8Int
            | Pcm8U
            | Pcm8UInt
            | NgcDsp
            | Psx
            | PsxBadFlags
            | Ima
            | MsIma
            | OggVorbis
    )
}

/// Decode `samples_to_do` frames for every channel into `buffer`, starting
/// at frame `samples_written`. Codings without a decoder produce silence.
pub fn decode_frames(
    handle: &mut StreamHandle,
    buffer: &mut [i16],
    samples_written: usize,
    samples_to_do: i32,
) {
    let channels = handle.desc.channels;
    let start = samples_written * channels;
    let end = start + samples_to_do.max(0) as usize * channels;
    if samples_to_do <= 0 || end > buffer.len() {
        return;
    }

    let coding = handle.desc.coding;
    if coding == CodingType::OggVorbis {
        match &mut handle.codec {
            CodecData::Vorbis(codec) => {
                codec.decode(&mut buffer[start..end], channels, samples_to_do as usize)
            }
            CodecData::None => buffer[start..end].fill(0),
        }
        return;
    }

    if !can_decode(coding) {
        buffer[start..end].fill(0);
        return;
    }

    let first_sample = handle.state.samples_into_block;
    let block_size = handle.desc.interleave_block_size;

    for ch in 0..channels {
        let out = &mut buffer[start + ch..end];
        let res = &mut handle.resources;
        let stream: &mut ChannelState = &mut handle.ch[ch];

        match coding {
            CodingType::Pcm16Le => {
                pcm::decode_pcm16le(res, stream, out, channels, first_sample, samples_to_do)
            }
            CodingType::Pcm16Be => {
                pcm::decode_pcm16be(res, stream, out, channels, first_sample, samples_to_do)
            }
            CodingType::Pcm16Int => {
                pcm::decode_pcm16_int(res, stream, out, channels, first_sample, samples_to_do)
            }
            CodingType::Pcm8 | CodingType::Pcm8Int => pcm::decode_pcm8(
                res,
                stream,
                out,
                channels,
                first_sample,
                samples_to_do,
                coding == CodingType::Pcm8Int,
            ),
            CodingType::Pcm8U | CodingType::Pcm8UInt => pcm::decode_pcm8_unsigned(
                res,
                stream,
                out,
                channels,
                first_sample,
                samples_to_do,
                coding == CodingType::Pcm8UInt,
            ),
            CodingType::NgcDsp => {
                dsp::decode_ngc_dsp(res, stream, out, channels, first_sample, samples_to_do)
            }
            CodingType::Psx | CodingType::PsxBadFlags => psx::decode_psx(
                res,
                stream,
                out,
                channels,
                first_sample,
                samples_to_do,
                coding == CodingType::PsxBadFlags,
            ),
            CodingType::Ima => {
                ima::decode_ima(res, stream, out, channels, first_sample, samples_to_do)
            }
            CodingType::MsIma => ima::decode_ms_ima(
                res,
                stream,
                out,
                channels,
                first_sample,
                samples_to_do,
                ch,
                channels,
                block_size,
            ),
            _ => {}
        }
    }
}
