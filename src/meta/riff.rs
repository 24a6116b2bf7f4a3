//! RIFF WAVE prober
//!
//! Handles:
//! - 8-bit unsigned and 16-bit little endian PCM
//! - Microsoft IMA ADPCM (format 0x11)
//! - `smpl` chunk loop points
//!
//! Chunks are walked in file order; unknown chunks are skipped.

use crate::coding::ima::ms_ima_bytes_to_samples;
use crate::error::{StreamError, StreamResult};
use crate::io::{Resource, ResourceExt};
use crate::stream::{CodingType, LayoutType, MetaType, StreamHandle};

// Chunk IDs as little endian u32
const RIFF_ID: u32 = 0x46464952; // "RIFF"
const WAVE_ID: u32 = 0x45564157; // "WAVE"
const FMT_ID: u32 = 0x20746d66; // "fmt "
const DATA_ID: u32 = 0x61746164; // "data"
const SMPL_ID: u32 = 0x6c706d73; // "smpl"

const WAVE_FORMAT_PCM: u16 = 0x0001;
const WAVE_FORMAT_IMA_ADPCM: u16 = 0x0011;

/// `fmt ` chunk fields the prober uses.
#[derive(Debug, Default)]
struct FmtChunk {
    format: u16,
    channels: u16,
    sample_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
}

fn read_fmt(res: &mut dyn Resource, offset: u64, size: u64) -> StreamResult<FmtChunk> {
    if size < 0x10 {
        return Err(StreamError::InvalidStream("fmt chunk too small".to_string()));
    }
    Ok(FmtChunk {
        format: res.read_u16le_at(offset)?,
        channels: res.read_u16le_at(offset + 0x02)?,
        sample_rate: res.read_u32le_at(offset + 0x04)?,
        block_align: res.read_u16le_at(offset + 0x0c)?,
        bits_per_sample: res.read_u16le_at(offset + 0x0e)?,
    })
}

/// First forward loop of a `smpl` chunk. The stored end is inclusive.
fn read_smpl(res: &mut dyn Resource, offset: u64, size: u64) -> StreamResult<Option<(i32, i32)>> {
    if size < 0x24 + 0x18 {
        return Ok(None);
    }
    let loop_count = res.read_u32le_at(offset + 0x1c)?;
    let loop_type = res.read_u32le_at(offset + 0x24 + 0x04)?;
    if loop_count == 0 || loop_type != 0 {
        return Ok(None);
    }
    let start = res.read_u32le_at(offset + 0x24 + 0x08)?;
    let end = res.read_u32le_at(offset + 0x24 + 0x0c)?;
    Ok(Some((start as i32, end.saturating_add(1) as i32)))
}

pub fn probe_riff(res: &mut dyn Resource) -> StreamResult<StreamHandle> {
    if res.read_u32le_at(0x00)? != RIFF_ID || res.read_u32le_at(0x08)? != WAVE_ID {
        return Err(StreamError::RejectedFormat("not a RIFF WAVE file".to_string()));
    }

    let file_size = res.size();
    let riff_end = (res.read_u32le_at(0x04)? as u64 + 0x08).min(file_size);

    let mut fmt = None;
    let mut data = None;
    let mut loop_points = None;

    let mut offset = 0x0c;
    while offset + 0x08 <= riff_end {
        let id = res.read_u32le_at(offset)?;
        let size = res.read_u32le_at(offset + 0x04)? as u64;
        let body = offset + 0x08;

        match id {
            FMT_ID => fmt = Some(read_fmt(res, body, size)?),
            DATA_ID => data = Some((body, size.min(file_size.saturating_sub(body)))),
            SMPL_ID => loop_points = read_smpl(res, body, size)?,
            _ => {}
        }

        // chunks are word aligned
        offset = body + size + (size & 1);
    }

    let fmt = fmt.ok_or_else(|| StreamError::InvalidStream("no fmt chunk".to_string()))?;
    let (start_offset, data_size) =
        data.ok_or_else(|| StreamError::InvalidStream("no data chunk".to_string()))?;

    let channels = fmt.channels as usize;
    if channels == 0 {
        return Err(StreamError::InvalidChannelCount(0));
    }

    let (coding, layout, interleave, num_samples) = match (fmt.format, fmt.bits_per_sample) {
        (WAVE_FORMAT_PCM, 16) => (
            CodingType::Pcm16Le,
            LayoutType::Interleave,
            0x02,
            (data_size / (2 * channels as u64)) as i32,
        ),
        (WAVE_FORMAT_PCM, 8) => (
            CodingType::Pcm8U,
            LayoutType::Interleave,
            0x01,
            (data_size / channels as u64) as i32,
        ),
        (WAVE_FORMAT_IMA_ADPCM, 4) if fmt.block_align > 0 => (
            CodingType::MsIma,
            LayoutType::None,
            fmt.block_align as u64,
            ms_ima_bytes_to_samples(data_size, fmt.block_align as u64, channels),
        ),
        (format, bits) => {
            return Err(StreamError::RejectedFormat(format!(
                "unsupported WAVE format {:#x} ({} bits)",
                format, bits
            )))
        }
    };

    let mut h = StreamHandle::allocate(channels, loop_points.is_some())?;
    h.desc.sample_rate = fmt.sample_rate.min(i32::MAX as u32) as i32;
    h.desc.num_samples = num_samples;
    h.desc.coding = coding;
    h.desc.layout = if channels == 1 && layout == LayoutType::Interleave {
        LayoutType::None
    } else {
        layout
    };
    h.desc.interleave_block_size = interleave;
    h.desc.meta = MetaType::Riff;
    if let Some((start, end)) = loop_points {
        h.desc.loop_start_sample = start;
        h.desc.loop_end_sample = end;
    }

    h.open_stream(res, start_offset)?;
    Ok(h)
}
