//! Nintendo DSP standard header (mono)
//!
//! 0x60 bytes, big endian:
//! ```text
//! 0x00 sample count        0x04 nibble count       0x08 sample rate
//! 0x0c loop flag (u16)     0x0e format (u16, 0)    0x10 loop start (nibbles)
//! 0x14 loop end (nibbles)  0x18 current address    0x1c coefficients [16]
//! 0x3c gain                0x3e initial ps         0x40 history 1, 2
//! 0x44 loop ps             0x46 loop history 1, 2
//! ```
//! Stereo music is often two of these files side by side, so the stream
//! opts into dual-file stereo.

use crate::coding::dsp::{nibbles_to_samples, DSP_FRAME_SIZE};
use crate::error::{StreamError, StreamResult};
use crate::io::{Resource, ResourceExt};
use crate::stream::{CodingType, LayoutType, MetaType, StreamHandle};

pub const DSP_HEADER_SIZE: u64 = 0x60;

#[derive(Debug, Default)]
struct DspHeader {
    sample_count: u32,
    nibble_count: u32,
    sample_rate: u32,
    loop_flag: u16,
    format: u16,
    loop_start_offset: u32,
    loop_end_offset: u32,
    coef: [i16; 16],
    initial_ps: u16,
    initial_hist1: i16,
    initial_hist2: i16,
    loop_ps: u16,
}

fn read_header(res: &mut dyn Resource, offset: u64) -> StreamResult<DspHeader> {
    let mut header = DspHeader {
        sample_count: res.read_u32be_at(offset)?,
        nibble_count: res.read_u32be_at(offset + 0x04)?,
        sample_rate: res.read_u32be_at(offset + 0x08)?,
        loop_flag: res.read_u16be_at(offset + 0x0c)?,
        format: res.read_u16be_at(offset + 0x0e)?,
        loop_start_offset: res.read_u32be_at(offset + 0x10)?,
        loop_end_offset: res.read_u32be_at(offset + 0x14)?,
        initial_ps: res.read_u16be_at(offset + 0x3e)?,
        initial_hist1: res.read_i16be_at(offset + 0x40)?,
        initial_hist2: res.read_i16be_at(offset + 0x42)?,
        loop_ps: res.read_u16be_at(offset + 0x44)?,
        ..Default::default()
    };
    for (i, coef) in header.coef.iter_mut().enumerate() {
        *coef = res.read_i16be_at(offset + 0x1c + i as u64 * 2)?;
    }
    Ok(header)
}

pub fn probe_dsp_std(res: &mut dyn Resource) -> StreamResult<StreamHandle> {
    let header = read_header(res, 0)?;
    let start_offset = DSP_HEADER_SIZE;

    if header.format != 0 {
        return Err(StreamError::RejectedFormat(format!(
            "DSP format {:#x} is not ADPCM",
            header.format
        )));
    }
    if header.sample_count == 0
        || header.sample_count as i64 > nibbles_to_samples(header.nibble_count) as i64
    {
        return Err(StreamError::RejectedFormat(
            "DSP sample count does not fit the nibble count".to_string(),
        ));
    }
    // the first frame header must repeat the initial predictor/scale
    if header.initial_ps != res.read_u8_at(start_offset)? as u16 {
        return Err(StreamError::RejectedFormat(
            "DSP initial ps does not match the data".to_string(),
        ));
    }

    let loop_flag = header.loop_flag != 0;
    if loop_flag {
        let loop_frame = header.loop_start_offset as u64 / 16 * DSP_FRAME_SIZE;
        if header.loop_ps != res.read_u8_at(start_offset + loop_frame)? as u16 {
            return Err(StreamError::RejectedFormat(
                "DSP loop ps does not match the data".to_string(),
            ));
        }
    }

    let mut h = StreamHandle::allocate(1, loop_flag)?;
    h.desc.sample_rate = header.sample_rate.min(i32::MAX as u32) as i32;
    h.desc.num_samples = header.sample_count as i32;
    h.desc.coding = CodingType::NgcDsp;
    h.desc.layout = LayoutType::None;
    h.desc.meta = MetaType::DspStd;
    h.desc.allow_dual_stereo = true;
    if loop_flag {
        h.desc.loop_start_sample = nibbles_to_samples(header.loop_start_offset);
        h.desc.loop_end_sample = nibbles_to_samples(header.loop_end_offset) + 1;
    }

    h.open_stream(res, start_offset)?;

    let cursor = &mut h.ch[0];
    cursor.adpcm_coef = header.coef;
    cursor.adpcm_history1_16 = header.initial_hist1;
    cursor.adpcm_history2_16 = header.initial_hist2;
    Ok(h)
}
