//! Sony VAG (mono PS-ADPCM)
//!
//! Big endian header: "VAGp", version, data size at 0x0c, sample rate at
//! 0x10 and a 16-byte name at 0x20. Data starts at 0x30. Loops are not in
//! the header; they are marked by frame flags.

use crate::coding::psx::{bytes_to_samples, PSX_FRAME_SIZE, PSX_SAMPLES_PER_FRAME};
use crate::error::{StreamError, StreamResult};
use crate::io::{Resource, ResourceExt};
use crate::stream::{CodingType, LayoutType, MetaType, StreamHandle};

const VAG_ID: &[u8] = b"VAGp";
const VAG_HEADER_SIZE: u64 = 0x30;

const FLAG_LOOP_START: u8 = 0x06;
const FLAG_LOOP_END: u8 = 0x03;

/// Scan frame flags for loop start and end markers, in samples.
fn find_loop_points(res: &mut dyn Resource, start: u64, size: u64) -> Option<(i32, i32)> {
    let mut loop_start = None;
    let mut loop_end = None;
    let mut frame = 0u64;

    while frame * PSX_FRAME_SIZE < size {
        let mut flag = [0u8; 1];
        if res.read(start + frame * PSX_FRAME_SIZE + 1, &mut flag) != 1 {
            break;
        }
        match flag[0] {
            FLAG_LOOP_START if loop_start.is_none() => {
                loop_start = Some(frame as i32 * PSX_SAMPLES_PER_FRAME);
            }
            FLAG_LOOP_END => {
                loop_end = Some((frame as i32 + 1) * PSX_SAMPLES_PER_FRAME);
                break;
            }
            _ => {}
        }
        frame += 1;
    }

    match (loop_start, loop_end) {
        (Some(start), Some(end)) if end > start => Some((start, end)),
        _ => None,
    }
}

pub fn probe_vag(res: &mut dyn Resource) -> StreamResult<StreamHandle> {
    if !res.has_magic(0, VAG_ID) {
        return Err(StreamError::RejectedFormat("not a VAG file".to_string()));
    }

    let data_size = (res.read_u32be_at(0x0c)? as u64)
        .min(res.size().saturating_sub(VAG_HEADER_SIZE));
    let sample_rate = res.read_u32be_at(0x10)?;

    let mut name = [0u8; 0x10];
    res.read_exact_at(0x20, &mut name)?;
    let name_len = name.iter().position(|&b| b == 0).unwrap_or(name.len());
    let stream_name = String::from_utf8_lossy(&name[..name_len]).trim().to_string();

    let loop_points = find_loop_points(res, VAG_HEADER_SIZE, data_size);

    let mut h = StreamHandle::allocate(1, loop_points.is_some())?;
    h.desc.sample_rate = sample_rate.min(i32::MAX as u32) as i32;
    h.desc.num_samples = bytes_to_samples(data_size, 1);
    h.desc.coding = CodingType::Psx;
    h.desc.layout = LayoutType::None;
    h.desc.meta = MetaType::PsxVag;
    h.desc.stream_name = stream_name;
    h.desc.allow_dual_stereo = true;
    if let Some((start, end)) = loop_points {
        h.desc.loop_start_sample = start;
        h.desc.loop_end_sample = end;
    }

    h.open_stream(res, VAG_HEADER_SIZE)?;
    Ok(h)
}
