//! File builders shared by the integration tests.

#![allow(dead_code)]

use vgm_engine::io::{MemoryFs, Resource};
use vgm_engine::{open_from_resource, StreamHandle};

/// Little endian PCM samples as bytes.
pub fn pcm16(samples: impl IntoIterator<Item = i16>) -> Vec<u8> {
    samples.into_iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// A PCM RIFF WAVE file, with an optional `smpl` loop (inclusive end).
pub fn wav(channels: u16, rate: u32, pcm: &[u8], smpl: Option<(u32, u32)>) -> Vec<u8> {
    let bits = 16u16;
    let align = channels * bits / 8;

    let mut body = b"WAVE".to_vec();
    body.extend_from_slice(b"fmt ");
    body.extend_from_slice(&16u32.to_le_bytes());
    body.extend_from_slice(&1u16.to_le_bytes());
    body.extend_from_slice(&channels.to_le_bytes());
    body.extend_from_slice(&rate.to_le_bytes());
    body.extend_from_slice(&(rate * align as u32).to_le_bytes());
    body.extend_from_slice(&align.to_le_bytes());
    body.extend_from_slice(&bits.to_le_bytes());

    if let Some((start, end)) = smpl {
        body.extend_from_slice(b"smpl");
        body.extend_from_slice(&0x3cu32.to_le_bytes());
        let mut chunk = vec![0u8; 0x3c];
        chunk[0x1c..0x20].copy_from_slice(&1u32.to_le_bytes());
        chunk[0x2c..0x30].copy_from_slice(&start.to_le_bytes());
        chunk[0x30..0x34].copy_from_slice(&end.to_le_bytes());
        body.extend_from_slice(&chunk);
    }

    body.extend_from_slice(b"data");
    body.extend_from_slice(&(pcm.len() as u32).to_le_bytes());
    body.extend_from_slice(pcm);

    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&body);
    out
}

/// Mono WAV whose sample `i` is `base + i`.
pub fn ramp_wav(base: i16, count: usize, smpl: Option<(u32, u32)>) -> Vec<u8> {
    wav(1, 22050, &pcm16((0..count).map(|i| base + i as i16)), smpl)
}

/// A standard DSP header plus `frames` frames of silence, every frame
/// header set to `ps`.
pub fn dsp_file(samples: u32, loop_nibbles: Option<(u32, u32)>, frames: usize, ps: u8) -> Vec<u8> {
    let mut data = vec![0u8; 0x60];
    data[0x00..0x04].copy_from_slice(&samples.to_be_bytes());
    data[0x04..0x08].copy_from_slice(&(frames as u32 * 16).to_be_bytes());
    data[0x08..0x0c].copy_from_slice(&32000u32.to_be_bytes());
    if let Some((start, end)) = loop_nibbles {
        data[0x0c..0x0e].copy_from_slice(&1u16.to_be_bytes());
        data[0x10..0x14].copy_from_slice(&start.to_be_bytes());
        data[0x14..0x18].copy_from_slice(&end.to_be_bytes());
        data[0x45] = ps;
    }
    for i in 0..16 {
        let coef = (i as i16 + 1) * 100;
        data[0x1c + i * 2..0x1e + i * 2].copy_from_slice(&coef.to_be_bytes());
    }
    data[0x3f] = ps;
    for _ in 0..frames {
        data.push(ps);
        data.extend_from_slice(&[0u8; 7]);
    }
    data
}

/// A 16-bit PCM AST file, one "BLCK" per entry of `blocks`. Each block
/// holds per-channel sample runs.
pub fn ast_file(channels: u16, blocks: &[Vec<Vec<i16>>], loop_points: Option<(u32, u32)>) -> Vec<u8> {
    let num_samples: usize = blocks.iter().map(|b| b[0].len()).sum();

    let mut data = vec![0u8; 0x40];
    data[..4].copy_from_slice(b"STRM");
    data[0x08..0x0a].copy_from_slice(&1u16.to_be_bytes());
    data[0x0a..0x0c].copy_from_slice(&16u16.to_be_bytes());
    data[0x0c..0x0e].copy_from_slice(&channels.to_be_bytes());
    data[0x10..0x14].copy_from_slice(&22050u32.to_be_bytes());
    data[0x14..0x18].copy_from_slice(&(num_samples as u32).to_be_bytes());
    if let Some((start, end)) = loop_points {
        data[0x0e..0x10].copy_from_slice(&1u16.to_be_bytes());
        data[0x18..0x1c].copy_from_slice(&start.to_be_bytes());
        data[0x1c..0x20].copy_from_slice(&end.to_be_bytes());
    }

    for block in blocks {
        let mut header = vec![0u8; 0x20];
        header[..4].copy_from_slice(b"BLCK");
        header[4..8].copy_from_slice(&(block[0].len() as u32 * 2).to_be_bytes());
        data.extend_from_slice(&header);
        for channel in block {
            for s in channel {
                data.extend_from_slice(&s.to_be_bytes());
            }
        }
    }

    let body = (data.len() - 0x40) as u32;
    data[0x04..0x08].copy_from_slice(&body.to_be_bytes());
    data
}

/// Insert `data` as `name` and run it through the probing pipeline.
pub fn open_mem(fs: &MemoryFs, name: &str, data: Vec<u8>) -> Option<StreamHandle> {
    fs.insert(name, data);
    let mut res = fs.open(name).ok()?;
    let handle = open_from_resource(&mut res);
    res.close();
    handle
}

/// Render `frames` frames in one call.
pub fn render_all(h: &mut StreamHandle, frames: usize) -> Vec<i16> {
    let mut buffer = vec![0i16; frames * h.desc.channels];
    let got = h.render(&mut buffer, frames);
    assert_eq!(got, frames);
    buffer
}
