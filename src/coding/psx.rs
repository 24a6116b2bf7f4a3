//! Playstation 4-bit ADPCM (VAG)
//!
//! 16-byte frames: predictor/shift byte, flag byte, 28 nibbles.

use crate::io::ResourceRegistry;
use crate::stream::ChannelState;

pub const PSX_FRAME_SIZE: u64 = 0x10;
pub const PSX_SAMPLES_PER_FRAME: i32 = 28;

/// Predictor coefficients in 1/64 units.
#[rustfmt::skip]
static PSX_COEFS: [[i32; 2]; 5] = [
    [0, 0],
    [60, 0],
    [115, -52],
    [98, -55],
    [122, -60],
];

/// Frame flag marking the end of the stream; the frame decodes to silence.
const FLAG_END: u8 = 0x07;

pub fn decode_psx(
    res: &mut ResourceRegistry,
    stream: &mut ChannelState,
    out: &mut [i16],
    spacing: usize,
    first_sample: i32,
    samples_to_do: i32,
    bad_flags: bool,
) {
    let frames_in = (first_sample / PSX_SAMPLES_PER_FRAME) as u64;
    let frame_offset = stream.offset + frames_in * PSX_FRAME_SIZE;

    let header = res.read_u8(stream.resource, frame_offset);
    let flag = res.read_u8(stream.resource, frame_offset + 1);
    let predictor = (header >> 4) as usize;
    let mut shift = (header & 0x0F) as i32;
    if shift > 12 {
        shift = 9;
    }
    let [coef1, coef2] = PSX_COEFS.get(predictor).copied().unwrap_or([0, 0]);

    // some rips carry garbage in the flag byte
    let silent = !bad_flags && flag == FLAG_END;

    let mut hist1 = stream.adpcm_history1_32;
    let mut hist2 = stream.adpcm_history2_32;

    let first = first_sample % PSX_SAMPLES_PER_FRAME;
    for (n, i) in (first..first + samples_to_do).enumerate() {
        let mut sample = 0;
        if !silent {
            let byte = res.read_u8(stream.resource, frame_offset + 2 + (i / 2) as u64);
            let nibble = if i & 1 == 1 { byte >> 4 } else { byte & 0x0F };
            let scaled = ((((nibble as i32) << 28) >> 28) << 12) >> shift;
            sample = scaled + ((hist1 * coef1 + hist2 * coef2) >> 6);
        }

        out[n * spacing] = sample.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        hist2 = hist1;
        hist1 = sample;
    }

    stream.adpcm_history1_32 = hist1;
    stream.adpcm_history2_32 = hist2;
}

/// Samples held by `bytes` bytes of PSX data.
pub fn bytes_to_samples(bytes: u64, channels: usize) -> i32 {
    if channels == 0 {
        return 0;
    }
    let samples = bytes / channels as u64 / PSX_FRAME_SIZE * PSX_SAMPLES_PER_FRAME as u64;
    samples.min(i32::MAX as u64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryFs;

    fn channel(data: Vec<u8>) -> (ResourceRegistry, ChannelState) {
        let fs = MemoryFs::new();
        fs.insert("vag", data);
        let mut reg = ResourceRegistry::new();
        let id = reg.insert(Box::new(fs.open("vag").unwrap()));
        (
            reg,
            ChannelState {
                resource: Some(id),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_decode_predictor_zero() {
        // shift 12: nibble value passes through unchanged
        let mut frame = vec![0x0C, 0x00, 0x21, 0xF7];
        frame.resize(16, 0);
        let (mut reg, mut stream) = channel(frame);

        let mut out = [0i16; 4];
        decode_psx(&mut reg, &mut stream, &mut out, 1, 0, 4, false);
        assert_eq!(out, [1, 2, 7, -1]);
        assert_eq!(stream.adpcm_history1_32, -1);
        assert_eq!(stream.adpcm_history2_32, 7);
    }

    #[test]
    fn test_end_flag_silences_unless_bad_flags() {
        let mut frame = vec![0x0C, FLAG_END, 0x33];
        frame.resize(16, 0);

        let (mut reg, mut stream) = channel(frame.clone());
        let mut out = [9i16; 2];
        decode_psx(&mut reg, &mut stream, &mut out, 1, 0, 2, false);
        assert_eq!(out, [0, 0]);

        let (mut reg, mut stream) = channel(frame);
        decode_psx(&mut reg, &mut stream, &mut out, 1, 0, 2, true);
        assert_eq!(out, [3, 3]);
    }

    #[test]
    fn test_decode_second_frame_with_history() {
        let mut data = vec![0u8; 32];
        data[16] = 0x1C; // predictor 1, shift 12
        let (mut reg, mut stream) = channel(data);
        stream.adpcm_history1_32 = 640;

        let mut out = [0i16; 2];
        decode_psx(&mut reg, &mut stream, &mut out, 1, 28, 2, false);
        // 640 * 60 / 64 = 600, then 600 * 60 / 64 = 562
        assert_eq!(out, [600, 562]);
    }

    #[test]
    fn test_bytes_to_samples() {
        assert_eq!(bytes_to_samples(0x100, 1), 448);
        assert_eq!(bytes_to_samples(0x100, 2), 224);
    }
}
