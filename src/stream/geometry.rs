//! Frame geometry per coding
//!
//! A frame is the smallest self-contained group of samples (for one
//! channel). 0 means the size is variable or handled inside the codec.

use super::handle::StreamDescriptor;
use super::types::CodingType;

impl StreamDescriptor {
    /// Samples per decode frame of one channel.
    pub fn samples_per_frame(&self) -> i32 {
        use CodingType::*;

        let interleave = self.interleave_block_size as i64;
        let channels = self.channels.max(1) as i64;

        let samples: i64 = match self.coding {
            CriAdx | CriAdxFixed | CriAdxExp | CriAdxEnc8 | CriAdxEnc9 => (interleave - 2) * 2,

            NgcDsp | NgcDspSubint => 14,
            NgcAfc => 16,
            NgcDtk => 28,
            G721 => 1,

            Pcm16Le | Pcm16Be | Pcm16Int | Pcm8 | Pcm8Int | Pcm8U | Pcm8UInt | Pcm8Sb | Ulaw
            | UlawInt | Alaw | PcmFloat => 1,
            OggVorbis | Sdx2 | Sdx2Int | Cbd2 | Acm | Derf | Nwa | Sassc => 1,

            Ima | DviIma | SndsIma | OtnsIma | UbiIma => 1,
            ImaInt | DviImaInt | Ima3ds | Wv6Ima | AlpIma | Ffta2Ima => 2,
            XboxIma | XboxImaMch | XboxImaInt | FsbIma | WwiseIma => 64,
            AppleIma4 => 64,
            MsIma | RefIma => (interleave - 0x04 * channels) * 2 / channels + 1,
            RadIma => (interleave - 0x04 * channels) * 2 / channels,
            NdsIma | Dat4Ima => (interleave - 0x04) * 2,
            AwcIma => (0x800 - 0x04) * 2,
            RadImaMono => 32,
            H4mIma => 0,

            Xa => 28 * 8 / channels,
            Psx | PsxBadFlags | Hevag => 28,
            PsxCfg => (interleave - 1) * 2,

            EaXa | EaXaInt | EaXaV2 | MaxisXa => 28,
            EaXas => 128,

            MsAdpcm => (interleave - 0x07 * channels) * 2 / channels + 2,
            MsAdpcmCk => (interleave - 0x07) * 2 + 2,
            Aica => 1,
            AicaInt => 2,
            Yamaha => (0x40 - 0x04 * channels) * 2 / channels,
            YamahaNxap => (0x40 - 0x04) * 2,
            NdsProcyon => 30,
            L5555 => 32,
            Lsf => 54,

            Mtaf | Mta2 => 128 * 2,
            Mc3 => 10,
            Fadpcm => 256,
            Asf => 32,
            Xmd => (interleave - 0x06) * 2 + 2,
            EaMt => 0,
            CriHca => 0,
            Ffmpeg => 0,
            Silence => 0,
        };

        samples.clamp(0, i32::MAX as i64) as i32
    }

    /// Bytes per decode frame of one channel.
    pub fn frame_size(&self) -> u64 {
        use CodingType::*;

        let interleave = self.interleave_block_size;
        let channels = self.channels.max(1) as u64;

        match self.coding {
            CriAdx | CriAdxFixed | CriAdxExp | CriAdxEnc8 | CriAdxEnc9 => interleave,

            NgcDsp => 0x08,
            NgcDspSubint => 0x08 * channels,
            NgcAfc => 0x09,
            NgcDtk => 0x20,
            G721 => 0,

            Pcm16Le | Pcm16Be | Pcm16Int => 0x02,
            Pcm8 | Pcm8Int | Pcm8U | Pcm8UInt | Pcm8Sb | Ulaw | UlawInt | Alaw => 0x01,
            PcmFloat => 0x04,

            Sdx2 | Sdx2Int | Cbd2 | Derf | Nwa | Sassc => 0x01,

            Ima | ImaInt | DviIma | DviImaInt | Ima3ds | Wv6Ima | AlpIma | Ffta2Ima => 0x01,
            MsIma | RadIma | NdsIma | Dat4Ima | RefIma => interleave,
            AwcIma => 0x800,
            RadImaMono => 0x14,
            SndsIma | OtnsIma | UbiIma => 0,
            // stereo XBOX IMA would be 0x48, but interleave treats it per channel
            XboxIma => 0x24,
            XboxImaInt | WwiseIma => 0x24,
            XboxImaMch | FsbIma => 0x24 * channels,
            AppleIma4 => 0x22,
            H4mIma => 0,

            Xa => 0x80,
            Psx | PsxBadFlags | Hevag => 0x10,
            PsxCfg => interleave,

            EaXa => 0x1E,
            EaXaInt => 0x0F,
            MaxisXa => 0x0F * channels,
            EaXaV2 => 0,
            EaXas => 0x4c * channels,

            MsAdpcm | MsAdpcmCk => interleave,
            Aica | AicaInt => 0x01,
            Yamaha | YamahaNxap => 0x40,
            NdsProcyon => 0x10,
            L5555 => 0x12,
            Lsf => 0x1C,

            Mtaf => interleave,
            Mta2 => 0x90,
            Mc3 => 0x04,
            Fadpcm => 0x8c,
            Asf => 0x11,
            Xmd => interleave,
            EaMt => 0,

            CriHca | Acm | OggVorbis | Ffmpeg | Silence => 0,
        }
    }

    /// Samples in the short last frame (only NDS IMA differs from a full frame).
    pub fn samples_per_shortframe(&self) -> i32 {
        match self.coding {
            CodingType::NdsIma => {
                let samples = (self.interleave_last_block_size as i64 - 4) * 2;
                samples.clamp(0, i32::MAX as i64) as i32
            }
            _ => self.samples_per_frame(),
        }
    }

    pub fn shortframe_size(&self) -> u64 {
        match self.coding {
            CodingType::NdsIma => self.interleave_last_block_size,
            _ => self.frame_size(),
        }
    }
}
