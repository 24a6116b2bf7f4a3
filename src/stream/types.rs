//! Coding, layout and metadata tags
//!
//! These enums only name things; what each tag implies is decided by the
//! geometry table, the render dispatcher and the codec payloads.

/// Sample encoding of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodingType {
    Silence,

    // PCM
    Pcm16Le,
    Pcm16Be,
    Pcm16Int,
    Pcm8,
    Pcm8Int,
    Pcm8U,
    Pcm8UInt,
    Pcm8Sb,
    Ulaw,
    UlawInt,
    Alaw,
    PcmFloat,

    // CRI ADX
    CriAdx,
    CriAdxFixed,
    CriAdxExp,
    CriAdxEnc8,
    CriAdxEnc9,

    // Nintendo
    NgcDsp,
    NgcDspSubint,
    NgcAfc,
    NgcDtk,
    G721,

    // IMA family
    Ima,
    ImaInt,
    DviIma,
    DviImaInt,
    Ima3ds,
    Wv6Ima,
    AlpIma,
    Ffta2Ima,
    XboxIma,
    XboxImaMch,
    XboxImaInt,
    FsbIma,
    WwiseIma,
    AppleIma4,
    MsIma,
    RefIma,
    RadIma,
    RadImaMono,
    NdsIma,
    Dat4Ima,
    AwcIma,
    H4mIma,
    SndsIma,
    OtnsIma,
    UbiIma,

    // Sony
    Xa,
    Psx,
    PsxBadFlags,
    Hevag,
    PsxCfg,

    // EA
    EaXa,
    EaXaInt,
    EaXaV2,
    MaxisXa,
    EaXas,
    EaMt,

    MsAdpcm,
    MsAdpcmCk,
    Aica,
    AicaInt,
    Yamaha,
    YamahaNxap,
    NdsProcyon,
    L5555,
    Lsf,
    Mtaf,
    Mta2,
    Mc3,
    Fadpcm,
    Asf,
    Xmd,
    Sdx2,
    Sdx2Int,
    Cbd2,
    Derf,
    Sassc,

    // Codec-managed
    CriHca,
    Acm,
    Nwa,
    OggVorbis,
    Ffmpeg,
}

impl CodingType {
    /// Codings whose decoder owns its own resource and offsets.
    pub fn is_codec_managed(self) -> bool {
        matches!(
            self,
            CodingType::Nwa
                | CodingType::Acm
                | CodingType::CriHca
                | CodingType::Ffmpeg
                | CodingType::OggVorbis
        )
    }

    pub fn description(self) -> &'static str {
        use CodingType::*;
        match self {
            Silence => "Silence",
            Pcm16Le => "Little Endian 16-bit PCM",
            Pcm16Be => "Big Endian 16-bit PCM",
            Pcm16Int => "16-bit PCM with 2 byte interleave (block)",
            Pcm8 => "8-bit PCM",
            Pcm8Int => "8-bit PCM with 1 byte interleave (block)",
            Pcm8U => "8-bit unsigned PCM",
            Pcm8UInt => "8-bit unsigned PCM with 1 byte interleave (block)",
            Pcm8Sb => "8-bit PCM with sign bit",
            Ulaw => "8-bit u-Law",
            UlawInt => "8-bit u-Law with 1 byte interleave (block)",
            Alaw => "8-bit a-Law",
            PcmFloat => "32-bit float PCM",
            CriAdx => "CRI ADX 4-bit ADPCM",
            CriAdxFixed => "CRI ADX 4-bit ADPCM (fixed coefficients)",
            CriAdxExp => "CRI ADX 4-bit ADPCM (exponential scale)",
            CriAdxEnc8 => "CRI ADX 4-bit ADPCM (type 8 encryption)",
            CriAdxEnc9 => "CRI ADX 4-bit ADPCM (type 9 encryption)",
            NgcDsp => "Nintendo DSP 4-bit ADPCM",
            NgcDspSubint => "Nintendo DSP 4-bit ADPCM (subinterleave)",
            NgcAfc => "Nintendo AFC 4-bit ADPCM",
            NgcDtk => "Nintendo DTK 4-bit ADPCM",
            G721 => "CCITT G.721 4-bit ADPCM",
            Ima => "IMA 4-bit ADPCM",
            ImaInt => "IMA 4-bit ADPCM (mono/interleave)",
            DviIma => "Intel DVI 4-bit IMA ADPCM",
            DviImaInt => "Intel DVI 4-bit IMA ADPCM (mono/interleave)",
            Ima3ds => "3DS IMA 4-bit ADPCM",
            Wv6Ima => "Gorilla Systems WV6 4-bit IMA ADPCM",
            AlpIma => "High Voltage ALP 4-bit IMA ADPCM",
            Ffta2Ima => "Final Fantasy Tactics A2 4-bit IMA ADPCM",
            XboxIma => "XBOX 4-bit IMA ADPCM",
            XboxImaMch => "XBOX 4-bit IMA ADPCM (multichannel)",
            XboxImaInt => "XBOX 4-bit IMA ADPCM (mono/interleave)",
            FsbIma => "FSB 4-bit IMA ADPCM",
            WwiseIma => "Audiokinetic Wwise 4-bit IMA ADPCM",
            AppleIma4 => "Apple Quicktime 4-bit IMA ADPCM",
            MsIma => "Microsoft 4-bit IMA ADPCM",
            RefIma => "Reflections 4-bit IMA ADPCM",
            RadIma => "Radical 4-bit IMA ADPCM",
            RadImaMono => "Radical 4-bit IMA ADPCM (mono/interleave)",
            NdsIma => "NDS-style 4-bit IMA ADPCM",
            Dat4Ima => "Eurocom DAT4 4-bit IMA ADPCM",
            AwcIma => "Rockstar AWC 4-bit IMA ADPCM",
            H4mIma => "Hudson HVQM4 4-bit IMA ADPCM",
            SndsIma => "Heavy Iron .snds 4-bit IMA ADPCM",
            OtnsIma => "Omikron: The Nomad Soul 4-bit IMA ADPCM",
            UbiIma => "Ubisoft 4-bit IMA ADPCM",
            Xa => "CD-ROM XA 4-bit ADPCM",
            Psx => "Playstation 4-bit ADPCM",
            PsxBadFlags => "Playstation 4-bit ADPCM (bad flags)",
            Hevag => "Sony HEVAG 4-bit ADPCM",
            PsxCfg => "Playstation 4-bit ADPCM (configurable)",
            EaXa => "Electronic Arts EA-XA 4-bit ADPCM v1",
            EaXaInt => "Electronic Arts EA-XA 4-bit ADPCM v1 (mono/interleave)",
            EaXaV2 => "Electronic Arts EA-XA 4-bit ADPCM v2",
            MaxisXa => "Maxis EA-XA 4-bit ADPCM",
            EaXas => "Electronic Arts EA-XAS 4-bit ADPCM",
            EaMt => "Electronic Arts MicroTalk",
            MsAdpcm => "Microsoft 4-bit ADPCM",
            MsAdpcmCk => "Microsoft 4-bit ADPCM (Cricket Audio)",
            Aica => "Yamaha AICA 4-bit ADPCM",
            AicaInt => "Yamaha AICA 4-bit ADPCM (mono/interleave)",
            Yamaha => "Yamaha 4-bit ADPCM",
            YamahaNxap => "Yamaha NXAP 4-bit ADPCM",
            NdsProcyon => "Procyon Studio Digital Sound Elements NDS 4-bit APDCM",
            L5555 => "Level-5 0x555 4-bit ADPCM",
            Lsf => "lsf 4-bit ADPCM",
            Mtaf => "Konami MTAF 4-bit ADPCM",
            Mta2 => "Konami MTA2 4-bit ADPCM",
            Mc3 => "Paradigm MC3 3-bit ADPCM",
            Fadpcm => "FMOD FADPCM 4-bit ADPCM",
            Asf => "Argonaut ASF 4-bit ADPCM",
            Xmd => "Konami XMD 4-bit ADPCM",
            Sdx2 => "Squareroot-delta-exact (SDX2) 8-bit DPCM",
            Sdx2Int => "Squareroot-delta-exact (SDX2) 8-bit DPCM with 1 byte interleave",
            Cbd2 => "Cuberoot-delta-exact (CBD2) 8-bit DPCM",
            Derf => "Xilam DERF 8-bit DPCM",
            Sassc => "Activision EXAKT SASSC 8-bit DPCM",
            CriHca => "CRI HCA",
            Acm => "InterPlay ACM",
            Nwa => "VisualArt's NWA DPCM",
            OggVorbis => "Ogg Vorbis",
            Ffmpeg => "FFmpeg",
        }
    }
}

/// Sub-format of the generic blocked layout; only picks the header parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockedKind {
    Ast,
    Halpst,
}

/// How channel data is arranged in the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutType {
    /// Flat: channels share one offset or the codec interleaves internally.
    None,
    Interleave,
    Blocked(BlockedKind),
    Segmented,
    Layered,
    Aix,
}

impl LayoutType {
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            LayoutType::Segmented | LayoutType::Layered | LayoutType::Aix
        )
    }

    pub fn description(self) -> &'static str {
        match self {
            LayoutType::None => "flat",
            LayoutType::Interleave => "interleave",
            LayoutType::Blocked(BlockedKind::Ast) => "blocked (AST)",
            LayoutType::Blocked(BlockedKind::Halpst) => "blocked (HALPST)",
            LayoutType::Segmented => "segmented",
            LayoutType::Layered => "layered",
            LayoutType::Aix => "AIX interleave, internally 18-byte interleaved",
        }
    }
}

/// Which prober (or container) described the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaType {
    Riff,
    DspStd,
    DspRs03,
    DspCstr,
    PsxVag,
    Ps2Smpl,
    OggVorbis,
    Aix,
    Ast,
    Halpst,
    Segmented,
    Layered,
    Synthetic,
}

impl MetaType {
    pub fn description(self) -> &'static str {
        match self {
            MetaType::Riff => "RIFF WAVE header",
            MetaType::DspStd => "Nintendo DSP header",
            MetaType::DspRs03 => "Retro Studios RS03 header",
            MetaType::DspCstr => "Namco Cstr header",
            MetaType::PsxVag => "Sony VAG header",
            MetaType::Ps2Smpl => "Homura SMPL header",
            MetaType::OggVorbis => "Ogg Vorbis",
            MetaType::Aix => "CRI AIX header",
            MetaType::Ast => "Nintendo AST header",
            MetaType::Halpst => "HAL Laboratory HALPST header",
            MetaType::Segmented => "segmented container",
            MetaType::Layered => "layered container",
            MetaType::Synthetic => "generated stream",
        }
    }
}
