//! Per-channel decode cursor

use crate::io::ResourceId;

/// Position and codec carry-over registers of one channel.
///
/// Plain data: cursors are copied freely into the start and loop arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelState {
    /// Resource in the owning handle's registry (`None` for codec-managed streams).
    pub resource: Option<ResourceId>,
    pub offset: u64,
    pub channel_start_offset: u64,

    /// DSP coefficient pairs.
    pub adpcm_coef: [i16; 16],
    pub adpcm_history1_16: i16,
    pub adpcm_history2_16: i16,
    pub adpcm_history1_32: i32,
    pub adpcm_history2_32: i32,
    pub adpcm_step_index: i32,
}

impl ChannelState {
    /// Copy only the prediction history registers from `other`.
    pub fn copy_history_from(&mut self, other: &ChannelState) {
        self.adpcm_history1_16 = other.adpcm_history1_16;
        self.adpcm_history2_16 = other.adpcm_history2_16;
        self.adpcm_history1_32 = other.adpcm_history1_32;
        self.adpcm_history2_32 = other.adpcm_history2_32;
    }
}
