//! Stream handle and its lifecycle
//!
//! A [`StreamHandle`] is built by exactly one prober through
//! [`StreamHandle::allocate`], frozen by [`StreamHandle::finalize`] and then
//! driven by the render and loop code. Everything it owns (cursors, codec
//! payload, composite children, resources) is released when it drops.

use crate::coding::CodecData;
use crate::error::{StreamError, StreamResult};
use crate::io::ResourceRegistry;
use crate::layout::LayoutData;

use super::channel::ChannelState;
use super::types::{CodingType, LayoutType, MetaType};

/// Upper bound on channels per handle.
pub const MAX_CHANNELS: usize = 64;

/// Entries in the channel mapping table.
pub const MAX_CHANNEL_MAPPINGS: usize = 32;

/// What a stream is: format tags, sizes and loop points.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamDescriptor {
    pub sample_rate: i32,
    pub channels: usize,
    pub coding: CodingType,
    pub layout: LayoutType,
    pub meta: MetaType,

    pub num_samples: i32,
    pub loop_flag: bool,
    pub loop_start_sample: i32,
    pub loop_end_sample: i32,
    /// Stop looping after this many loops (0 = loop forever).
    pub loop_target: i32,

    pub num_streams: i32,
    pub stream_index: i32,

    pub interleave_block_size: u64,
    pub interleave_last_block_size: u64,

    /// Bit `n` set keeps channel `n`; 0 keeps every channel.
    pub channel_mask: u32,
    /// Entry `n` names the channel that `n` is swapped with.
    pub channel_mapping: Option<[u8; MAX_CHANNEL_MAPPINGS]>,

    pub stream_name: String,
    /// Bytes of this subsong inside a larger container (0 = unknown).
    pub stream_size: u64,
    pub allow_dual_stereo: bool,
}

impl StreamDescriptor {
    fn new(channels: usize, looped: bool) -> Self {
        Self {
            sample_rate: 0,
            channels,
            coding: CodingType::Silence,
            layout: LayoutType::None,
            meta: MetaType::Synthetic,
            num_samples: 0,
            loop_flag: looped,
            loop_start_sample: 0,
            loop_end_sample: 0,
            loop_target: 0,
            num_streams: 0,
            stream_index: 0,
            interleave_block_size: 0,
            interleave_last_block_size: 0,
            channel_mask: 0,
            channel_mapping: None,
            stream_name: String::new(),
            stream_size: 0,
            allow_dual_stereo: false,
        }
    }
}

/// Where playback currently is, plus the loop-start shadow of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    pub current_sample: i32,
    pub samples_into_block: i32,

    pub current_block_offset: u64,
    pub current_block_size: u64,
    pub current_block_samples: i32,
    pub next_block_offset: u64,

    pub hit_loop: bool,
    pub loop_count: i32,

    pub loop_sample: i32,
    pub loop_samples_into_block: i32,
    pub loop_block_offset: u64,
    pub loop_block_size: u64,
    pub loop_block_samples: i32,
    pub loop_next_block_offset: u64,
}

/// Loop engine state derived from the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not looping.
    Unarmed,
    /// Looping, loop start not reached yet.
    Armed,
    /// Loop start reached and its cursors saved.
    Saved,
}

#[derive(Debug, Clone)]
struct StartSnapshot {
    desc: StreamDescriptor,
    state: PlaybackState,
}

/// A decodable stream.
pub struct StreamHandle {
    pub desc: StreamDescriptor,
    pub state: PlaybackState,

    /// Live cursors, one per channel.
    pub ch: Vec<ChannelState>,
    pub(crate) start_ch: Vec<ChannelState>,
    pub(crate) loop_ch: Option<Vec<ChannelState>>,
    start: Option<Box<StartSnapshot>>,

    pub codec: CodecData,
    pub layout_data: LayoutData,
    pub resources: ResourceRegistry,
}

pub(crate) fn alloc_cursors(channels: usize) -> StreamResult<Vec<ChannelState>> {
    let mut cursors = Vec::new();
    cursors
        .try_reserve_exact(channels)
        .map_err(|_| StreamError::ResourceExhausted("channel cursors"))?;
    cursors.resize(channels, ChannelState::default());
    Ok(cursors)
}

impl StreamHandle {
    /// Allocate an empty handle with `channels` cursors.
    ///
    /// The loop cursor array exists only when `looped` is set.
    pub fn allocate(channels: usize, looped: bool) -> StreamResult<Self> {
        if channels == 0 || channels > MAX_CHANNELS {
            log::warn!("error allocating {} channels", channels);
            return Err(StreamError::InvalidChannelCount(channels));
        }

        let ch = alloc_cursors(channels)?;
        let start_ch = alloc_cursors(channels)?;
        let loop_ch = if looped {
            Some(alloc_cursors(channels)?)
        } else {
            None
        };

        Ok(Self {
            desc: StreamDescriptor::new(channels, looped),
            state: PlaybackState::default(),
            ch,
            start_ch,
            loop_ch,
            start: None,
            codec: CodecData::None,
            layout_data: LayoutData::None,
            resources: ResourceRegistry::new(),
        })
    }

    /// Freeze the current cursors and descriptor as the restart point.
    pub fn finalize(&mut self) {
        self.start_ch.clear();
        self.start_ch.extend_from_slice(&self.ch);
        self.start = Some(Box::new(StartSnapshot {
            desc: self.desc.clone(),
            state: self.state.clone(),
        }));
    }

    /// Whether [`finalize`](Self::finalize) has run.
    pub fn is_finalized(&self) -> bool {
        self.start.is_some()
    }

    /// Rewind to the state captured at finalize.
    pub fn reset(&mut self) {
        if let Some(start) = self.start.as_deref() {
            self.desc = start.desc.clone();
            self.state = start.state.clone();
        }

        self.ch.clear();
        self.ch.extend_from_slice(&self.start_ch);

        if self.desc.loop_flag && self.loop_ch.is_none() {
            self.loop_ch = Some(vec![ChannelState::default(); self.desc.channels]);
        }

        self.codec.reset();
        self.layout_data.reset();
    }

    pub fn loop_state(&self) -> LoopState {
        if !self.desc.loop_flag {
            LoopState::Unarmed
        } else if self.state.hit_loop {
            LoopState::Saved
        } else {
            LoopState::Armed
        }
    }

    /// Saved loop-start cursors, if any.
    pub fn loop_cursors(&self) -> Option<&[ChannelState]> {
        self.loop_ch.as_deref()
    }

    /// Close the handle and everything it owns.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        // codec first, then children, then the files they read from
        self.codec = CodecData::None;
        self.layout_data = LayoutData::None;
        self.resources.close_all();
    }
}
