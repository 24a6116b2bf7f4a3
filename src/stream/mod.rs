//! Stream handles and the engine that drives them
//!
//! Opening goes through [`open`] / [`open_from_resource`], which probe the
//! input and return a finalized [`StreamHandle`]. From there the handle is
//! rendered, looped, reset and finally closed.

pub mod bitrate;
pub mod channel;
pub mod describe;
pub mod geometry;
pub mod handle;
pub mod looping;
pub mod open;
pub mod probe;
pub mod render;
pub mod stereo;
pub mod types;

pub use channel::ChannelState;
pub use handle::{
    LoopState, PlaybackState, StreamDescriptor, StreamHandle, MAX_CHANNELS, MAX_CHANNEL_MAPPINGS,
};
pub use probe::{open, open_from_resource, open_with_probers, ProbeFn, Prober, PROBERS};
pub use stereo::try_dual_file_stereo;
pub use types::{BlockedKind, CodingType, LayoutType, MetaType};
