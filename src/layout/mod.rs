//! Layout renderers
//!
//! A layout decides how many samples can be decoded in one go and how
//! channel cursors move between blocks. Composite layouts (segmented,
//! layered, AIX) own child handles and render through them.

pub mod aix;
pub mod blocked;
pub mod flat;
pub mod interleave;
pub mod layered;
pub mod segmented;

pub use aix::{build_aix, AixData};
pub use blocked::{block_update, INVALID_BLOCK_OFFSET};
pub use layered::{build_layered, LayeredData};
pub use segmented::{build_segmented, SegmentedData};

use crate::stream::StreamHandle;

/// Sample frames composite layouts render per child call.
pub const LAYER_SAMPLE_BUFFER: usize = 8192;

/// Layout-owned state of a handle.
#[derive(Default)]
pub enum LayoutData {
    #[default]
    None,
    Segmented(SegmentedData),
    Layered(LayeredData),
    Aix(AixData),
}

impl LayoutData {
    /// Restart hook, run by [`StreamHandle::reset`]. Recurses into every child.
    pub fn reset(&mut self) {
        match self {
            LayoutData::None => {}
            LayoutData::Segmented(data) => data.reset(),
            LayoutData::Layered(data) => data.reset(),
            LayoutData::Aix(data) => data.reset(),
        }
    }

    /// Child handles in playback order.
    pub fn children(&self) -> Vec<&StreamHandle> {
        match self {
            LayoutData::None => Vec::new(),
            LayoutData::Segmented(data) => data.segments.iter().collect(),
            LayoutData::Layered(data) => data.layers.iter().collect(),
            LayoutData::Aix(data) => data.segments.iter().flatten().collect(),
        }
    }
}
