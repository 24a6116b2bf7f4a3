//! Dual-file stereo
//!
//! Some games store stereo music as two mono files (`bgm_L.dsp` and
//! `bgm_R.dsp`). When a prober marks a mono stream as a candidate, the
//! sibling is opened, probed the same way and, if it matches, both are
//! merged into one stereo handle.

use crate::error::{StreamError, StreamResult};
use crate::io::{split_extension, Resource, DEFAULT_BUFFER_SIZE};

use super::handle::{StreamDescriptor, StreamHandle};
use super::probe::Prober;
use super::types::MetaType;

/// Name pairs, in match order. Entries starting with a dot replace the
/// whole extension, the others the end of the base name.
#[rustfmt::skip]
const DUAL_FILE_PAIRS: [(&str, &str); 7] = [
    ("L", "R"),
    ("l", "r"),
    ("left", "right"),
    ("Left", "Right"),
    (".V0", ".V1"),
    (".L", ".R"),
    ("_0", "_1"),
];

/// Name of the other half of a dual-file pair, and which side (0 = left,
/// 1 = right) `name` itself is.
pub fn sibling_name(name: &str) -> Option<(String, usize)> {
    let (base, ext) = split_extension(name);

    for (left, right) in DUAL_FILE_PAIRS {
        for (side, (this, that)) in [(left, right), (right, left)].into_iter().enumerate() {
            if this.starts_with('.') {
                if ext == this {
                    return Some((format!("{}{}", base, that), side));
                }
            } else if base.ends_with(this) {
                let stem = &base[..base.len() - this.len()];
                return Some((format!("{}{}{}", stem, that, ext), side));
            }
        }
    }
    None
}

fn check_pair(original: &StreamDescriptor, sibling: &StreamDescriptor) -> StreamResult<()> {
    let mismatch = |what: &str| Err(StreamError::DualStereoMismatch(what.to_string()));

    if sibling.channels != 1 {
        return mismatch("sibling is not mono");
    }
    if sibling.num_samples != original.num_samples {
        return mismatch("sample count");
    }
    if sibling.sample_rate != original.sample_rate {
        return mismatch("sample rate");
    }
    if sibling.meta != original.meta {
        return mismatch("metadata type");
    }
    if sibling.coding != original.coding {
        return mismatch("coding");
    }
    if sibling.layout != original.layout {
        return mismatch("layout");
    }
    // zero in both when the layout doesn't use them
    if sibling.interleave_block_size != original.interleave_block_size
        || sibling.interleave_last_block_size != original.interleave_last_block_size
    {
        return mismatch("interleave");
    }
    // the right channel of some SMPL rips has no loop points
    if sibling.meta != MetaType::Ps2Smpl
        && (sibling.loop_flag != original.loop_flag
            || sibling.loop_start_sample != original.loop_start_sample
            || sibling.loop_end_sample != original.loop_end_sample)
    {
        return mismatch("loop points");
    }
    Ok(())
}

/// Build a stereo handle from two mono handles. `original` lands in slot
/// `side`; both are left as empty shells.
fn merge(
    original: &mut StreamHandle,
    sibling: &mut StreamHandle,
    side: usize,
) -> StreamResult<StreamHandle> {
    let mut merged = StreamHandle::allocate(2, original.desc.loop_flag)?;
    merged.desc = original.desc.clone();
    merged.desc.channels = 2;
    merged.state = original.state.clone();
    merged.codec = std::mem::take(&mut original.codec);
    merged.layout_data = std::mem::take(&mut original.layout_data);

    let original_base = merged.resources.absorb(&mut original.resources);
    let sibling_base = merged.resources.absorb(&mut sibling.resources);

    let mut this = original.ch[0];
    this.resource = this.resource.map(|id| id.rebase(original_base));
    let mut that = sibling.ch[0];
    that.resource = that.resource.map(|id| id.rebase(sibling_base));

    merged.ch[side] = this;
    merged.ch[side ^ 1] = that;
    Ok(merged)
}

fn stitch(
    original: &mut StreamHandle,
    base: &dyn Resource,
    prober: &Prober,
) -> StreamResult<StreamHandle> {
    let Some((name, side)) = sibling_name(base.name()) else {
        return Err(StreamError::RejectedFormat(format!(
            "{} has no dual-file name",
            base.name()
        )));
    };

    let mut resource = base.open(&name, DEFAULT_BUFFER_SIZE)?;
    let probed = (prober.probe)(resource.as_mut());
    resource.close();
    let mut sibling = probed?;

    check_pair(&original.desc, &sibling.desc)?;
    merge(original, &mut sibling, side)
}

/// Merge `original` with its dual-file sibling when there is one.
///
/// Any failure keeps the mono stream.
pub fn try_dual_file_stereo(
    mut original: StreamHandle,
    base: &dyn Resource,
    prober: &Prober,
) -> StreamHandle {
    match stitch(&mut original, base, prober) {
        Ok(merged) => {
            log::debug!("{}: merged dual-file stereo", base.name());
            merged
        }
        Err(e @ StreamError::DualStereoMismatch(_)) => {
            log::warn!("{}: {}", base.name(), e);
            original
        }
        Err(e) => {
            log::debug!("{}: no dual-file stereo: {}", base.name(), e);
            original
        }
    }
}
