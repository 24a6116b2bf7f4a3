//! Format probing
//!
//! Each prober recognizes one container format and builds a handle for it.
//! The pipeline tries them in order, sanity-checks the first handle that
//! comes back and hands it out finalized. Probe errors never reach the
//! caller: a failed candidate is logged and the next prober gets a turn.

use std::path::Path;

use crate::error::StreamResult;
use crate::io::{FileResource, Resource};
use crate::meta;

use super::handle::StreamHandle;
use super::stereo::try_dual_file_stereo;

/// Signature every prober implements.
pub type ProbeFn = fn(&mut dyn Resource) -> StreamResult<StreamHandle>;

/// A named format recognizer.
#[derive(Clone, Copy)]
pub struct Prober {
    pub name: &'static str,
    pub probe: ProbeFn,
}

/// Built-in probers in the order they are tried.
pub static PROBERS: &[Prober] = &[
    Prober {
        name: "riff",
        probe: meta::riff::probe_riff,
    },
    Prober {
        name: "dsp_std",
        probe: meta::dsp::probe_dsp_std,
    },
    Prober {
        name: "vag",
        probe: meta::vag::probe_vag,
    },
    Prober {
        name: "ast",
        probe: meta::ast::probe_ast,
    },
    Prober {
        name: "ogg_vorbis",
        probe: meta::ogg::probe_ogg_vorbis,
    },
];

pub const MIN_SAMPLE_RATE: i32 = 300;
pub const MAX_SAMPLE_RATE: i32 = 96000;
pub const MAX_SUBSONGS: i32 = 65535;

/// Open and identify the file at `path`.
pub fn open(path: impl AsRef<Path>) -> Option<StreamHandle> {
    let path = path.as_ref();
    let mut resource = match FileResource::open_path(path) {
        Ok(resource) => resource,
        Err(e) => {
            log::warn!("cannot open {}: {}", path.display(), e);
            return None;
        }
    };
    let handle = open_from_resource(&mut resource);
    resource.close();
    handle
}

/// Identify an already opened resource with the built-in probers.
pub fn open_from_resource(resource: &mut dyn Resource) -> Option<StreamHandle> {
    open_with_probers(resource, PROBERS)
}

/// Identify `resource` with a caller-chosen prober list.
pub fn open_with_probers(resource: &mut dyn Resource, probers: &[Prober]) -> Option<StreamHandle> {
    for prober in probers {
        let mut h = match (prober.probe)(resource) {
            Ok(h) => h,
            Err(e) => {
                log::trace!("{}: not {}: {}", resource.name(), prober.name, e);
                continue;
            }
        };

        if h.desc.num_samples <= 0 {
            log::debug!(
                "{}: {} gave no samples, skipping",
                resource.name(),
                prober.name
            );
            continue;
        }

        if h.desc.sample_rate < MIN_SAMPLE_RATE || h.desc.sample_rate > MAX_SAMPLE_RATE {
            log::debug!(
                "{}: {} gave sample rate {}, skipping",
                resource.name(),
                prober.name,
                h.desc.sample_rate
            );
            continue;
        }

        if h.desc.loop_flag
            && (h.desc.loop_end_sample <= h.desc.loop_start_sample
                || h.desc.loop_end_sample > h.desc.num_samples
                || h.desc.loop_start_sample < 0)
        {
            log::warn!(
                "{}: ignoring bad loop {}..{} (of {} samples)",
                resource.name(),
                h.desc.loop_start_sample,
                h.desc.loop_end_sample,
                h.desc.num_samples
            );
            h.desc.loop_flag = false;
            h.loop_ch = None;
        }

        if h.desc.channels == 1 && h.desc.allow_dual_stereo {
            h = try_dual_file_stereo(h, resource, prober);
        }

        if h.desc.num_streams < 0 || h.desc.num_streams > MAX_SUBSONGS {
            log::debug!(
                "{}: {} gave {} subsongs, skipping",
                resource.name(),
                prober.name,
                h.desc.num_streams
            );
            continue;
        }

        if h.desc.stream_index == 0 {
            h.desc.stream_index = resource.stream_index();
        }

        h.finalize();
        log::debug!("{}: opened as {}", resource.name(), prober.name);
        return Some(h);
    }

    log::debug!("{}: no prober accepted the file", resource.name());
    None
}
