//! Average bitrate estimation

use super::handle::StreamHandle;

fn bitrate_from_size(size: u64, sample_rate: i32, num_samples: i32) -> u64 {
    if sample_rate <= 0 || num_samples <= 0 {
        return 0;
    }
    (size as u128 * 8 * sample_rate as u128 / num_samples as u128) as u64
}

fn push_unique<'a>(seen: &mut Vec<(&'a str, u64)>, name: &'a str, size: u64) {
    if !seen.iter().any(|(n, _)| *n == name) {
        seen.push((name, size));
    }
}

/// Every resource the stream decodes from, first-seen order, one entry
/// per name.
fn collect_resources<'a>(h: &'a StreamHandle, seen: &mut Vec<(&'a str, u64)>) {
    if h.desc.layout.is_composite() {
        for child in h.layout_data.children() {
            collect_resources(child, seen);
        }
        return;
    }

    if h.desc.coding.is_codec_managed() {
        if let Some((name, size)) = h.codec.resource() {
            push_unique(seen, name, size);
        }
        return;
    }

    for cursor in h.ch.iter() {
        let Some(id) = cursor.resource else {
            continue;
        };
        if let Some(name) = h.resources.name(id) {
            push_unique(seen, name, h.resources.size(id));
        }
    }
}

impl StreamHandle {
    /// Average bits per second over the whole stream, from the size of
    /// the data it reads. 0 when unknown.
    pub fn average_bitrate(&self) -> u64 {
        let sample_rate = self.desc.sample_rate;
        let num_samples = self.desc.num_samples;
        if sample_rate == 0 || num_samples == 0 {
            return 0;
        }

        if self.desc.stream_size > 0 {
            return bitrate_from_size(self.desc.stream_size, sample_rate, num_samples);
        }

        if self.desc.layout.is_composite() {
            let children = self.layout_data.children();
            if !children.is_empty() && children.iter().all(|c| c.desc.stream_size > 0) {
                let total: u64 = children.iter().map(|c| c.desc.stream_size).sum();
                return bitrate_from_size(total, sample_rate, num_samples);
            }
        }

        let mut seen = Vec::new();
        collect_resources(self, &mut seen);
        seen.iter()
            .map(|(_, size)| bitrate_from_size(*size, sample_rate, num_samples))
            .sum()
    }
}
