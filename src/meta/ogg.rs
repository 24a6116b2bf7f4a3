//! Ogg Vorbis
//!
//! The codec reads its own resource; the prober only checks the page
//! magic, asks the codec for the stream parameters and pulls loop points
//! from the comment header.

use crate::coding::{CodecData, VorbisCodec};
use crate::error::{StreamError, StreamResult};
use crate::io::{Resource, ResourceExt, DEFAULT_BUFFER_SIZE};
use crate::stream::{CodingType, LayoutType, MetaType, StreamHandle};

const OGG_PAGE_ID: &[u8] = b"OggS";

/// How far back from the end to look for the last page.
const LAST_PAGE_SEARCH: u64 = 0x10000;

/// Granule position of the last page that has one, which is the total
/// sample count. Pages ending no packet carry -1 and are skipped.
fn last_granule(res: &mut dyn Resource) -> StreamResult<i64> {
    let size = res.size();
    let start = size.saturating_sub(LAST_PAGE_SEARCH);
    let mut tail = vec![0u8; (size - start) as usize];
    res.read_exact_at(start, &mut tail)?;

    let mut end = tail.len();
    while let Some(page) = tail[..end]
        .windows(OGG_PAGE_ID.len())
        .rposition(|w| w == OGG_PAGE_ID)
    {
        let field = page + 0x06;
        if let Some(bytes) = tail.get(field..field + 8) {
            let mut granule = [0u8; 8];
            granule.copy_from_slice(bytes);
            let granule = i64::from_le_bytes(granule);
            if granule != -1 {
                return Ok(granule);
            }
        }
        end = page;
    }

    Err(StreamError::InvalidStream(
        "no Ogg page with a granule position near the end".to_string(),
    ))
}

#[derive(Debug, Default, PartialEq)]
struct LoopTags {
    start: Option<i32>,
    length: Option<i32>,
    end: Option<i32>,
}

fn parse_loop_tags(comments: &[(String, String)]) -> LoopTags {
    let mut tags = LoopTags::default();
    for (key, value) in comments {
        let Ok(value) = value.trim().parse::<i32>() else {
            continue;
        };
        match key.as_str() {
            "loopstart" | "loop_start" => tags.start = Some(value),
            "looplength" => tags.length = Some(value),
            "loopend" | "loop_end" => tags.end = Some(value),
            _ => {}
        }
    }
    tags
}

impl LoopTags {
    /// Loop region over a stream of `num_samples`.
    fn region(&self, num_samples: i32) -> Option<(i32, i32)> {
        let start = self.start?;
        let end = match (self.end, self.length) {
            (Some(end), _) => end,
            (None, Some(length)) => start.saturating_add(length),
            (None, None) => num_samples,
        };
        Some((start, end))
    }
}

pub fn probe_ogg_vorbis(res: &mut dyn Resource) -> StreamResult<StreamHandle> {
    if !res.has_magic(0, OGG_PAGE_ID) {
        return Err(StreamError::RejectedFormat("not an Ogg file".to_string()));
    }

    let granule = last_granule(res)?;
    if granule <= 0 || granule > i32::MAX as i64 {
        return Err(StreamError::InvalidStream(format!(
            "bad Ogg sample count {}",
            granule
        )));
    }
    let num_samples = granule as i32;

    let codec = VorbisCodec::open(res.open(res.name(), DEFAULT_BUFFER_SIZE)?)?;
    let loop_points = parse_loop_tags(&codec.comments()).region(num_samples);

    let mut h = StreamHandle::allocate(codec.channels(), loop_points.is_some())?;
    h.desc.sample_rate = codec.sample_rate().min(i32::MAX as u32) as i32;
    h.desc.num_samples = num_samples;
    h.desc.coding = CodingType::OggVorbis;
    h.desc.layout = LayoutType::None;
    h.desc.meta = MetaType::OggVorbis;
    if let Some((start, end)) = loop_points {
        h.desc.loop_start_sample = start;
        h.desc.loop_end_sample = end;
    }
    h.codec = CodecData::Vorbis(Box::new(codec));

    h.open_stream(res, 0)?;
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryFs;

    fn tags(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_loop_tags() {
        let t = parse_loop_tags(&tags(&[("loopstart", "100"), ("looplength", "50")]));
        assert_eq!(t.region(1000), Some((100, 150)));

        let t = parse_loop_tags(&tags(&[("loopstart", "100"), ("loopend", "900")]));
        assert_eq!(t.region(1000), Some((100, 900)));

        let t = parse_loop_tags(&tags(&[("loopstart", " 10 ")]));
        assert_eq!(t.region(1000), Some((10, 1000)));

        let t = parse_loop_tags(&tags(&[("title", "x"), ("loopstart", "abc")]));
        assert_eq!(t.region(1000), None);
    }

    #[test]
    fn test_last_granule() {
        let fs = MemoryFs::new();
        let mut data = b"OggS".to_vec();
        data.extend_from_slice(&[0u8; 0x20]);
        data.extend_from_slice(b"OggS\0\x04");
        data.extend_from_slice(&12345i64.to_le_bytes());
        data.extend_from_slice(&[0u8; 0x10]);
        fs.insert("t.ogg", data);
        let mut res = fs.open("t.ogg").unwrap();
        assert_eq!(last_granule(&mut res).unwrap(), 12345);
    }

    #[test]
    fn test_last_granule_skips_unset_positions() {
        let fs = MemoryFs::new();
        let mut data = b"OggS\0\x00".to_vec();
        data.extend_from_slice(&4410i64.to_le_bytes());
        data.extend_from_slice(&[0u8; 0x10]);
        // continuation page with no packet end
        data.extend_from_slice(b"OggS\0\x01");
        data.extend_from_slice(&[0xFF; 8]);
        data.extend_from_slice(&[0u8; 0x10]);
        fs.insert("c.ogg", data);
        let mut res = fs.open("c.ogg").unwrap();
        assert_eq!(last_granule(&mut res).unwrap(), 4410);

        fs.insert("n.ogg", b"OggS\0\x04\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF".to_vec());
        let mut res = fs.open("n.ogg").unwrap();
        assert!(last_granule(&mut res).is_err());
    }

    #[test]
    fn test_rejects_non_ogg() {
        let fs = MemoryFs::new();
        fs.insert("x.ogg", b"RIFF....".to_vec());
        let mut res = fs.open("x.ogg").unwrap();
        assert!(matches!(
            probe_ogg_vorbis(&mut res),
            Err(StreamError::RejectedFormat(_))
        ));
    }

    #[test]
    fn test_broken_ogg_closes_codec_resource() {
        let fs = MemoryFs::new();
        let mut data = b"OggS".to_vec();
        data.extend_from_slice(&[0u8; 2]);
        data.extend_from_slice(&100i64.to_le_bytes());
        data.extend_from_slice(&[0u8; 0x20]);
        fs.insert("broken.ogg", data);
        let mut res = fs.open("broken.ogg").unwrap();
        assert!(probe_ogg_vorbis(&mut res).is_err());
        assert_eq!(fs.open_count("broken.ogg"), 2);
        assert_eq!(fs.close_count("broken.ogg"), 1);
    }
}
