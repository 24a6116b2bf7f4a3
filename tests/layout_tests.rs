//! Rendering through each layout, including composites built from
//! probed children.

mod common;

use common::{ast_file, open_mem, pcm16, ramp_wav, render_all, wav};
use proptest::prelude::*;
use vgm_engine::io::MemoryFs;
use vgm_engine::layout::{build_aix, build_layered, build_segmented};
use vgm_engine::stream::{BlockedKind, LayoutType};
use vgm_engine::StreamHandle;

fn ramp(fs: &MemoryFs, name: &str, base: i16, count: usize) -> StreamHandle {
    open_mem(fs, name, ramp_wav(base, count, None)).unwrap()
}

#[test]
fn interleave_splits_channels() {
    let fs = MemoryFs::new();
    let pcm = pcm16((0..12).map(|i| i as i16));
    let mut h = open_mem(&fs, "st.wav", wav(2, 22050, &pcm, None)).unwrap();
    assert_eq!(h.desc.interleave_block_size, 2);
    assert_eq!(render_all(&mut h, 6), (0..12).collect::<Vec<i16>>());
}

#[test]
fn blocked_walks_block_chain() {
    let fs = MemoryFs::new();
    let blocks = vec![
        vec![vec![1, 2, 3, 4], vec![-1, -2, -3, -4]],
        vec![vec![5, 6], vec![-5, -6]],
    ];
    let mut h = open_mem(&fs, "a.ast", ast_file(2, &blocks, None)).unwrap();
    assert_eq!(h.desc.layout, LayoutType::Blocked(BlockedKind::Ast));

    let out = render_all(&mut h, 8);
    assert_eq!(
        out,
        vec![1, -1, 2, -2, 3, -3, 4, -4, 5, -5, 6, -6, 0, 0, 0, 0]
    );
}

#[test]
fn blocked_loop_returns_to_block() {
    let fs = MemoryFs::new();
    let blocks = vec![vec![vec![1, 2, 3, 4]], vec![vec![5, 6, 7, 8]]];
    let mut h = open_mem(&fs, "l.ast", ast_file(1, &blocks, Some((4, 8)))).unwrap();

    assert_eq!(
        render_all(&mut h, 14),
        vec![1, 2, 3, 4, 5, 6, 7, 8, 5, 6, 7, 8, 5, 6]
    );

    h.reset();
    assert_eq!(render_all(&mut h, 5), vec![1, 2, 3, 4, 5]);
}

#[test]
fn segmented_plays_in_order_and_loops_across_segments() {
    let fs = MemoryFs::new();
    let a = ramp(&fs, "a.wav", 1, 10);
    let b = ramp(&fs, "b.wav", 101, 10);
    let mut h = build_segmented(vec![a, b], Some((5, 15))).unwrap();
    h.finalize();
    assert_eq!(h.desc.num_samples, 20);

    let mut expected: Vec<i16> = (1..=10).chain(101..=105).collect();
    expected.extend((6..=10).chain(101..=105));
    assert_eq!(render_all(&mut h, 25), expected);

    h.reset();
    assert_eq!(render_all(&mut h, 12), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 101, 102]);
    assert!(h.describe(4096).contains("(2 segments)"));
}

#[test]
fn segmented_rejects_mismatched_channels() {
    let fs = MemoryFs::new();
    let mono = ramp(&fs, "m.wav", 0, 10);
    let stereo = open_mem(&fs, "s.wav", wav(2, 22050, &pcm16([0; 8]), None)).unwrap();
    assert!(build_segmented(vec![mono, stereo], None).is_err());
    assert_eq!(fs.live_handles(), 0);
}

#[test]
fn layered_stacks_channels() {
    let fs = MemoryFs::new();
    let a = ramp(&fs, "a.wav", 0, 6);
    let b = ramp(&fs, "b.wav", 100, 4);
    let mut h = build_layered(vec![a, b], None).unwrap();
    h.finalize();
    assert_eq!(h.desc.channels, 2);
    assert_eq!(h.desc.num_samples, 6);

    assert_eq!(
        render_all(&mut h, 6),
        vec![0, 100, 1, 101, 2, 102, 3, 103, 4, 0, 5, 0]
    );
}

#[test]
fn layered_loop_is_shared_by_layers() {
    let fs = MemoryFs::new();
    let a = ramp(&fs, "a.wav", 0, 10);
    let b = ramp(&fs, "b.wav", 50, 10);
    let mut h = build_layered(vec![a, b], Some((2, 8))).unwrap();
    h.finalize();

    let out = render_all(&mut h, 12);
    let left: Vec<i16> = out.iter().step_by(2).copied().collect();
    let right: Vec<i16> = out.iter().skip(1).step_by(2).copied().collect();
    assert_eq!(left, vec![0, 1, 2, 3, 4, 5, 6, 7, 2, 3, 4, 5]);
    assert_eq!(right, vec![50, 51, 52, 53, 54, 55, 56, 57, 52, 53, 54, 55]);
}

#[test]
fn aix_plays_segments_of_layers() {
    let fs = MemoryFs::new();
    let grid = vec![
        vec![ramp(&fs, "0a.wav", 0, 3), ramp(&fs, "0b.wav", 10, 3)],
        vec![ramp(&fs, "1a.wav", 20, 2), ramp(&fs, "1b.wav", 30, 2)],
    ];
    let mut h = build_aix(grid, None).unwrap();
    h.finalize();
    assert_eq!(h.desc.channels, 2);
    assert_eq!(h.desc.num_samples, 5);

    assert_eq!(
        render_all(&mut h, 5),
        vec![0, 10, 1, 11, 2, 12, 20, 30, 21, 31]
    );

    h.reset();
    assert_eq!(render_all(&mut h, 2), vec![0, 10, 1, 11]);
}

#[test]
fn aix_loops_into_the_middle_of_a_segment() {
    let fs = MemoryFs::new();
    let grid = vec![
        vec![ramp(&fs, "0.wav", 0, 3)],
        vec![ramp(&fs, "1.wav", 10, 4)],
    ];
    let mut h = build_aix(grid, Some((4, 7))).unwrap();
    h.finalize();

    let expected = vec![0, 1, 2, 10, 11, 12, 13, 11, 12, 13, 11];
    assert_eq!(render_all(&mut h, 11), expected);

    let parts = vec![ramp(&fs, "s0.wav", 0, 3), ramp(&fs, "s1.wav", 10, 4)];
    let mut seg = build_segmented(parts, Some((4, 7))).unwrap();
    seg.finalize();
    assert_eq!(render_all(&mut seg, 11), expected);
}

#[test]
fn aix_rejects_uneven_layers() {
    let fs = MemoryFs::new();
    let grid = vec![
        vec![ramp(&fs, "0a.wav", 0, 3), ramp(&fs, "0b.wav", 10, 3)],
        vec![ramp(&fs, "1a.wav", 20, 2)],
    ];
    assert!(build_aix(grid, None).is_err());
}

/// Expected output of a stream whose sample `i` is `i`, looping over
/// `[start, end)` forever.
fn looped_ramp(start: usize, end: usize, frames: usize) -> Vec<i16> {
    (0..frames)
        .map(|i| {
            if i < end {
                i as i16
            } else {
                (start + (i - end) % (end - start)) as i16
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn chunked_rendering_matches_the_loop(chunks in prop::collection::vec(1usize..64, 1..40)) {
        let fs = MemoryFs::new();
        let mut h = open_mem(&fs, "p.wav", ramp_wav(0, 300, Some((100, 199)))).unwrap();

        let total: usize = chunks.iter().sum();
        let mut out = Vec::with_capacity(total);
        let mut buffer = [0i16; 64];
        for n in chunks {
            let got = h.render(&mut buffer, n);
            prop_assert_eq!(got, n);
            out.extend_from_slice(&buffer[..n]);
        }

        prop_assert_eq!(out, looped_ramp(100, 200, total));
    }

    #[test]
    fn frame_aligned_chunks_match_single_render(frames in 1usize..20) {
        let fs = MemoryFs::new();
        let mut h = open_mem(&fs, "f.wav", ramp_wav(0, 300, Some((100, 199)))).unwrap();
        let whole = render_all(&mut h, frames * 4 * 10);

        h.reset();
        let mut pieces = Vec::new();
        for _ in 0..frames * 10 {
            pieces.extend(render_all(&mut h, 4));
        }
        prop_assert_eq!(whole, pieces);
    }
}
