//! End-to-end tests of the open, render, loop and close pipeline.

mod common;

use std::io::Write;

use common::{dsp_file, open_mem, pcm16, ramp_wav, render_all, wav};
use serial_test::serial;
use vgm_engine::io::{MemoryFs, Resource, ResourceExt};
use vgm_engine::stream::{open_with_probers, CodingType, LayoutType, LoopState, MetaType, Prober};
use vgm_engine::{LogLevel, PlayConfig, StreamError, StreamHandle, StreamResult};

#[test]
fn wav_opens_and_renders() {
    let fs = MemoryFs::new();
    let pcm = pcm16([1, -1, 2, -2, 3, -3]);
    let mut h = open_mem(&fs, "stereo.wav", wav(2, 44100, &pcm, None)).unwrap();

    assert!(h.is_finalized());
    assert_eq!(h.desc.channels, 2);
    assert_eq!(h.desc.num_samples, 3);
    assert_eq!(h.desc.layout, LayoutType::Interleave);
    assert_eq!(h.desc.meta, MetaType::Riff);

    assert_eq!(render_all(&mut h, 3), vec![1, -1, 2, -2, 3, -3]);
    // past the end renders silence
    assert_eq!(render_all(&mut h, 2), vec![0, 0, 0, 0]);
}

#[test]
fn dsp_opens_with_loop() {
    let fs = MemoryFs::new();
    let h = open_mem(&fs, "bgm.dsp", dsp_file(40, Some((2, 31)), 3, 0x12)).unwrap();
    assert_eq!(h.desc.coding, CodingType::NgcDsp);
    assert_eq!(h.desc.loop_start_sample, 0);
    assert_eq!(h.desc.loop_end_sample, 28);
    assert_eq!(h.loop_state(), LoopState::Armed);
}

#[test]
fn unknown_data_is_not_recognized() {
    let fs = MemoryFs::new();
    assert!(open_mem(&fs, "junk.bin", vec![0x55; 256]).is_none());
    assert_eq!(fs.live_handles(), 0);
}

#[test]
fn dual_file_stereo_is_stitched() {
    let fs = MemoryFs::new();
    fs.insert("track_R.dsp", dsp_file(40, Some((2, 31)), 3, 0x12));
    let h = open_mem(&fs, "track_L.dsp", dsp_file(40, Some((2, 31)), 3, 0x12)).unwrap();

    assert_eq!(h.desc.channels, 2);
    assert_eq!(h.desc.num_samples, 40);
    assert!(h.desc.loop_flag);
    assert_eq!(h.ch[0].offset, 0x60);
    assert_eq!(h.ch[1].offset, 0x60);
    assert_eq!(h.loop_cursors().map(|c| c.len()), Some(2));
    // the sibling was probed, then released once its cursors moved over
    assert_eq!(fs.open_count("track_R.dsp"), 2);
    assert_eq!(fs.close_count("track_R.dsp"), 1);

    h.close();
    assert_eq!(fs.live_handles(), 0);
}

#[test]
fn dual_file_stereo_rejects_mismatched_sibling() {
    let fs = MemoryFs::new();
    fs.insert("song_R.dsp", dsp_file(999, Some((2, 31)), 72, 0x12));
    let h = open_mem(&fs, "song_L.dsp", dsp_file(40, Some((2, 31)), 3, 0x12)).unwrap();

    assert_eq!(h.desc.channels, 1);
    assert_eq!(h.desc.num_samples, 40);
    assert_eq!(fs.close_count("song_R.dsp"), fs.open_count("song_R.dsp"));
}

#[test]
fn wav_does_not_look_for_a_sibling() {
    let fs = MemoryFs::new();
    fs.insert("voice_R.wav", ramp_wav(0, 10, None));
    let h = open_mem(&fs, "voice_L.wav", ramp_wav(0, 10, None)).unwrap();
    assert_eq!(h.desc.channels, 1);
    assert_eq!(fs.open_count("voice_R.wav"), 0);
}

fn shared_resource(res: &mut dyn Resource) -> StreamResult<StreamHandle> {
    if !res.has_magic(0, b"BITS") {
        return Err(StreamError::RejectedFormat("no magic".to_string()));
    }
    let mut h = StreamHandle::allocate(2, false)?;
    h.desc.sample_rate = 22050;
    h.desc.num_samples = 22050;
    h.desc.coding = CodingType::Pcm16Le;
    h.open_stream(res, 0x10)?;
    Ok(h)
}

#[test]
fn bitrate_counts_shared_resource_once() {
    let fs = MemoryFs::new();
    let mut data = vec![0u8; 1_000_000];
    data[..4].copy_from_slice(b"BITS");
    fs.insert("shared.bin", data);
    let mut res = fs.open("shared.bin").unwrap();
    let probers = [Prober {
        name: "bits",
        probe: shared_resource,
    }];
    let h = open_with_probers(&mut res, &probers).unwrap();
    res.close();

    assert_eq!(h.ch[0].resource, h.ch[1].resource);
    assert_eq!(h.average_bitrate(), 8_000_000);
    assert!(h.describe(4096).contains("bitrate: 8000 kbps\n"));
}

#[test]
fn bitrate_of_dual_stereo_adds_both_files() {
    let fs = MemoryFs::new();
    let data = dsp_file(40, None, 3, 0x12);
    let size = data.len() as u64;
    fs.insert("a_R.dsp", data.clone());
    let h = open_mem(&fs, "a_L.dsp", data).unwrap();
    assert_eq!(h.desc.channels, 2);
    assert_eq!(h.average_bitrate(), 2 * size * 8 * 32000 / 40);
}

#[test]
fn reset_is_idempotent() {
    let fs = MemoryFs::new();
    let mut h = open_mem(&fs, "loop.wav", ramp_wav(0, 50, Some((10, 39)))).unwrap();

    let first = render_all(&mut h, 120);
    h.reset();
    h.reset();
    let second = render_all(&mut h, 120);
    assert_eq!(first, second);
    assert_eq!(h.state.loop_count, 3);
}

#[test]
fn close_releases_every_handle_once() {
    let fs = MemoryFs::new();
    let h = open_mem(&fs, "c.wav", wav(2, 8000, &pcm16([0; 8]), None)).unwrap();
    assert_eq!(fs.live_handles(), 1);
    h.close();
    assert_eq!(fs.live_handles(), 0);
    assert_eq!(fs.open_count("c.wav"), fs.close_count("c.wav"));
}

#[test]
fn dsp_loop_keeps_live_history() {
    let fs = MemoryFs::new();
    let mut h = open_mem(&fs, "h.dsp", dsp_file(40, Some((2, 31)), 3, 0x12)).unwrap();
    render_all(&mut h, 28);
    h.ch[0].adpcm_history1_16 = 1234;

    assert!(h.do_loop());
    assert_eq!(h.state.current_sample, 0);
    assert_eq!(h.ch[0].offset, 0x60);
    assert_eq!(h.ch[0].adpcm_history1_16, 1234);
}

#[test]
fn pcm_loop_restores_saved_history() {
    let fs = MemoryFs::new();
    let mut h = open_mem(&fs, "h.wav", ramp_wav(0, 40, Some((0, 27)))).unwrap();
    render_all(&mut h, 28);
    h.ch[0].adpcm_history1_16 = 1234;

    assert!(h.do_loop());
    assert_eq!(h.state.current_sample, 0);
    assert_eq!(h.ch[0].adpcm_history1_16, 0);
}

#[test]
fn config_overrides_are_reverted_by_reset() {
    let fs = MemoryFs::new();
    let mut h = open_mem(&fs, "plain.wav", ramp_wav(0, 20, None)).unwrap();
    let config = PlayConfig {
        force_loop: true,
        loop_count: 1.0,
        fade_seconds: 0.0,
        ..Default::default()
    };
    h.apply_config(&config);
    assert_eq!(h.play_samples(&config), 20);

    let out = render_all(&mut h, 25);
    assert_eq!(out[20..], [0, 1, 2, 3, 4]);

    h.reset();
    assert!(!h.desc.loop_flag);
    assert_eq!(render_all(&mut h, 25)[20..], [0; 5]);
}

#[test]
fn open_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("disk.wav");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(&ramp_wav(5, 30, Some((3, 19)))).unwrap();
    drop(file);

    let mut h = vgm_engine::open(&path).unwrap();
    let text = h.describe(4096);
    assert!(text.contains("sample rate: 22050 Hz\n"));
    assert!(text.contains("loop end: 20 samples"));
    assert_eq!(render_all(&mut h, 3), vec![5, 6, 7]);

    assert!(vgm_engine::open(dir.path().join("missing.wav")).is_none());
    assert!(vgm_engine::open(dir.path()).is_none());
}

#[test]
#[serial]
fn logger_accepts_engine_messages() {
    let _ = vgm_engine::logging::init(LogLevel::All);
    assert_eq!(log::max_level(), log::LevelFilter::Trace);

    // rejection paths log at trace and debug
    let fs = MemoryFs::new();
    assert!(open_mem(&fs, "noise.raw", vec![1; 64]).is_none());
}
