//! Loop engine
//!
//! Looping is sample accurate: renderers never decode across the loop
//! start or end in one call, so [`StreamHandle::do_loop`] always sees the
//! cursor exactly on a loop point.

use crate::config::PlayConfig;
use crate::layout::LayoutData;

use super::channel::ChannelState;
use super::handle::StreamHandle;
use super::types::{CodingType, MetaType};

impl StreamHandle {
    /// Longest run of samples that can be decoded without crossing the end
    /// of the block, a loop point or a frame boundary.
    pub fn samples_to_do(&self, samples_this_block: i32, samples_per_frame: i32) -> i32 {
        let state = &self.state;
        let samples_left_this_block = samples_this_block - state.samples_into_block;
        let mut samples_to_do = samples_left_this_block;

        if self.desc.loop_flag {
            if state.current_sample + samples_left_this_block > self.desc.loop_end_sample {
                samples_to_do = self.desc.loop_end_sample - state.current_sample;
            }

            if !state.hit_loop
                && state.current_sample + samples_left_this_block > self.desc.loop_start_sample
            {
                samples_to_do = self.desc.loop_start_sample - state.current_sample;
            }
        }

        if samples_per_frame > 1
            && (state.samples_into_block % samples_per_frame) + samples_to_do > samples_per_frame
        {
            samples_to_do = samples_per_frame - (state.samples_into_block % samples_per_frame);
        }

        samples_to_do
    }

    fn preserves_history_on_loop(&self) -> bool {
        matches!(
            self.desc.meta,
            MetaType::DspStd | MetaType::DspRs03 | MetaType::DspCstr
        ) || matches!(self.desc.coding, CodingType::Psx | CodingType::PsxBadFlags)
    }

    /// Save cursors at the loop start, or jump back at the loop end.
    ///
    /// Returns true when the cursors were restored to the loop start.
    pub fn do_loop(&mut self) -> bool {
        if self.state.current_sample == self.desc.loop_end_sample {
            self.state.loop_count += 1;
            if self.desc.loop_target > 0 && self.desc.loop_target == self.state.loop_count {
                // play out to the natural end from here
                self.desc.loop_flag = false;
                return false;
            }

            let channels = self.desc.channels;
            let preserve = self.preserves_history_on_loop();
            let loop_ch = self
                .loop_ch
                .get_or_insert_with(|| vec![ChannelState::default(); channels]);

            if preserve {
                for (saved, live) in loop_ch.iter_mut().zip(self.ch.iter()) {
                    saved.copy_history_from(live);
                }
            }

            self.codec.seek(self.state.loop_sample);

            self.ch.clear();
            self.ch.extend_from_slice(loop_ch.as_slice());

            let state = &mut self.state;
            state.current_sample = state.loop_sample;
            state.samples_into_block = state.loop_samples_into_block;
            state.current_block_size = state.loop_block_size;
            state.current_block_samples = state.loop_block_samples;
            state.current_block_offset = state.loop_block_offset;
            state.next_block_offset = state.loop_next_block_offset;

            return true;
        }

        if !self.state.hit_loop && self.state.current_sample == self.desc.loop_start_sample {
            let channels = self.desc.channels;
            let loop_ch = self
                .loop_ch
                .get_or_insert_with(|| vec![ChannelState::default(); channels]);
            loop_ch.clear();
            loop_ch.extend_from_slice(&self.ch);

            let state = &mut self.state;
            state.loop_sample = state.current_sample;
            state.loop_samples_into_block = state.samples_into_block;
            state.loop_block_size = state.current_block_size;
            state.loop_block_samples = state.current_block_samples;
            state.loop_block_offset = state.current_block_offset;
            state.loop_next_block_offset = state.next_block_offset;
            state.hit_loop = true;
        }

        false
    }

    /// Enable, move or disable looping after the stream was opened.
    ///
    /// Layered children follow; segmented children keep their own loops.
    pub fn force_loop(&mut self, loop_flag: bool, loop_start_sample: i32, loop_end_sample: i32) {
        if loop_flag && !self.desc.loop_flag && self.loop_ch.is_none() {
            // filled when decoding reaches the loop start
            self.loop_ch = Some(vec![ChannelState::default(); self.desc.channels]);
        } else if !loop_flag && self.desc.loop_flag {
            self.loop_ch = None;
        }

        self.desc.loop_flag = loop_flag;
        if loop_flag {
            self.desc.loop_start_sample = loop_start_sample;
            self.desc.loop_end_sample = loop_end_sample;
        } else {
            self.desc.loop_start_sample = 0;
            self.desc.loop_end_sample = 0;
        }

        if let LayoutData::Layered(data) = &mut self.layout_data {
            for layer in data.layers.iter_mut() {
                layer.force_loop(loop_flag, loop_start_sample, loop_end_sample);
            }
        }
    }

    /// Stop looping after `loop_target` loops (0 = never stop).
    pub fn set_loop_target(&mut self, loop_target: i32) {
        self.desc.loop_target = loop_target;

        if let LayoutData::Layered(data) = &mut self.layout_data {
            for layer in data.layers.iter_mut() {
                layer.set_loop_target(loop_target);
            }
        }
    }

    /// Samples a player would output under `config`.
    pub fn play_samples(&self, config: &PlayConfig) -> i32 {
        let desc = &self.desc;
        if !desc.loop_flag {
            return desc.num_samples;
        }

        let loop_length = (desc.loop_end_sample - desc.loop_start_sample) as i64;
        let loops = config.loop_count as i32;

        if desc.loop_target == loops {
            // play the real ending instead of fading out
            let total = desc.loop_start_sample as i64
                + loop_length * loops as i64
                + (desc.num_samples - desc.loop_end_sample) as i64;
            total.clamp(i32::MIN as i64, i32::MAX as i64) as i32
        } else {
            let total = desc.loop_start_sample as f64
                + loop_length as f64 * config.loop_count
                + (config.fade_delay_seconds + config.fade_seconds) * desc.sample_rate as f64;
            total as i32
        }
    }

    /// Apply the loop overrides of `config`. A later [`reset`](Self::reset)
    /// reverts them.
    pub fn apply_config(&mut self, config: &PlayConfig) {
        if config.ignore_loop && self.desc.loop_flag {
            self.force_loop(false, 0, 0);
        }

        if config.force_loop && !config.ignore_loop && !self.desc.loop_flag {
            let num_samples = self.desc.num_samples;
            self.force_loop(true, 0, num_samples);
        }

        if config.loop_target_as_count && self.desc.loop_flag {
            self.set_loop_target(config.loop_count as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::handle::LoopState;

    fn looped(start: i32, end: i32, total: i32) -> StreamHandle {
        let mut h = StreamHandle::allocate(1, true).unwrap();
        h.desc.sample_rate = 1000;
        h.desc.num_samples = total;
        h.desc.loop_start_sample = start;
        h.desc.loop_end_sample = end;
        h.finalize();
        h
    }

    #[test]
    fn test_samples_to_do_stops_at_loop_points() {
        let mut h = looped(100, 200, 300);
        assert_eq!(h.samples_to_do(300, 1), 100);

        h.state.current_sample = 100;
        h.state.samples_into_block = 100;
        h.state.hit_loop = true;
        assert_eq!(h.samples_to_do(300, 1), 100);

        h.state.current_sample = 150;
        h.state.samples_into_block = 150;
        assert_eq!(h.samples_to_do(300, 1), 50);
    }

    #[test]
    fn test_samples_to_do_frame_boundary() {
        let mut h = StreamHandle::allocate(1, false).unwrap();
        h.desc.num_samples = 1000;
        h.state.samples_into_block = 10;
        assert_eq!(h.samples_to_do(1000, 14), 4);
        h.state.samples_into_block = 14;
        assert_eq!(h.samples_to_do(1000, 14), 14);
        assert_eq!(h.samples_to_do(1000, 1), 986);
    }

    #[test]
    fn test_do_loop_save_and_restore() {
        let mut h = looped(100, 200, 300);
        assert_eq!(h.loop_state(), LoopState::Armed);

        h.state.current_sample = 100;
        h.state.samples_into_block = 100;
        h.ch[0].offset = 0x100;
        assert!(!h.do_loop());
        assert_eq!(h.loop_state(), LoopState::Saved);
        assert_eq!(h.loop_cursors().unwrap()[0].offset, 0x100);

        h.state.current_sample = 200;
        h.state.samples_into_block = 200;
        h.ch[0].offset = 0x200;
        assert!(h.do_loop());
        assert_eq!(h.state.current_sample, 100);
        assert_eq!(h.state.samples_into_block, 100);
        assert_eq!(h.ch[0].offset, 0x100);
        assert_eq!(h.state.loop_count, 1);
    }

    #[test]
    fn test_loop_target_ends_looping() {
        let mut h = looped(0, 50, 80);
        h.set_loop_target(2);
        assert!(!h.do_loop()); // saves at sample 0

        h.state.current_sample = 50;
        assert!(h.do_loop());
        h.state.current_sample = 50;
        assert!(!h.do_loop());
        assert!(!h.desc.loop_flag);
        assert_eq!(h.loop_state(), LoopState::Unarmed);
    }

    #[test]
    fn test_force_loop_allocates_and_frees() {
        let mut h = StreamHandle::allocate(2, false).unwrap();
        h.desc.num_samples = 500;
        h.force_loop(true, 10, 400);
        assert_eq!(h.loop_cursors().map(|c| c.len()), Some(2));
        assert_eq!(h.desc.loop_start_sample, 10);

        h.force_loop(false, 10, 400);
        assert!(h.loop_cursors().is_none());
        assert_eq!(h.desc.loop_start_sample, 0);
        assert_eq!(h.desc.loop_end_sample, 0);
    }

    #[test]
    fn test_play_samples() {
        let mut h = looped(100, 200, 300);
        let config = PlayConfig {
            loop_count: 2.0,
            fade_seconds: 10.0,
            fade_delay_seconds: 0.0,
            ..Default::default()
        };
        assert_eq!(h.play_samples(&config), 100 + 200 + 10_000);

        h.set_loop_target(2);
        assert_eq!(h.play_samples(&config), 100 + 200 + 100);

        h.force_loop(false, 0, 0);
        assert_eq!(h.play_samples(&config), 300);
    }

    #[test]
    fn test_apply_config() {
        let mut h = looped(100, 200, 300);
        h.apply_config(&PlayConfig {
            loop_target_as_count: true,
            ..Default::default()
        });
        assert_eq!(h.desc.loop_target, 2);

        h.apply_config(&PlayConfig {
            ignore_loop: true,
            ..Default::default()
        });
        assert_eq!(h.loop_state(), LoopState::Unarmed);

        h.apply_config(&PlayConfig {
            force_loop: true,
            ..Default::default()
        });
        assert!(h.desc.loop_flag);
        assert_eq!(h.desc.loop_start_sample, 0);
        assert_eq!(h.desc.loop_end_sample, 300);

        h.reset();
        assert_eq!(h.desc.loop_start_sample, 100);
        assert_eq!(h.desc.loop_target, 0);
    }

    #[test]
    fn test_framed_chunks_never_straddle_loop_points() {
        let mut h = looped(100, 200, 300);
        h.set_loop_target(2);

        let mut total = 0;
        let mut restores = 0;
        loop {
            if h.desc.loop_flag && h.do_loop() {
                restores += 1;
                continue;
            }
            let n = h.samples_to_do(300, 4);
            if n <= 0 {
                break;
            }

            let start = h.state.current_sample;
            assert!((h.state.samples_into_block % 4) + n <= 4);
            if h.desc.loop_flag {
                for point in [100, 200] {
                    assert!(!(start < point && start + n > point), "{start}+{n} crosses {point}");
                }
            }

            h.state.current_sample += n;
            h.state.samples_into_block += n;
            total += n;
        }

        assert_eq!(restores, 1);
        assert!(!h.desc.loop_flag);
        assert_eq!(h.state.current_sample, 300);
        assert_eq!(total, 100 + 2 * 100 + 100);
    }

    #[test]
    fn test_psx_loop_keeps_wide_history() {
        let mut h = looped(0, 28, 56);
        h.desc.coding = CodingType::Psx;
        h.desc.meta = MetaType::PsxVag;
        assert!(!h.do_loop());

        h.state.current_sample = 28;
        h.ch[0].offset = 0x40;
        h.ch[0].adpcm_history1_32 = 77;
        h.ch[0].adpcm_history2_32 = -3;
        assert!(h.do_loop());
        assert_eq!(h.ch[0].offset, 0);
        assert_eq!(h.ch[0].adpcm_history1_32, 77);
        assert_eq!(h.ch[0].adpcm_history2_32, -3);
    }

    #[test]
    fn test_pcm_loop_restores_wide_history() {
        let mut h = looped(0, 28, 56);
        assert!(!h.do_loop());

        h.state.current_sample = 28;
        h.ch[0].adpcm_history1_32 = 77;
        assert!(h.do_loop());
        assert_eq!(h.ch[0].adpcm_history1_32, 0);
    }
}
