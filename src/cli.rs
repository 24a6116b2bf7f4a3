use crate::config::{parse_loop_count, parse_seconds, parse_subsong, PlayConfig};
use crate::logging::LogLevel;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Decode game audio streams to raw PCM
#[derive(Parser, Debug, Default)]
#[command(name = "vgm-engine")]
#[command(version)]
#[command(about = "Identify, describe and render game audio streams", long_about = None)]
pub struct Cli {
    /// Input stream file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write interleaved signed 16-bit little-endian PCM to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Times to play the loop section (default 2.0)
    #[arg(short = 'l', long = "loop-count", value_name = "COUNT")]
    pub loop_count: Option<String>,

    /// Fade length in seconds (default 10.0)
    #[arg(short, long, value_name = "SECONDS")]
    pub fade: Option<String>,

    /// Delay before the fade in seconds (default 0.0)
    #[arg(short = 'd', long = "fade-delay", value_name = "SECONDS")]
    pub fade_delay: Option<String>,

    /// Ignore loop points and play straight through
    #[arg(short, long = "ignore-loop")]
    pub ignore_loop: bool,

    /// Loop the whole stream when it has no loop points
    #[arg(short = 'e', long = "force-loop")]
    pub force_loop: bool,

    /// Stop after the loop count and play the real ending
    #[arg(short = 'E', long = "loop-target")]
    pub loop_target: bool,

    /// Subsong to open (0 = default)
    #[arg(short, long, value_name = "INDEX")]
    pub subsong: Option<String>,

    /// More log output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Build the play configuration from the command line
    pub fn to_play_config(&self) -> Result<PlayConfig> {
        let mut config = PlayConfig::default();

        if let Some(ref count) = self.loop_count {
            config.loop_count = parse_loop_count(count)?;
        }

        if let Some(ref fade) = self.fade {
            config.fade_seconds = parse_seconds(fade).context("Invalid fade length")?;
        }

        if let Some(ref delay) = self.fade_delay {
            config.fade_delay_seconds = parse_seconds(delay).context("Invalid fade delay")?;
        }

        if self.ignore_loop && self.force_loop {
            anyhow::bail!("--ignore-loop and --force-loop cannot be combined");
        }
        config.ignore_loop = self.ignore_loop;
        config.force_loop = self.force_loop;
        config.loop_target_as_count = self.loop_target;

        if let Some(ref subsong) = self.subsong {
            config.subsong = parse_subsong(subsong)?;
        }

        Ok(config)
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_verbosity(self.verbose)
    }
}
