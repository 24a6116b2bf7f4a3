use anyhow::{Context, Result};

/// How a stream should be played: loop count, fade and loop overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayConfig {
    /// Times the loop section is played (fractions allowed).
    pub loop_count: f64,
    pub fade_seconds: f64,
    pub fade_delay_seconds: f64,

    /// Play straight through, ignoring loop points.
    pub ignore_loop: bool,
    /// Loop the whole stream when it has no loop points.
    pub force_loop: bool,
    /// Stop looping after `loop_count` loops and play the real ending
    /// instead of fading out.
    pub loop_target_as_count: bool,

    /// Subsong to open (0 = default).
    pub subsong: i32,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            loop_count: 2.0,
            fade_seconds: 10.0,
            fade_delay_seconds: 0.0,
            ignore_loop: false,
            force_loop: false,
            loop_target_as_count: false,
            subsong: 0,
        }
    }
}

/// Parse a loop count (non-negative, fractions allowed)
pub fn parse_loop_count(s: &str) -> Result<f64> {
    let count: f64 = s.trim().parse().context("Invalid loop count")?;
    if !count.is_finite() || count < 0.0 {
        anyhow::bail!("Loop count must be a non-negative number");
    }
    Ok(count)
}

/// Parse a duration in seconds
pub fn parse_seconds(s: &str) -> Result<f64> {
    let seconds: f64 = s.trim().parse().context("Invalid seconds value")?;
    if !seconds.is_finite() || seconds < 0.0 {
        anyhow::bail!("Seconds must be a non-negative number");
    }
    Ok(seconds)
}

/// Parse a subsong index (0-65535)
pub fn parse_subsong(s: &str) -> Result<i32> {
    let index: i32 = s.trim().parse().context("Invalid subsong index")?;
    if !(0..=65535).contains(&index) {
        anyhow::bail!("Subsong index out of range (0 to 65535)");
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlayConfig::default();
        assert_eq!(config.loop_count, 2.0);
        assert_eq!(config.fade_seconds, 10.0);
        assert_eq!(config.fade_delay_seconds, 0.0);
        assert!(!config.ignore_loop);
        assert_eq!(config.subsong, 0);
    }

    #[test]
    fn test_parse_loop_count() {
        assert_eq!(parse_loop_count("1.5").unwrap(), 1.5);
        assert_eq!(parse_loop_count(" 3 ").unwrap(), 3.0);
        assert!(parse_loop_count("-1").is_err());
        assert!(parse_loop_count("inf").is_err());
        assert!(parse_loop_count("abc").is_err());
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("0").unwrap(), 0.0);
        assert_eq!(parse_seconds("2.25").unwrap(), 2.25);
        assert!(parse_seconds("-0.5").is_err());
        assert!(parse_seconds("NaN").is_err());
    }

    #[test]
    fn test_parse_subsong() {
        assert_eq!(parse_subsong("12").unwrap(), 12);
        assert!(parse_subsong("65536").is_err());
        assert!(parse_subsong("-1").is_err());
        assert!(parse_subsong("x").is_err());
    }
}
