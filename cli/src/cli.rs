use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use engine::{EngineConfig, QuotePair, RejectPolicy};

#[derive(Debug, Parser)]
#[clap(name = "pairsignal", version, about = "Replay paired quotes into ratio signal rows")]
pub struct Cli {
    /// Number of ratios in the moving-average window
    /// (overrides SIGNAL_WINDOW_CAPACITY)
    #[clap(long)]
    pub window_capacity: Option<usize>,

    /// Breach threshold as a fraction of 1.0 (overrides SIGNAL_THRESHOLD)
    #[clap(long)]
    pub threshold: Option<f64>,

    /// Newline-delimited JSON quote pairs; reads stdin when omitted
    #[clap(long)]
    pub input: Option<PathBuf>,

    /// Stop at the first malformed update instead of skipping it
    #[clap(long)]
    pub halt_on_error: bool,

    /// Emit logs as JSON
    #[clap(long, env = "PAIRSIGNAL_JSON_LOGS")]
    pub json_logs: bool,
}

impl Cli {
    pub(crate) fn reject_policy(&self) -> RejectPolicy {
        if self.halt_on_error {
            RejectPolicy::Halt
        } else {
            RejectPolicy::Skip
        }
    }
}

/// Environment configuration with CLI flags layered on top.
pub(crate) fn build_config(cli: &Cli, base: EngineConfig) -> anyhow::Result<EngineConfig> {
    let cfg = EngineConfig::new(
        cli.window_capacity.unwrap_or(base.window_capacity),
        cli.threshold.unwrap_or(base.threshold),
    )?;
    Ok(cfg)
}

/// Parse one input line. Blank lines yield `None`.
pub(crate) fn parse_line(line: &str, line_no: usize) -> anyhow::Result<Option<QuotePair>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let pair = serde_json::from_str::<QuotePair>(trimmed)
        .with_context(|| format!("line {line_no}: malformed quote pair"))?;
    Ok(Some(pair))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["pairsignal"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn flags_override_base_config() {
        let c = cli(&["--window-capacity", "3", "--threshold", "0.1"]);
        let cfg = build_config(&c, EngineConfig::default()).unwrap();

        assert_eq!(cfg.window_capacity, 3);
        assert_eq!(cfg.threshold, 0.1);
    }

    #[test]
    fn base_config_used_when_flags_absent() {
        let base = EngineConfig::new(7, 0.2).unwrap();
        let cfg = build_config(&cli(&[]), base).unwrap();
        assert_eq!(cfg, base);
    }

    #[test]
    fn invalid_flag_values_are_rejected() {
        let c = cli(&["--threshold", "1.5"]);
        assert!(build_config(&c, EngineConfig::default()).is_err());

        let c = cli(&["--window-capacity", "0"]);
        assert!(build_config(&c, EngineConfig::default()).is_err());
    }

    #[test]
    fn halt_flag_selects_policy() {
        assert_eq!(cli(&[]).reject_policy(), RejectPolicy::Skip);
        assert_eq!(cli(&["--halt-on-error"]).reject_policy(), RejectPolicy::Halt);
    }

    #[test]
    fn parses_json_line() {
        let line = r#"{"a":{"instrument":"ABC","ask_price":100.0,"bid_price":98.0,"timestamp":"2019-02-11T22:06:30Z"},"b":{"instrument":"DEF","ask_price":90.0,"bid_price":88.0,"timestamp":"2019-02-11T22:06:30Z"}}"#;

        let pair = parse_line(line, 1).unwrap().unwrap();
        assert_eq!(pair.a.instrument, "ABC");
        assert_eq!(pair.b.bid_price, 88.0);
        assert_eq!(
            pair.timestamp(),
            "2019-02-11T22:06:30Z".parse::<chrono::DateTime<chrono::Utc>>().unwrap()
        );
    }

    #[test]
    fn blank_line_is_skipped_and_garbage_is_an_error() {
        assert!(parse_line("   ", 1).unwrap().is_none());

        let err = parse_line("{not json", 4).unwrap_err();
        assert!(err.to_string().contains("line 4"));
    }
}
