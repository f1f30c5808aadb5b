use anyhow::Result;
use std::io;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Build the filter from the verbosity flags; `RUST_LOG` wins unless `-q` is given.
///
/// 0 = warn (command output already reports state changes), 1 = debug with hyper's
/// connection chatter suppressed, 2+ = trace.
fn build_filter(verbose_level: u8, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    let default = match verbose_level {
        0 => "warn",
        1 => "debug,hyper::proto::h1=warn,hyper::client::pool=warn",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Prefix for the daily log files: `reelbase.log` rotates to `reelbase.2026-10-16`, ...
fn rotation_prefix(log_filename: &str) -> &str {
    log_filename.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(log_filename)
}

pub fn init_logging(verbose_level: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let filter = build_filter(verbose_level, quiet);

    let json = std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or_else(|_| !io::stdout().is_terminal());

    let registry = Registry::default().with(filter);

    if let Some(log_path) = log_file {
        let log_dir = log_path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
        std::fs::create_dir_all(log_dir)?;
        let log_filename = log_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;

        let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, rotation_prefix(log_filename));

        if json {
            let layer = fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(file_appender);
            registry.with(layer).init();
        } else {
            let layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(file_appender);
            registry.with(layer).init();
        }
    } else if json {
        let layer = fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);
        registry.with(layer).init();
    } else {
        let layer = fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);
        registry.with(layer).init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_prefix_drops_extension() {
        assert_eq!(rotation_prefix("reelbase.log"), "reelbase");
        assert_eq!(rotation_prefix("reelbase"), "reelbase");
        assert_eq!(rotation_prefix("reelbase.debug.log"), "reelbase.debug");
    }
}
