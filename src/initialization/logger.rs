//! Logger initialization.
//!
//! Two output formats: coloured lines for a terminal and one JSON object per
//! line for log shippers.

use std::io::{self, Write};

use colored::*;
use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Record};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependencies whose chatter is capped regardless of the requested level.
const QUIET_MODULES: &[(&str, LevelFilter)] = &[
    // Truncated or malformed UDP answers are retried by the resolver itself
    ("trust_dns_proto", LevelFilter::Error),
    ("trust_dns_resolver", LevelFilter::Warn),
    ("rustls", LevelFilter::Warn),
];

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first; `level` then applies to everything not listed
/// in the quiet set.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Per-stage progress for one fetch
/// http_session https://example.com --log-level debug
///
/// # Structured output for log shippers
/// http_session https://example.com --log-format json
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, cap) in QUIET_MODULES {
        builder.filter_module(module, (*cap).min(level));
    }
    builder.filter_module("http_session", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| writeln!(buf, "{}", json_line(record)));
        }
        LogFormat::Plain => {
            colored::control::set_override(true);
            builder.format(plain_line);
        }
    }

    builder.try_init()?;
    Ok(())
}

fn json_line(record: &Record<'_>) -> String {
    let message = serde_json::Value::String(record.args().to_string());
    format!(
        "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
        chrono::Utc::now().timestamp_millis(),
        record.level(),
        record.target(),
        message
    )
}

fn plain_line(buf: &mut Formatter, record: &Record<'_>) -> io::Result<()> {
    let level = record.level().to_string();
    let level = match record.level() {
        Level::Error => level.red().bold(),
        Level::Warn => level.yellow(),
        Level::Info => level.green(),
        Level::Debug => level.blue(),
        Level::Trace => level.purple(),
    };
    writeln!(
        buf,
        "{} {} [{}] {}",
        chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
        record.target().cyan(),
        level,
        record.args()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_is_valid_json() {
        let line = json_line(
            &Record::builder()
                .args(format_args!("quote \" and\nnewline"))
                .level(Level::Warn)
                .target("http_session::responder")
                .build(),
        );
        let value: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["target"], "http_session::responder");
        assert_eq!(value["msg"], "quote \" and\nnewline");
        assert!(value["ts"].is_i64());
    }

    #[test]
    fn test_second_init_reports_logger_error() {
        let _ = init_logger_with(LevelFilter::Warn, LogFormat::Plain);
        let result = init_logger_with(LevelFilter::Trace, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }
}
