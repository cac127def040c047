//! Configuration types and CLI options.
//!
//! This module defines the library configuration consumed by `Client` and the
//! command-line options parsed by the binary.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT, DNS_TIMEOUT_SECS, TCP_CONNECT_TIMEOUT_SECS,
    TLS_HANDSHAKE_TIMEOUT_SECS,
};
use crate::message::Method;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// Shared by every session a `Client` starts. Per-request settings such as
/// the redirect budget and the overall timeout live on the `Request`.
///
/// # Examples
///
/// ```no_run
/// use http_session::Config;
/// use std::time::Duration;
///
/// let config = Config {
///     connect_timeout: Duration::from_secs(2),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// User-Agent injected into requests that do not carry one (`None` disables)
    pub user_agent: Option<String>,

    /// Timeout for each individual TCP connect attempt
    pub connect_timeout: Duration,

    /// Timeout for the TLS handshake
    pub handshake_timeout: Duration,

    /// Timeout for a single DNS query
    pub dns_timeout: Duration,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            connect_timeout: Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            handshake_timeout: Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
            dns_timeout: Duration::from_secs(DNS_TIMEOUT_SECS),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

/// Command-line options for the `http_session` binary.
#[derive(Debug, Parser)]
#[command(
    name = "http_session",
    about = "Fetch one or more URLs over HTTP/1.1 and print the responses."
)]
pub struct Opt {
    /// URLs to fetch (fetched concurrently)
    #[arg(required = true, num_args = 1..)]
    pub urls: Vec<String>,

    /// Request method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: Method,

    /// Request body
    #[arg(short, long)]
    pub data: Option<String>,

    /// Content-Type of the request body
    #[arg(long, default_value = "text/plain; charset=utf-8")]
    pub content_type: String,

    /// Extra request headers in `Name: value` form
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Maximum number of redirects to follow
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    /// Follow redirects without a hop limit
    #[arg(long)]
    pub unlimited_redirects: bool,

    /// Overall timeout per hop in milliseconds (0 disables)
    #[arg(long, default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// User-Agent header value
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Print response headers
    #[arg(short, long)]
    pub include: bool,

    /// Print a JSON summary per response instead of the raw body
    #[arg(long)]
    pub json: bool,

    /// Log level
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Builds the library configuration from the parsed options.
    pub fn to_config(&self) -> Config {
        Config {
            user_agent: Some(
                self.user_agent
                    .clone()
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            ),
            log_level: self.log_level,
            log_format: self.log_format,
            ..Default::default()
        }
    }

    /// Overall timeout per hop; zero disables it.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Effective redirect cap, `None` meaning unlimited.
    pub fn redirect_cap(&self) -> Option<usize> {
        if self.unlimited_redirects {
            None
        } else {
            Some(self.max_redirects)
        }
    }
}
