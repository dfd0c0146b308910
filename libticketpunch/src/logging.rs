//! Logging setup shared by Ticket Punch front-ends
//!
//! All output goes to stderr so command output on stdout stays pipeable.
//! `RUST_LOG` always wins over the configured level.
//!
//! # Examples
//!
//! ```no_run
//! use libticketpunch::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::new(LogFormat::Json, "debug").try_init().ok();
//!
//! // Or honour TICKETPUNCH_LOG_FORMAT / TICKETPUNCH_LOG_LEVEL
//! libticketpunch::logging::init_default();
//! ```

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain single-line output
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Multi-line, coloured
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: impl Into<String>) -> Self {
        Self {
            format,
            level: level.into(),
        }
    }

    /// Bump the level to `debug` when `verbose` is set
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.level = "debug".to_string();
        }
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber.
    ///
    /// Fails if a subscriber is already installed (e.g. in tests that
    /// initialise logging more than once).
    pub fn try_init(&self) -> Result<(), String> {
        let filter = self.filter();
        let result = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .flatten_event(true)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init(),
        };
        result.map_err(|e| e.to_string())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(LogFormat::Text, "warn")
    }
}

/// Read `TICKETPUNCH_LOG_FORMAT` and `TICKETPUNCH_LOG_LEVEL`
pub fn config_from_env() -> LoggingConfig {
    let format = std::env::var("TICKETPUNCH_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();
    let level = std::env::var("TICKETPUNCH_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    LoggingConfig::new(format, level)
}

/// Initialize logging from the environment, ignoring a second init
pub fn init_default() {
    let _ = config_from_env().try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);

        let err = "xml".parse::<LogFormat>().unwrap_err();
        assert!(err.contains("Invalid log format: 'xml'"));
    }

    #[test]
    fn test_log_format_display() {
        assert_eq!(LogFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_verbose_raises_level() {
        let config = LoggingConfig::new(LogFormat::Text, "warn").verbose(true);
        assert_eq!(config.level, "debug");

        let config = LoggingConfig::new(LogFormat::Text, "warn").verbose(false);
        assert_eq!(config.level, "warn");
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("TICKETPUNCH_LOG_FORMAT", "json");
        std::env::set_var("TICKETPUNCH_LOG_LEVEL", "trace");
        let config = config_from_env();
        std::env::remove_var("TICKETPUNCH_LOG_FORMAT");
        std::env::remove_var("TICKETPUNCH_LOG_LEVEL");

        assert_eq!(config, LoggingConfig::new(LogFormat::Json, "trace"));
    }

    #[test]
    #[serial]
    fn test_config_from_env_ignores_bad_format() {
        std::env::set_var("TICKETPUNCH_LOG_FORMAT", "fancy");
        let config = config_from_env();
        std::env::remove_var("TICKETPUNCH_LOG_FORMAT");

        assert_eq!(config.format, LogFormat::Text);
    }
}
