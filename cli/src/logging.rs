// agricredit/cli/src/logging.rs

//! Structured logging for the CLI.
//!
//! Logs go to stderr so command output on stdout stays machine readable.
//!
//! Environment variables:
//! - `RUST_LOG`: filter directive, e.g. `info,agricredit_marketplace=debug`
//! - `LOG_FORMAT`: `pretty`, `json` or `compact`
//! - `LOG_ANSI`: `true`/`false`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "error" => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }

    /// `-v` count to level; quiet by default
    pub fn from_verbosity(verbose: u8) -> Self {
        match verbose {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub ansi_colors: bool,
    /// Per-crate overrides appended to the base level
    pub module_levels: Vec<(String, LogLevel)>,
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            ansi_colors: true,
            module_levels: vec![("rocksdb".to_string(), LogLevel::Warn)],
            include_target: false,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            let level = rust_log.split(',').next().unwrap_or("warn");
            config.level = LogLevel::parse(level);
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            config.format = LogFormat::parse(&format);
        }
        if let Ok(ansi) = std::env::var("LOG_ANSI") {
            config.ansi_colors = ansi.to_lowercase() == "true";
        }

        config
    }

    /// Raise the level to at least what `-v` asked for
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.level = self.level.max(LogLevel::from_verbosity(verbose));
        self
    }

    fn build_filter(&self) -> String {
        let mut filter = self.level.as_str().to_string();
        for (module, level) in &self.module_levels {
            filter.push_str(&format!(",{}={}", module, level.as_str()));
        }
        filter
    }
}

pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(rust_log) => EnvFilter::new(rust_log),
        Err(_) => EnvFilter::new(config.build_filter()),
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.include_target);

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry.with(layer.json().with_ansi(false)).try_init(),
        LogFormat::Pretty => registry
            .with(layer.pretty().with_ansi(config.ansi_colors))
            .try_init(),
        LogFormat::Compact => registry
            .with(layer.compact().with_ansi(config.ansi_colors))
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to init logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!(LogLevel::parse("trace"), LogLevel::Trace);
        assert_eq!(LogLevel::parse("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::parse("Info"), LogLevel::Info);
        assert_eq!(LogLevel::parse("error"), LogLevel::Error);
        assert_eq!(LogLevel::parse("bogus"), LogLevel::Warn);
    }

    #[test]
    fn test_verbosity_only_raises() {
        let config = LogConfig::default().with_verbosity(2);
        assert_eq!(config.level, LogLevel::Debug);

        let config = LogConfig {
            level: LogLevel::Trace,
            ..LogConfig::default()
        }
        .with_verbosity(1);
        assert_eq!(config.level, LogLevel::Trace);
    }

    #[test]
    fn test_build_filter() {
        let config = LogConfig {
            level: LogLevel::Info,
            module_levels: vec![("agricredit_storage".to_string(), LogLevel::Debug)],
            ..LogConfig::default()
        };
        let filter = config.build_filter();
        assert!(filter.starts_with("info"));
        assert!(filter.contains("agricredit_storage=debug"));
    }
}
