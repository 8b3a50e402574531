// ABOUTME: Logging configuration and structured logging setup for the proxy and CLI
// ABOUTME: Configures log levels, formatters, and output destinations via tracing-subscriber
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! Production-ready logging configuration with structured output

use std::env;
use std::io;

use anyhow::Result;
use serde_json::json;
use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::constants::service_names;

/// Logging configuration
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)] // Independent output toggles
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Output stream
    pub writer: LogWriter,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

/// Log output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogWriter {
    /// Standard output (servers)
    Stdout,
    /// Standard error (interactive tools writing their own output to stdout)
    Stderr,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::COPILOT_PROXY.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
            writer: LogWriter::Stdout,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: is_production || env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::COPILOT_PROXY.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
            environment,
            writer: LogWriter::Stdout,
        }
    }

    /// Quiet configuration for the interactive terminal client
    ///
    /// Compact output on stderr at `warn` unless `RUST_LOG` says otherwise.
    #[must_use]
    pub fn for_cli() -> Self {
        Self {
            level: env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
            format: LogFormat::Compact,
            service_name: service_names::COPILOT_CLI.into(),
            writer: LogWriter::Stderr,
            ..Self::default()
        }
    }

    /// Build the environment filter with noise reduction for HTTP internals
    ///
    /// A compound `level` such as `info,hyper=debug` is used as given, with no
    /// crate-level directive derived from it.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let filter = EnvFilter::new(&self.level);
        let crate_directive = (!self.level.contains([',', '=']))
            .then(|| format!("alivee_copilot={}", self.level));

        ["hyper=warn", "hyper::proto=warn", "reqwest=warn", "tower_http=info"]
            .into_iter()
            .map(str::to_owned)
            .chain(crate_directive)
            .filter_map(|directive| directive.parse::<Directive>().ok())
            .fold(filter, EnvFilter::add_directive)
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        match self.writer {
            LogWriter::Stdout => self.init_with_writer(io::stdout)?,
            LogWriter::Stderr => self.init_with_writer(io::stderr)?,
        }

        self.log_startup_info();
        Ok(())
    }

    fn init_with_writer<W>(&self, writer: W) -> Result<()>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let registry = Registry::default().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(writer)
                    .with_span_events(span_events)
                    .json();

                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(writer)
                    .with_span_events(span_events);

                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_target(false)
                    .with_writer(writer)
                    .with_span_events(FmtSpan::NONE);

                registry.with(compact_layer).try_init()?;
            }
        }

        Ok(())
    }

    /// Log structured startup information
    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Alivee Copilot starting up"
        );

        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "features": {
                    "location": self.include_location,
                    "thread": self.include_thread,
                    "spans": self.include_spans
                }
            }
        });

        info!("Configuration loaded: {config_summary}");
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_writes_compact_to_stderr() {
        let config = LoggingConfig::for_cli();
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.writer, LogWriter::Stderr);
        assert_eq!(config.service_name, service_names::COPILOT_CLI);
    }

    #[test]
    fn test_env_filter_accepts_plain_level() {
        let config = LoggingConfig {
            level: "debug".into(),
            ..LoggingConfig::default()
        };
        let rendered = config.env_filter().to_string();
        assert!(rendered.contains("alivee_copilot=debug"));
        assert!(rendered.contains("reqwest=warn"));
    }

    #[test]
    fn test_env_filter_keeps_compound_directive_as_given() {
        let config = LoggingConfig {
            level: "warn,alivee_copilot::proxy=trace".into(),
            ..LoggingConfig::default()
        };
        let rendered = config.env_filter().to_string();
        assert!(rendered.contains("alivee_copilot::proxy=trace"));
        assert!(!rendered.contains("alivee_copilot=warn"));
        assert!(!rendered.split(',').any(|directive| directive == "info"));
    }
}
