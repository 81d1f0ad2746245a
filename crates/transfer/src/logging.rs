// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use config::LogConfig;
use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use std::path::PathBuf;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// File name of the current log file inside the log directory.
pub const LOG_FILE_NAME: &str = "transfer.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log level '{level}': {source}")]
    InvalidLogLevel {
        level: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Failed to create log directory or file appender: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A global logger is already installed: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Configuration for logging initialization
pub struct LoggingConfig<'a> {
    pub level: &'a str,
    pub json_format: bool,
    pub strip_ansi: bool,
    pub write_to_file: bool,
    pub write_path: &'a str,
    pub write_max_file_size: u64,
    pub write_max_files: usize,
}

impl<'a> From<&'a LogConfig> for LoggingConfig<'a> {
    fn from(config: &'a LogConfig) -> Self {
        Self {
            level: &config.level,
            json_format: config.json,
            strip_ansi: config.strip_ansi,
            write_to_file: config.write,
            write_path: &config.write_path,
            write_max_file_size: config.write_max_file_size,
            write_max_files: config.write_max_files,
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// When file logging is enabled the returned guard flushes the background
/// writer on drop and must be held until the program exits.
///
/// # Log Rotation
/// When the log file reaches `write_max_file_size` it is rotated to
/// `transfer.log.1`, `transfer.log.2`, ... keeping `write_max_files` files in
/// total, the current one included.
pub fn init_with_config(config: LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter =
        EnvFilter::try_new(config.level).map_err(|source| LoggingError::InvalidLogLevel {
            level: config.level.to_string(),
            source,
        })?;

    let mut layers: Vec<BoxedLayer> = vec![console_layer(&config)];

    let guard = if config.write_to_file {
        std::fs::create_dir_all(config.write_path)?;

        let file_appender = BasicRollingFileAppender::new(
            PathBuf::from(config.write_path).join(LOG_FILE_NAME),
            RollingConditionBasic::new().max_size(config.write_max_file_size),
            config.write_max_files.saturating_sub(1),
        )?;
        let (writer, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = if config.json_format {
            fmt::layer().json().with_writer(writer).boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer)
                .boxed()
        };
        layers.push(file_layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    Ok(guard)
}

fn console_layer(config: &LoggingConfig) -> BoxedLayer {
    if config.json_format {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(!config.strip_ansi)
            .with_writer(std::io::stderr)
            .boxed()
    }
}
