use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::batch::{BatchOptions, DEFAULT_INDEX_WIDTH};
use crate::interactive::ExtractOptions;
use crate::segmenter::DEFAULT_SILENCE_MS;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Silence added before and after every clip, in ms
    #[serde(default = "default_silence_ms")]
    pub silence_ms: u64,

    /// Zero-padding width of the caption index in batch file names
    #[serde(default = "default_index_width")]
    pub index_width: usize,

    /// Use batch-style zero-padded names for single extractions too
    #[serde(default)]
    pub pad_interactive_index: bool,

    /// Show a progress bar during batch runs
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

// Upper bound on configured silence
const MAX_SILENCE_MS: u64 = 60_000;

fn default_silence_ms() -> u64 {
    DEFAULT_SILENCE_MS
}

fn default_index_width() -> usize {
    DEFAULT_INDEX_WIDTH
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.index_width) {
            return Err(anyhow!(
                "index_width must be between 1 and 9, got {}",
                self.index_width
            ));
        }

        if self.silence_ms > MAX_SILENCE_MS {
            return Err(anyhow!(
                "silence_ms must not exceed {} ms, got {}",
                MAX_SILENCE_MS,
                self.silence_ms
            ));
        }

        Ok(())
    }

    /// Load the config at `path`, writing a default one first if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", path))?;

        Ok(config)
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            silence_ms: self.silence_ms,
            index_width: self.index_width,
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            silence_ms: self.silence_ms,
            index_width: self.pad_interactive_index.then_some(self.index_width),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            silence_ms: default_silence_ms(),
            index_width: default_index_width(),
            pad_interactive_index: false,
            show_progress: true,
            log_level: LogLevel::default(),
        }
    }
}
