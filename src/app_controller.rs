use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::Path;

use crate::app_config::Config;
use crate::audio::AudioAsset;
use crate::batch::{run_batch, BatchReport};
use crate::caption_processor::{record_from_row, serialize_rows, CaptionDocument, ParseDiagnostic};
use crate::file_utils::FileManager;
use crate::interactive::{extract_one, finalize, ClipPaths};

// @module: Application controller wiring configuration, files and the clip engine

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config {
            show_progress: false,
            ..Config::default()
        })
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Cut every caption of `caption_path` out of `audio_path` into `output_dir`
    pub fn run_batch(&self, caption_path: &Path, audio_path: &Path, output_dir: &Path) -> Result<BatchReport> {
        let start_time = std::time::Instant::now();

        let document = CaptionDocument::from_file(caption_path)?;
        if !document.diagnostics.is_empty() {
            warn!(
                "Skipped {} malformed caption block(s) in {:?}",
                document.diagnostics.len(),
                caption_path
            );
        }

        let audio = AudioAsset::decode_file(audio_path)
            .with_context(|| format!("Failed to load audio: {:?}", audio_path))?;

        info!(
            "Cutting {} caption(s) from {:?} into {:?}",
            document.records.len(),
            audio_path,
            output_dir
        );

        let progress_bar = self.progress_bar(document.records.len() as u64);
        let pb = progress_bar.clone();
        let report = run_batch(&document, &audio, output_dir, self.config.batch_options(), move |done, _total| {
            pb.set_position(done as u64);
        })?;
        progress_bar.finish_and_clear();

        info!(
            "Generated {} of {} clip pair(s) in {}.",
            report.written.len(),
            report.total(),
            Self::format_duration(start_time.elapsed())
        );
        for failure in &report.failures {
            warn!("Caption {}: {}", failure.index, failure.message);
        }

        Ok(report)
    }

    /// Parse a caption file for display
    pub fn load_captions(&self, caption_path: &Path) -> Result<CaptionDocument> {
        let document = CaptionDocument::from_file(caption_path)?;
        debug!("{}", document);
        Ok(document)
    }

    /// Cut the caption with `index` from `caption_path` for preview
    pub fn extract_selected(&self, caption_path: &Path, audio_path: &Path, index: u64) -> Result<ClipPaths> {
        let document = CaptionDocument::from_file(caption_path)?;
        let record = document
            .find(index)
            .ok_or_else(|| anyhow!("No caption with index {} in {:?}", index, caption_path))?;

        let paths = extract_one(audio_path, record, self.config.extract_options())?;
        info!("Clip ready: {:?}", paths.audio_path);
        Ok(paths)
    }

    /// Cut a clip for a selected table row `[index, start, end, text]`
    pub fn extract_row(&self, audio_path: &Path, row: &[String]) -> Result<ClipPaths> {
        let record = record_from_row(row)?;
        extract_one(audio_path, &record, self.config.extract_options())
    }

    /// Move a previewed pair into `destination_dir`. Problems are reported as
    /// warnings; returns whether both files were moved.
    pub fn save_clip(&self, caption_clip: &Path, destination_dir: &str) -> bool {
        match finalize(caption_clip, destination_dir) {
            Ok(moved) => {
                info!("Saved {} file(s) to {}", moved.len(), destination_dir);
                true
            }
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    /// Rewrite `caption_path` from tab-separated rows in `rows_path`
    pub fn save_table(&self, caption_path: &Path, rows_path: &Path) -> Result<Vec<ParseDiagnostic>> {
        let content = FileManager::read_to_string(rows_path)?;
        let rows: Vec<Vec<String>> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split('\t').map(str::to_string).collect())
            .collect();

        let (srt, diagnostics) = serialize_rows(&rows);
        FileManager::write_atomic(caption_path, srt.as_bytes())?;

        info!(
            "Saved {} row(s) to {:?}, skipped {}",
            rows.len() - diagnostics.len(),
            caption_path,
            diagnostics.len()
        );
        Ok(diagnostics)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} clips ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Cutting");
        progress_bar
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m {}s", total_secs / 60, total_secs % 60)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
