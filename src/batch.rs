/*!
 * Batch clip extraction.
 *
 * Cuts one padded clip per caption record of a document and writes it next to
 * a single-entry caption file. Records are processed strictly in document
 * order; a record that cannot be cut is reported and the rest continue.
 */

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, error};

use crate::audio::{AudioAsset, CLIP_AUDIO_EXTENSION};
use crate::caption_processor::{serialize_records, CaptionDocument, CaptionRecord};
use crate::file_utils::FileManager;
use crate::segmenter::extract_clip;

/// Extension of clip caption files
pub const CLIP_CAPTION_EXTENSION: &str = "srt";

/// Default zero-padding width of the record index in batch file names
pub const DEFAULT_INDEX_WIDTH: usize = 3;

/// Per-run settings for a batch
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub silence_ms: u64,
    pub index_width: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            silence_ms: crate::segmenter::DEFAULT_SILENCE_MS,
            index_width: DEFAULT_INDEX_WIDTH,
        }
    }
}

/// Audio and caption files written for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipPair {
    pub index: u64,
    pub audio_path: PathBuf,
    pub caption_path: PathBuf,
}

/// A record that could not be cut
#[derive(Debug, Clone)]
pub struct RecordFailure {
    pub index: u64,
    pub message: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub written: Vec<ClipPair>,
    pub failures: Vec<RecordFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Cut every record of `document` out of `audio` into `output_dir`.
///
/// Files are named `{stem}_{index:0width}.wav` / `.srt` after the caption
/// file's stem and each record's own index; existing files are overwritten.
/// `on_progress` is called with `(done, total)` after every record.
pub fn run_batch<F>(
    document: &CaptionDocument,
    audio: &AudioAsset,
    output_dir: &Path,
    options: BatchOptions,
    mut on_progress: F,
) -> Result<BatchReport>
where
    F: FnMut(usize, usize),
{
    FileManager::ensure_dir(output_dir)?;

    let base_name = document.base_name();
    let total = document.records.len();
    let mut report = BatchReport::default();

    for (done, record) in document.records.iter().enumerate() {
        match write_record_clip(record, audio, output_dir, &base_name, options) {
            Ok(pair) => {
                debug!(
                    "Generated {:?} and {:?}",
                    pair.audio_path.file_name().unwrap_or_default(),
                    pair.caption_path.file_name().unwrap_or_default()
                );
                report.written.push(pair);
            }
            Err(e) => {
                error!("Caption {} skipped: {:#}", record.index, e);
                report.failures.push(RecordFailure {
                    index: record.index,
                    message: format!("{:#}", e),
                });
            }
        }
        on_progress(done + 1, total);
    }

    Ok(report)
}

fn write_record_clip(
    record: &CaptionRecord,
    audio: &AudioAsset,
    output_dir: &Path,
    base_name: &str,
    options: BatchOptions,
) -> Result<ClipPair> {
    let clip = extract_clip(audio, record, options.silence_ms)?;

    let audio_path = FileManager::clip_path(
        output_dir,
        base_name,
        record.index,
        options.index_width,
        CLIP_AUDIO_EXTENSION,
    );
    let caption_path = FileManager::clip_path(
        output_dir,
        base_name,
        record.index,
        options.index_width,
        CLIP_CAPTION_EXTENSION,
    );

    // Encode before touching the disk so a failed clip writes nothing
    let wav = clip.audio.to_wav_bytes()?;
    let caption = serialize_records(std::slice::from_ref(&clip.caption));

    FileManager::write_atomic(&audio_path, &wav)?;
    FileManager::write_atomic(&caption_path, caption.as_bytes())?;

    Ok(ClipPair {
        index: record.index,
        audio_path,
        caption_path,
    })
}
