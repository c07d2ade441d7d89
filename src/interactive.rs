/*!
 * Single-caption extraction.
 *
 * A caller picks one caption record, gets a clip and caption written next to
 * the source audio for preview, and later moves that pair into a directory of
 * its choosing with [`finalize`].
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::audio::{AudioAsset, CLIP_AUDIO_EXTENSION};
use crate::batch::CLIP_CAPTION_EXTENSION;
use crate::caption_processor::{serialize_records, CaptionRecord};
use crate::errors::SaveError;
use crate::file_utils::FileManager;
use crate::segmenter::{extract_clip, DEFAULT_SILENCE_MS};

/// Settings for one interactive extraction
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub silence_ms: u64,

    /// Zero-pad the index in file names like batch mode does. `None` keeps
    /// the plain index (`clip_7.wav`).
    pub index_width: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            silence_ms: DEFAULT_SILENCE_MS,
            index_width: None,
        }
    }
}

/// Preview files written by [`extract_one`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipPaths {
    pub audio_path: PathBuf,
    pub caption_path: PathBuf,
}

/// Cut `record` out of the audio at `audio_path` and write the pair into the
/// audio file's own directory as `{audio_stem}_{index}.wav` / `.srt`.
///
/// The audio is decoded on every call.
pub fn extract_one<P: AsRef<Path>>(
    audio_path: P,
    record: &CaptionRecord,
    options: ExtractOptions,
) -> Result<ClipPaths> {
    let audio_path = audio_path.as_ref();
    let audio = AudioAsset::decode_file(audio_path)
        .with_context(|| format!("Failed to load audio: {:?}", audio_path))?;

    let clip = extract_clip(&audio, record, options.silence_ms)
        .with_context(|| format!("Failed to cut caption {}", record.index))?;

    let scratch_dir = match audio_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let stem = audio_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let width = options.index_width.unwrap_or(0);
    let audio_out = FileManager::clip_path(scratch_dir, &stem, record.index, width, CLIP_AUDIO_EXTENSION);
    let caption_out = audio_out.with_extension(CLIP_CAPTION_EXTENSION);

    FileManager::write_atomic(&audio_out, &clip.audio.to_wav_bytes()?)?;
    FileManager::write_atomic(
        &caption_out,
        serialize_records(std::slice::from_ref(&clip.caption)).as_bytes(),
    )?;

    Ok(ClipPaths {
        audio_path: audio_out,
        caption_path: caption_out,
    })
}

/// Move a previewed clip pair into `destination_dir`.
///
/// The audio file is found by swapping the caption's extension for `.wav`.
/// An empty or missing destination leaves every file untouched. Both files
/// must exist and neither name may already be taken in the destination,
/// otherwise nothing is moved. If the caption move still fails after the
/// audio was moved, the audio is moved back. Returns the new paths, audio first.
pub fn finalize<P: AsRef<Path>>(caption_path: P, destination_dir: &str) -> Result<Vec<PathBuf>, SaveError> {
    let caption_path = caption_path.as_ref();

    if destination_dir.trim().is_empty() || !FileManager::dir_exists(destination_dir) {
        warn!("Please enter a valid destination directory: '{}'", destination_dir);
        return Err(SaveError::DestinationInvalid(destination_dir.to_string()));
    }

    let audio_path = caption_path.with_extension(CLIP_AUDIO_EXTENSION);
    let pair = [audio_path.as_path(), caption_path];

    for path in pair {
        check_movable(path, destination_dir)?;
    }

    let mut moved = Vec::with_capacity(2);
    for path in pair {
        match FileManager::move_into_dir(path, destination_dir) {
            Ok(to) => {
                info!("Saved {:?}", to.file_name().unwrap_or_default());
                moved.push(to);
            }
            Err(e) => {
                warn!("Error while saving file {:?}: {:#}", path, e);
                restore(&moved, path);
                return Err(move_failed(path, format!("{:#}", e)));
            }
        }
    }

    Ok(moved)
}

fn check_movable(path: &Path, destination_dir: &str) -> Result<(), SaveError> {
    if !FileManager::file_exists(path) {
        warn!("Error while saving file: {:?} does not exist", path);
        return Err(move_failed(path, "source file does not exist".to_string()));
    }
    let target = FileManager::target_in_dir(path, destination_dir)
        .map_err(|e| move_failed(path, format!("{:#}", e)))?;
    if target.exists() {
        warn!("Error while saving file: {:?} already exists", target);
        return Err(move_failed(path, format!("{:?} already exists", target)));
    }
    Ok(())
}

// Put already moved files back next to `failed` so the pair stays together
fn restore(moved: &[PathBuf], failed: &Path) {
    let origin = match failed.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    for path in moved {
        match FileManager::move_into_dir(path, origin) {
            Ok(back) => warn!("Moved {:?} back to {:?}", path.file_name().unwrap_or_default(), back),
            Err(e) => warn!("Could not move {:?} back: {:#}", path, e),
        }
    }
}

fn move_failed(path: &Path, reason: String) -> SaveError {
    SaveError::MoveFailed {
        path: path.to_path_buf(),
        reason,
    }
}
