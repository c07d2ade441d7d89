use crate::audio::AudioAsset;
use crate::caption_processor::CaptionRecord;
use crate::errors::ClipError;

// @module: Cutting one caption's audio and re-timing its caption

/// Silence added before and after every clip when nothing else is configured
pub const DEFAULT_SILENCE_MS: u64 = 500;

/// A padded clip and the caption that matches it
#[derive(Debug, Clone)]
pub struct ClipResult {
    pub audio: AudioAsset,

    /// Clip-local caption, always index 1
    pub caption: CaptionRecord,
}

/// Cut `record`'s interval out of `audio`, pad both ends with `silence_ms` of
/// silence and re-time the caption to the padded clip.
///
/// The padded clip lasts `(end_ms - start_ms) + 2 * silence_ms`; its caption
/// starts at `silence_ms` and ends `silence_ms` before the clip does.
pub fn extract_clip(
    audio: &AudioAsset,
    record: &CaptionRecord,
    silence_ms: u64,
) -> Result<ClipResult, ClipError> {
    let slice = audio.slice(record.start_ms, record.end_ms)?;
    let silence = AudioAsset::silent(silence_ms, audio.sample_rate(), audio.channels());

    let padded = silence.clone().concat(&slice)?.concat(&silence)?;
    let padded_ms = padded.duration_ms();

    let caption = CaptionRecord {
        index: 1,
        start_ms: silence_ms,
        end_ms: padded_ms - silence_ms,
        text: record.text.clone(),
    };

    Ok(ClipResult {
        audio: padded,
        caption,
    })
}
