/*!
 * # srtclip - caption-driven audio clipping
 *
 * Cuts a full-length recording into one short clip per caption of a
 * companion SRT file, pads each clip with silence and writes a caption file
 * re-timed to the clip.
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: `HH:MM:SS,mmm` parsing and formatting
 * - `caption_processor`: caption parsing, serialization and editable table rows
 * - `audio`: decoded audio buffers, silence, slicing and WAV encoding
 * - `segmenter`: cutting and padding a single caption's clip
 * - `batch`: one clip pair per caption of a document
 * - `interactive`: one selected caption at a time, then moving it into place
 * - `file_utils`: File system operations
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod audio;
pub mod batch;
pub mod caption_processor;
pub mod errors;
pub mod file_utils;
pub mod interactive;
pub mod segmenter;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::Config;
pub use audio::AudioAsset;
pub use batch::{run_batch, BatchOptions, BatchReport};
pub use caption_processor::{parse_captions, serialize_records, CaptionDocument, CaptionRecord};
pub use errors::{AppError, CaptionError, ClipError, SaveError};
pub use interactive::{extract_one, finalize};
pub use segmenter::{extract_clip, ClipResult, DEFAULT_SILENCE_MS};
pub use timecode::{format_timecode, parse_timecode};
