/*!
 * Error types for the srtclip application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading caption text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptionError {
    /// A time code does not match `HH:MM:SS,mmm`
    #[error("Invalid time format: {0}")]
    Format(String),

    /// A caption block or table row lacks its required lines/fields
    #[error("Malformed caption record: {0}")]
    MalformedRecord(String),
}

/// Errors that can occur while cutting or encoding a clip
#[derive(Error, Debug)]
pub enum ClipError {
    /// The requested interval is empty or extends past the end of the audio
    #[error("Range {start_ms}..{end_ms} ms is outside the audio (duration {duration_ms} ms)")]
    OutOfRange {
        /// Requested start offset
        start_ms: u64,
        /// Requested end offset
        end_ms: u64,
        /// Duration of the audio being sliced
        duration_ms: u64,
    },

    /// The source audio could not be decoded
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// The clip could not be encoded as WAV
    #[error("Failed to encode audio: {0}")]
    Encode(String),

    /// Two assets with different sample layouts were joined
    #[error("Incompatible audio layout: {0}")]
    Layout(String),

    /// IO error while reading or writing audio
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<symphonia::core::errors::Error> for ClipError {
    fn from(error: symphonia::core::errors::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

impl From<hound::Error> for ClipError {
    fn from(error: hound::Error) -> Self {
        Self::Encode(error.to_string())
    }
}

/// Errors reported when finalizing an interactive clip. These are shown to the
/// user as warnings and never abort the session.
#[derive(Error, Debug)]
pub enum SaveError {
    /// The destination is empty or not an existing directory
    #[error("Please enter a valid destination directory: '{0}'")]
    DestinationInvalid(String),

    /// Moving a file into the destination failed
    #[error("Failed to move {path:?}: {reason}")]
    MoveFailed {
        /// File that could not be moved
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from caption parsing
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Error from clip extraction
    #[error("Clip error: {0}")]
    Clip(#[from] ClipError),

    /// Error from saving a clip
    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit code reported by the command line for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Unknown(_) => 1,
            AppError::Caption(_) => 2,
            AppError::Clip(_) => 3,
            AppError::Save(_) => 4,
            AppError::File(_) => 5,
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    /// Classify by the first typed error found in the chain, context included
    fn from(error: anyhow::Error) -> Self {
        let error = match error.downcast::<CaptionError>() {
            Ok(e) => return Self::Caption(e),
            Err(error) => error,
        };
        let error = match error.downcast::<ClipError>() {
            Ok(e) => return Self::Clip(e),
            Err(error) => error,
        };
        let error = match error.downcast::<SaveError>() {
            Ok(e) => return Self::Save(e),
            Err(error) => error,
        };
        match error.downcast::<std::io::Error>() {
            Ok(e) => Self::File(e.to_string()),
            Err(error) => Self::Unknown(format!("{:#}", error)),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
