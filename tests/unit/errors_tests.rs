/*!
 * Tests for error types
 */

use std::path::PathBuf;
use srtclip::errors::{AppError, CaptionError, ClipError, SaveError};

/// Test error messages carry their details
#[test]
fn test_error_display_withDetails_shouldIncludeThem() {
    let err = ClipError::OutOfRange { start_ms: 10, end_ms: 20, duration_ms: 15 };
    assert_eq!(err.to_string(), "Range 10..20 ms is outside the audio (duration 15 ms)");

    let err = CaptionError::Format("0:1".to_string());
    assert_eq!(err.to_string(), "Invalid time format: 0:1");

    let err = SaveError::MoveFailed { path: PathBuf::from("a.wav"), reason: "gone".to_string() };
    assert!(err.to_string().contains("a.wav"));
}

/// Test conversion into the application error
#[test]
fn test_app_error_from_withSubErrors_shouldWrap() {
    let app: AppError = CaptionError::MalformedRecord("x".to_string()).into();
    assert!(matches!(app, AppError::Caption(_)));

    let app: AppError = SaveError::DestinationInvalid(String::new()).into();
    assert!(matches!(app, AppError::Save(_)));

    let app: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "nope").into();
    assert!(matches!(app, AppError::File(_)));

    let app: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(app, AppError::Unknown(_)));
}

/// Test classifying errors that reached the command line through context layers
#[test]
fn test_app_error_from_withContextWrappedErrors_shouldClassifyAndPickExitCode() {
    use anyhow::Context;

    let clip: anyhow::Result<()> = Err(ClipError::OutOfRange { start_ms: 0, end_ms: 9, duration_ms: 5 }.into());
    let app = AppError::from(clip.context("Failed to cut caption 3").unwrap_err());
    assert!(matches!(app, AppError::Clip(ClipError::OutOfRange { .. })));
    assert_eq!(app.exit_code(), 3);

    let caption: anyhow::Result<()> = Err(CaptionError::Format("x".to_string()).into());
    let app = AppError::from(caption.context("Failed to parse").unwrap_err());
    assert!(matches!(app, AppError::Caption(_)));
    assert_eq!(app.exit_code(), 2);

    let io: anyhow::Result<()> = Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into());
    let app = AppError::from(io.context("Failed to read file").unwrap_err());
    assert!(matches!(app, AppError::File(_)));
    assert_eq!(app.exit_code(), 5);

    let app = AppError::from(anyhow::anyhow!("No clips could be cut"));
    assert_eq!(app.exit_code(), 1);
}
