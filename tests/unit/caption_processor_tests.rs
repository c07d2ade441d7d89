/*!
 * Tests for caption parsing and serialization
 */

use anyhow::Result;
use srtclip::caption_processor::{
    parse_captions, record_from_row, rows_from_records, serialize_records, serialize_rows,
    CaptionDocument, CaptionRecord, SkipReason,
};
use srtclip::errors::CaptionError;
use crate::common;

/// Test parsing a well-formed document
#[test]
fn test_parse_captions_withValidDocument_shouldReturnRecordsInOrder() -> Result<()> {
    let parsed = parse_captions(common::TWO_CAPTIONS)?;

    assert!(parsed.diagnostics.is_empty());
    assert_eq!(
        parsed.records,
        vec![
            CaptionRecord::new(1, 1_000, 2_500, "Hello"),
            CaptionRecord::new(2, 3_000, 4_000, "World"),
        ]
    );
    Ok(())
}

/// Test that a short block is skipped and reported without failing the parse
#[test]
fn test_parse_captions_withShortBlock_shouldSkipAndContinue() -> Result<()> {
    let content = "5\n00:00:01,000 --> 00:00:02,000\nFirst\n\n\
                   6\n00:00:03,000 --> 00:00:04,000\n\n\
                   7\n00:00:05,000 --> 00:00:06,000\nThird\n";
    let parsed = parse_captions(content)?;

    assert_eq!(parsed.records.len(), 2);
    assert_eq!(parsed.records[0].index, 5);
    assert_eq!(parsed.records[1].index, 7);
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].position, 1);
    assert_eq!(parsed.diagnostics[0].reason, SkipReason::TooFewLines(2));
    Ok(())
}

/// Test that whitespace-only lines do not count towards a block's lines
#[test]
fn test_parse_captions_withWhitespaceLineBlock_shouldSkipAndContinue() -> Result<()> {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nA\n\n\
                   7\n   \nHello\n\n\
                   2\n00:00:03,000 --> 00:00:04,000\nB\n\n";
    let parsed = parse_captions(content)?;

    assert_eq!(
        parsed.records,
        vec![
            CaptionRecord::new(1, 1_000, 2_000, "A"),
            CaptionRecord::new(2, 3_000, 4_000, "B"),
        ]
    );
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].position, 1);
    assert_eq!(parsed.diagnostics[0].reason, SkipReason::TooFewLines(2));
    Ok(())
}

/// Test that an index written in non-ASCII digits is not an index
#[test]
fn test_parse_captions_withNonAsciiIndex_shouldSkipBlock() -> Result<()> {
    let content = "\u{661}\n00:00:01,000 --> 00:00:02,000\nFirst\n\n\
                   2\n00:00:03,000 --> 00:00:04,000\nSecond\n";
    let parsed = parse_captions(content)?;

    assert_eq!(parsed.records, vec![CaptionRecord::new(2, 3_000, 4_000, "Second")]);
    assert!(matches!(parsed.diagnostics[0].reason, SkipReason::MissingIndex(_)));
    Ok(())
}

/// Test that a block without a leading index is skipped
#[test]
fn test_parse_captions_withMissingIndex_shouldSkipBlock() -> Result<()> {
    let content = "one\n00:00:01,000 --> 00:00:02,000\nFirst\n\n\
                   12 extra\n00:00:03,000 --> 00:00:04,000\nSecond\n";
    let parsed = parse_captions(content)?;

    assert_eq!(parsed.records, vec![CaptionRecord::new(12, 3_000, 4_000, "Second")]);
    assert!(matches!(parsed.diagnostics[0].reason, SkipReason::MissingIndex(_)));
    Ok(())
}

/// Test that only the first text line of a block is kept
#[test]
fn test_parse_captions_withMultilineText_shouldKeepFirstLine() -> Result<()> {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nLine one\nLine two\n\n";
    let parsed = parse_captions(content)?;

    assert_eq!(parsed.records[0].text, "Line one");
    Ok(())
}

/// Test CRLF line endings and non-sequential indexes
#[test]
fn test_parse_captions_withCrlfAndGaps_shouldParse() -> Result<()> {
    let content = "10\r\n00:00:01,000 --> 00:00:02,000\r\nA\r\n\r\n3\r\n00:00:00,100 --> 00:00:00,200\r\nB\r\n";
    let parsed = parse_captions(content)?;

    let indexes: Vec<u64> = parsed.records.iter().map(|r| r.index).collect();
    assert_eq!(indexes, vec![10, 3]);
    assert_eq!(parsed.records[1].text, "B");
    Ok(())
}

/// Test that a bad time code aborts the parse
#[test]
fn test_parse_captions_withBadTimecode_shouldFail() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nOk\n\n2\n0:00:03 --> 00:00:04,000\nBad\n";
    assert!(matches!(parse_captions(content), Err(CaptionError::Format(_))));

    let no_arrow = "1\n00:00:01,000 - 00:00:02,000\nBad\n";
    assert!(matches!(parse_captions(no_arrow), Err(CaptionError::Format(_))));
}

/// Test serialization layout
#[test]
fn test_serialize_records_withRecords_shouldUseBlockLayout() {
    let records = vec![
        CaptionRecord::new(1, 500, 2_000, "Hello"),
        CaptionRecord::new(42, 61_234, 65_432, "World"),
    ];
    let text = serialize_records(&records);
    assert_eq!(
        text,
        "1\n00:00:00,500 --> 00:00:02,000\nHello\n\n42\n00:01:01,234 --> 00:01:05,432\nWorld\n\n"
    );
    assert_eq!(parse_captions(&text).unwrap().records, records);
}

/// Test edit round trip through table rows
#[test]
fn test_serialize_rows_withInvalidRow_shouldSkipOnlyThatRow() {
    let mut rows = rows_from_records(&[
        CaptionRecord::new(1, 1_000, 2_000, "Keep me"),
        CaptionRecord::new(2, 3_000, 4_000, "Me too"),
    ]);
    rows[1][3] = "Edited".to_string();
    rows.insert(1, vec!["9".to_string(), "00:00:05,000".to_string()]);

    let (text, diagnostics) = serialize_rows(&rows);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].position, 1);
    assert_eq!(diagnostics[0].reason, SkipReason::WrongFieldCount(2));
    assert!(matches!(diagnostics[0].to_error(), CaptionError::MalformedRecord(_)));

    let records = parse_captions(&text).unwrap().records;
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].text, "Edited");
}

/// Test building a record from a selected row
#[test]
fn test_record_from_row_withFourFields_shouldParseTimes() -> Result<()> {
    let row: Vec<String> = ["7", "00:00:01,250", "00:00:03,000", "Hi"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(record_from_row(&row)?, CaptionRecord::new(7, 1_250, 3_000, "Hi"));

    assert!(matches!(
        record_from_row(&row[..3]),
        Err(CaptionError::MalformedRecord(_))
    ));
    Ok(())
}

/// Test document base name and lookup
#[test]
fn test_caption_document_withSourcePath_shouldExposeStem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "lesson1.srt", common::TWO_CAPTIONS)?;

    let document = CaptionDocument::from_file(&path)?;
    assert_eq!(document.base_name(), "lesson1");
    assert_eq!(document.find(2).map(|r| r.text.as_str()), Some("World"));
    assert!(document.find(3).is_none());
    assert_eq!(document.to_srt_string(), common::TWO_CAPTIONS);
    Ok(())
}

/// Test the document summary counts kept and skipped blocks
#[test]
fn test_caption_document_display_withSkippedBlock_shouldSummarize() -> Result<()> {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nA\n\nbroken\n\n";
    let document = CaptionDocument::from_content("lesson1.srt", content)?;

    let summary = document.to_string();
    assert!(summary.contains("lesson1.srt"));
    assert!(summary.contains("Records: 1"));
    assert!(summary.contains("Skipped: 1"));
    Ok(())
}
