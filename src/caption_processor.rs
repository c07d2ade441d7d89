use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::CaptionError;
use crate::file_utils::FileManager;
use crate::timecode::{format_timecode, parse_timecode};

// @module: Caption document parsing and serialization

// @const: Leading integer run of an index line
static INDEX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+").expect("index regex is valid"));

/// Separator between the start and end time codes of a caption
pub const TIME_SEPARATOR: &str = " --> ";

/// Number of fields in an editable caption table row
pub const ROW_FIELDS: usize = 4;

// @struct: Single caption entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionRecord {
    // @field: Author-assigned index, not necessarily contiguous
    pub index: u64,

    // @field: Start offset in ms
    pub start_ms: u64,

    // @field: End offset in ms
    pub end_ms: u64,

    // @field: First text line of the caption
    pub text: String,
}

impl CaptionRecord {
    pub fn new(index: u64, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        CaptionRecord {
            index,
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    /// Time range line, e.g. `00:00:01,000 --> 00:00:02,500`
    pub fn time_line(&self) -> String {
        format!(
            "{}{}{}",
            format_timecode(self.start_ms),
            TIME_SEPARATOR,
            format_timecode(self.end_ms)
        )
    }
}

impl fmt::Display for CaptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{}", self.time_line())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Why a block or row was left out of the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Block had fewer than three lines
    TooFewLines(usize),
    /// Index line did not start with a number
    MissingIndex(String),
    /// Table row did not have exactly four fields
    WrongFieldCount(usize),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::TooFewLines(n) => write!(f, "expected at least 3 lines, found {}", n),
            SkipReason::MissingIndex(line) => write!(f, "no leading index in '{}'", line),
            SkipReason::WrongFieldCount(n) => {
                write!(f, "expected {} fields, found {}", ROW_FIELDS, n)
            }
        }
    }
}

/// A skipped caption block or table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// Zero-based position of the block or row in its input
    pub position: usize,
    pub reason: SkipReason,
}

impl ParseDiagnostic {
    fn new(position: usize, reason: SkipReason) -> Self {
        let diagnostic = ParseDiagnostic { position, reason };
        warn!("Skipping caption entry {}: {}", position + 1, diagnostic.reason);
        diagnostic
    }

    pub fn to_error(&self) -> CaptionError {
        CaptionError::MalformedRecord(format!("entry {}: {}", self.position + 1, self.reason))
    }
}

/// Parsed caption records plus the blocks that were skipped on the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCaptions {
    pub records: Vec<CaptionRecord>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Parse caption text into records in file order.
///
/// Blocks are separated by a blank line. Whitespace-only lines inside a block
/// are ignored. A block with fewer than three remaining lines, or whose first
/// line has no leading number, is skipped with a diagnostic.
/// Only the first text line of a block is kept. A malformed time code aborts
/// the whole parse.
pub fn parse_captions(content: &str) -> Result<ParsedCaptions, CaptionError> {
    let normalized = content.replace("\r\n", "\n");
    let mut parsed = ParsedCaptions::default();

    let blocks = normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty());

    for (position, block) in blocks.enumerate() {
        let lines: Vec<&str> = block
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .collect();
        if lines.len() < 3 {
            parsed
                .diagnostics
                .push(ParseDiagnostic::new(position, SkipReason::TooFewLines(lines.len())));
            continue;
        }

        let index = match INDEX_REGEX
            .find(lines[0])
            .and_then(|m| m.as_str().parse::<u64>().ok())
        {
            Some(index) => index,
            None => {
                parsed.diagnostics.push(ParseDiagnostic::new(
                    position,
                    SkipReason::MissingIndex(lines[0].to_string()),
                ));
                continue;
            }
        };

        let (start_ms, end_ms) = parse_time_line(lines[1])?;

        parsed.records.push(CaptionRecord {
            index,
            start_ms,
            end_ms,
            text: lines[2].to_string(),
        });
    }

    Ok(parsed)
}

/// Parse a `start --> end` line
pub fn parse_time_line(line: &str) -> Result<(u64, u64), CaptionError> {
    let parts: Vec<&str> = line.split(TIME_SEPARATOR).collect();
    if parts.len() != 2 {
        return Err(CaptionError::Format(line.to_string()));
    }
    Ok((parse_timecode(parts[0])?, parse_timecode(parts[1])?))
}

/// Serialize records back to caption text, one block per record
pub fn serialize_records(records: &[CaptionRecord]) -> String {
    records.iter().map(|record| record.to_string()).collect()
}

/// Convert records into editable table rows `[index, start, end, text]`
pub fn rows_from_records(records: &[CaptionRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.index.to_string(),
                format_timecode(r.start_ms),
                format_timecode(r.end_ms),
                r.text.clone(),
            ]
        })
        .collect()
}

/// Serialize edited table rows back to caption text.
///
/// Fields are written as given. Rows without exactly four fields are skipped
/// and reported; the rest are still written.
pub fn serialize_rows(rows: &[Vec<String>]) -> (String, Vec<ParseDiagnostic>) {
    let mut out = String::new();
    let mut diagnostics = Vec::new();

    for (position, row) in rows.iter().enumerate() {
        if row.len() != ROW_FIELDS {
            diagnostics.push(ParseDiagnostic::new(position, SkipReason::WrongFieldCount(row.len())));
            continue;
        }
        out.push_str(&format!(
            "{}\n{}{}{}\n{}\n\n",
            row[0], row[1], TIME_SEPARATOR, row[2], row[3]
        ));
    }

    (out, diagnostics)
}

/// Build a record from the four fields of a selected table row
pub fn record_from_row(row: &[String]) -> Result<CaptionRecord, CaptionError> {
    if row.len() != ROW_FIELDS {
        return Err(CaptionError::MalformedRecord(SkipReason::WrongFieldCount(row.len()).to_string()));
    }

    let index = INDEX_REGEX
        .find(row[0].trim())
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .ok_or_else(|| CaptionError::MalformedRecord(SkipReason::MissingIndex(row[0].clone()).to_string()))?;

    Ok(CaptionRecord {
        index,
        start_ms: parse_timecode(&row[1])?,
        end_ms: parse_timecode(&row[2])?,
        text: row[3].clone(),
    })
}

/// Caption records loaded from a file
#[derive(Debug, Clone)]
pub struct CaptionDocument {
    /// Source caption file
    pub source_file: PathBuf,

    /// Records in file order
    pub records: Vec<CaptionRecord>,

    /// Blocks skipped while parsing
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl CaptionDocument {
    /// Build a document from caption text associated with `source_file`
    pub fn from_content<P: AsRef<Path>>(source_file: P, content: &str) -> Result<Self, CaptionError> {
        let parsed = parse_captions(content)?;
        Ok(CaptionDocument {
            source_file: source_file.as_ref().to_path_buf(),
            records: parsed.records,
            diagnostics: parsed.diagnostics,
        })
    }

    /// Read and parse a caption file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        Self::from_content(path, &content)
            .with_context(|| format!("Failed to parse caption file: {:?}", path))
    }

    /// File stem used to name clips cut from this document
    pub fn base_name(&self) -> String {
        self.source_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Find the first record with the given index
    pub fn find(&self, index: u64) -> Option<&CaptionRecord> {
        self.records.iter().find(|r| r.index == index)
    }

    /// Serialize all records
    pub fn to_srt_string(&self) -> String {
        serialize_records(&self.records)
    }
}

impl fmt::Display for CaptionDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Caption Document")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Records: {}", self.records.len())?;
        writeln!(f, "Skipped: {}", self.diagnostics.len())?;
        Ok(())
    }
}
