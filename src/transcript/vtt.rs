//! WebVTT caption parsing
//!
//! Produces the ordered cue list consumed by the chunk splitter. Only the parts
//! of the format a meeting transcript uses are interpreted: the header, cue
//! timings and payload text. Cue identifiers are accepted and discarded, NOTE,
//! STYLE and REGION blocks are skipped and cue settings after the end timestamp
//! are ignored.

use thiserror::Error;

/// Errors produced while parsing a WebVTT file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VttError {
    #[error("file does not start with a WEBVTT header")]
    MissingHeader,

    #[error("cue starting at line {line} has no timing line")]
    MissingTiming { line: usize },

    #[error("invalid timestamp '{value}' at line {line}")]
    InvalidTimestamp { line: usize, value: String },
}

/// A single timed caption entry
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
    /// Payload text with markup tags removed, lines joined with '\n'
    pub text: String,
}

impl Cue {
    pub fn new(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            text: text.into(),
        }
    }
}

/// Parse WebVTT content into cues, in file order.
pub fn parse(content: &str) -> Result<Vec<Cue>, VttError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lines: Vec<&str> = content.lines().collect();

    let header = lines.first().copied().unwrap_or_default();
    if !is_header(header) {
        return Err(VttError::MissingHeader);
    }

    let mut cues = Vec::new();
    let mut index = 0;

    // The header block runs until the first blank line.
    while index < lines.len() && !lines[index].trim().is_empty() {
        index += 1;
    }

    loop {
        while index < lines.len() && lines[index].trim().is_empty() {
            index += 1;
        }
        if index >= lines.len() {
            break;
        }

        let start = index;
        while index < lines.len() && !lines[index].trim().is_empty() {
            index += 1;
        }

        if let Some(cue) = parse_block(&lines[start..index], start + 1)? {
            cues.push(cue);
        }
    }

    tracing::debug!("Parsed {} cues", cues.len());
    Ok(cues)
}

fn is_header(line: &str) -> bool {
    match line.strip_prefix("WEBVTT") {
        Some(rest) => rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t'),
        None => false,
    }
}

fn is_skipped_block(first_line: &str) -> bool {
    ["NOTE", "STYLE", "REGION"].iter().any(|keyword| {
        first_line
            .strip_prefix(keyword)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
    })
}

/// Parse one blank-line separated block. `line_no` is the 1-based line number
/// of the block's first line.
fn parse_block(block: &[&str], line_no: usize) -> Result<Option<Cue>, VttError> {
    let Some(first) = block.first() else {
        return Ok(None);
    };
    if is_skipped_block(first) {
        return Ok(None);
    }

    let timing_offset = if first.contains("-->") {
        0
    } else {
        match block.get(1) {
            Some(line) if line.contains("-->") => 1,
            _ => return Err(VttError::MissingTiming { line: line_no }),
        }
    };

    let timing_line_no = line_no + timing_offset;
    let (start_time, end_time) = parse_timing(block[timing_offset], timing_line_no)?;

    let payload = block[timing_offset + 1..].join("\n");

    Ok(Some(Cue::new(start_time, end_time, strip_tags(&payload))))
}

fn parse_timing(line: &str, line_no: usize) -> Result<(f64, f64), VttError> {
    let (start, rest) = line
        .split_once("-->")
        .ok_or(VttError::MissingTiming { line: line_no })?;
    let end = rest.split_whitespace().next().unwrap_or_default();

    Ok((
        parse_timestamp(start.trim(), line_no)?,
        parse_timestamp(end, line_no)?,
    ))
}

/// Parse `[hh:]mm:ss.ttt` into seconds.
fn parse_timestamp(value: &str, line_no: usize) -> Result<f64, VttError> {
    let invalid = || VttError::InvalidTimestamp {
        line: line_no,
        value: value.to_string(),
    };

    let parts: Vec<&str> = value.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => ("0", *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(invalid()),
    };

    let (whole, fraction) = seconds.split_once(['.', ',']).ok_or_else(invalid)?;

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if ![hours, minutes, whole, fraction].into_iter().all(all_digits) {
        return Err(invalid());
    }

    let hours: u64 = hours.parse().map_err(|_| invalid())?;
    let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
    let whole: u64 = whole.parse().map_err(|_| invalid())?;
    if minutes >= 60 || whole >= 60 {
        return Err(invalid());
    }

    let millis: f64 = format!("0.{fraction}").parse().map_err(|_| invalid())?;

    let seconds = hours
        .checked_mul(3600)
        .and_then(|s| s.checked_add(minutes * 60 + whole))
        .ok_or_else(invalid)?;

    Ok(seconds as f64 + millis)
}

fn strip_tags(payload: &str) -> String {
    let mut text = String::with_capacity(payload.len());
    let mut in_tag = false;

    for c in payload.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    text
}
