//! Unified diff model and parser
//!
//! Turns the text of one file's unified diff into a `FileDiff`. The parser is
//! a two-state machine: the preamble (paths and git metadata) and the hunk
//! body.

use log::{debug, warn};
use serde::Serialize;
use std::collections::TryReserveError;
use thiserror::Error;

/// Longest body line kept, in characters. Longer lines are cut.
pub const MAX_LINE_LEN: usize = 1024;

/// Longest hunk header kept, in characters
pub const MAX_HEADER_LEN: usize = 255;

const TAB_STOP: usize = 4;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("diff text is empty")]
    Empty,
    #[error("no hunk markers found")]
    NoHunks,
    /// Growing the hunk or line list failed. Row pairing reports the same
    /// condition as `io::ErrorKind::OutOfMemory` from the renderer; smaller
    /// per-line string allocations are not covered.
    #[error("out of memory while parsing diff: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Context,
    Added,
    Removed,
    /// A removed and an added line shown on the same row
    Modified,
    Header,
    HunkMarker,
    Binary,
    Empty,
}

/// A single line in a hunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub kind: LineKind,
    pub left_line_no: Option<u32>,
    pub right_line_no: Option<u32>,
    pub left_text: String,
    pub right_text: String,
}

/// A hunk of changes within a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hunk {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    /// The `@@ ... @@` line, sanitized and bounded to `MAX_HEADER_LEN`
    pub header: String,
    pub lines: Vec<Line>,
}

/// One file's diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileDiff {
    pub old_path: String,
    pub new_path: String,
    pub is_new: bool,
    pub is_deleted: bool,
    pub is_binary: bool,
    pub is_renamed: bool,
    pub hunks: Vec<Hunk>,
    pub additions: usize,
    pub deletions: usize,
}

impl FileDiff {
    /// Path to show for this file
    pub fn display_path(&self) -> &str {
        if self.new_path.is_empty() || self.is_deleted {
            &self.old_path
        } else {
            &self.new_path
        }
    }

    /// Whether the header should show `old → new`
    pub fn shows_rename(&self) -> bool {
        if self.is_new || self.is_deleted {
            return false;
        }
        self.is_renamed || self.old_path != self.new_path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Preamble,
    InHunk,
}

/// Parse the unified diff for a single file.
///
/// Returns `ParseError::Empty` for blank input and `ParseError::NoHunks` when
/// no `@@` line is present; callers fall back to other output in both cases.
pub fn parse_unified_diff(text: &str) -> Result<FileDiff, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut diff = FileDiff::default();
    let mut state = State::Preamble;
    let mut left_no = 0u32;
    let mut right_no = 0u32;

    for line in text.lines() {
        if line.starts_with("@@") {
            let hunk = parse_hunk_header(line);
            left_no = hunk.old_start;
            right_no = hunk.new_start;
            diff.hunks.try_reserve(1)?;
            diff.hunks.push(hunk);
            state = State::InHunk;
            continue;
        }

        match state {
            State::Preamble => parse_preamble_line(line, &mut diff),
            State::InHunk => {
                if line.starts_with("diff --git") {
                    warn!("multiple files in one diff; paths will be overwritten");
                    state = State::Preamble;
                    parse_preamble_line(line, &mut diff);
                    continue;
                }

                let Some(parsed) = parse_body_line(line, &mut left_no, &mut right_no) else {
                    continue;
                };
                match parsed.kind {
                    LineKind::Added => diff.additions += 1,
                    LineKind::Removed => diff.deletions += 1,
                    _ => {}
                }
                if let Some(hunk) = diff.hunks.last_mut() {
                    hunk.lines.try_reserve(1)?;
                    hunk.lines.push(parsed);
                }
            }
        }
    }

    if diff.hunks.is_empty() {
        return Err(ParseError::NoHunks);
    }

    debug!(
        "parsed {}: {} hunks, +{} -{}",
        diff.display_path(),
        diff.hunks.len(),
        diff.additions,
        diff.deletions
    );

    Ok(diff)
}

fn parse_preamble_line(line: &str, diff: &mut FileDiff) {
    if line.starts_with("diff --git") || line.starts_with("index ") {
        return;
    }

    if let Some(rest) = line.strip_prefix("---") {
        let path = header_path(rest, "a/");
        if path == "/dev/null" {
            diff.is_new = true;
        }
        diff.old_path = sanitize_line(path);
    } else if let Some(rest) = line.strip_prefix("+++") {
        let path = header_path(rest, "b/");
        if path == "/dev/null" {
            diff.is_deleted = true;
        }
        diff.new_path = sanitize_line(path);
    } else if line.starts_with("new file") {
        diff.is_new = true;
    } else if line.starts_with("deleted file") {
        diff.is_deleted = true;
    } else if let Some(from) = line.strip_prefix("rename from ") {
        diff.is_renamed = true;
        diff.old_path = sanitize_line(from);
    } else if let Some(to) = line.strip_prefix("rename to ") {
        diff.is_renamed = true;
        diff.new_path = sanitize_line(to);
    } else if line.starts_with("similarity index") {
        diff.is_renamed = true;
    } else if line.starts_with("Binary files") || line.starts_with("GIT binary patch") {
        diff.is_binary = true;
    }
}

/// Path from a `---`/`+++` line, minus its `a/` or `b/` prefix and any
/// tab-separated timestamp
fn header_path<'a>(rest: &'a str, prefix: &str) -> &'a str {
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    let rest = rest.split('\t').next().unwrap_or(rest);
    rest.strip_prefix(prefix).unwrap_or(rest)
}

fn parse_body_line(line: &str, left_no: &mut u32, right_no: &mut u32) -> Option<Line> {
    let mut chars = line.chars();
    let prefix = chars.next()?;
    let text = sanitize_line(chars.as_str());

    let parsed = match prefix {
        '-' => {
            let no = *left_no;
            *left_no = left_no.saturating_add(1);
            Line {
                kind: LineKind::Removed,
                left_line_no: Some(no),
                right_line_no: None,
                left_text: text,
                right_text: String::new(),
            }
        }
        '+' => {
            let no = *right_no;
            *right_no = right_no.saturating_add(1);
            Line {
                kind: LineKind::Added,
                left_line_no: None,
                right_line_no: Some(no),
                left_text: String::new(),
                right_text: text,
            }
        }
        ' ' => {
            let (old_no, new_no) = (*left_no, *right_no);
            *left_no = left_no.saturating_add(1);
            *right_no = right_no.saturating_add(1);
            Line {
                kind: LineKind::Context,
                left_line_no: Some(old_no),
                right_line_no: Some(new_no),
                left_text: text.clone(),
                right_text: text,
            }
        }
        // "\ No newline at end of file"
        '\\' => Line {
            kind: LineKind::Context,
            left_line_no: None,
            right_line_no: None,
            left_text: text.clone(),
            right_text: text,
        },
        _ => return None,
    };

    Some(parsed)
}

/// Parse `@@ -old_start[,old_count] +new_start[,new_count] @@ ...`.
///
/// Missing or unreadable numbers fall back to a start of 0 and a count of 1.
pub fn parse_hunk_header(line: &str) -> Hunk {
    let inner = line.trim_start_matches('@');
    let inner = inner.split("@@").next().unwrap_or(inner);

    let mut old = (0, 1);
    let mut new = (0, 1);
    for part in inner.split_whitespace() {
        if let Some(range) = part.strip_prefix('-') {
            old = parse_range(range);
        } else if let Some(range) = part.strip_prefix('+') {
            new = parse_range(range);
        }
    }

    Hunk {
        old_start: old.0,
        old_count: old.1,
        new_start: new.0,
        new_count: new.1,
        header: sanitize_line(line).chars().take(MAX_HEADER_LEN).collect(),
        lines: Vec::new(),
    }
}

fn parse_range(s: &str) -> (u32, u32) {
    match s.split_once(',') {
        Some((start, count)) => (start.parse().unwrap_or(0), count.parse().unwrap_or(1)),
        None => (s.parse().unwrap_or(0), 1),
    }
}

/// Expand tabs to 4-column stops, drop CR/LF and other control characters,
/// and cut the result at `MAX_LINE_LEN` characters.
pub fn sanitize_line(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len().min(MAX_LINE_LEN));
    let mut col = 0usize;

    for ch in raw.chars() {
        if col >= MAX_LINE_LEN {
            break;
        }
        match ch {
            '\t' => {
                let spaces = TAB_STOP - (col % TAB_STOP);
                for _ in 0..spaces.min(MAX_LINE_LEN - col) {
                    out.push(' ');
                    col += 1;
                }
            }
            c if (c as u32) < 0x20 => {}
            c => {
                out.push(c);
                col += 1;
            }
        }
    }

    out
}
