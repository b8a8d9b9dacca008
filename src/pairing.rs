//! Row alignment for side-by-side display.
//!
//! A run of removed lines followed by a run of added lines is laid out
//! positionally: the n-th removed line shares a row with the n-th added line.
//! No attempt is made to find a minimal edit alignment.

use crate::diff::{Hunk, Line, LineKind};
use std::collections::TryReserveError;

/// One side of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell<'a> {
    pub line_no: Option<u32>,
    pub text: &'a str,
}

/// A display row, borrowing its text from the parsed hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    pub kind: LineKind,
    pub left: Option<Cell<'a>>,
    pub right: Option<Cell<'a>>,
}

impl<'a> Row<'a> {
    /// A line shown as-is
    fn from_line(line: &'a Line) -> Self {
        let left = match line.kind {
            LineKind::Added => None,
            _ => Some(Cell {
                line_no: line.left_line_no,
                text: &line.left_text,
            }),
        };
        let right = match line.kind {
            LineKind::Removed => None,
            _ => Some(Cell {
                line_no: line.right_line_no,
                text: &line.right_text,
            }),
        };
        Self {
            kind: line.kind,
            left,
            right,
        }
    }
}

/// Align a hunk's lines into rows.
///
/// Never produces more rows than the hunk has lines, so the single up-front
/// reservation covers every push.
pub fn pair_hunk(hunk: &Hunk) -> Result<Vec<Row<'_>>, TryReserveError> {
    let lines = &hunk.lines;
    let mut rows = Vec::new();
    rows.try_reserve(lines.len())?;
    let mut i = 0;

    while i < lines.len() {
        if lines[i].kind != LineKind::Removed {
            rows.push(Row::from_line(&lines[i]));
            i += 1;
            continue;
        }

        let j = run_end(lines, i, LineKind::Removed);
        let k = run_end(lines, j, LineKind::Added);
        let removed = &lines[i..j];
        let added = &lines[j..k];

        for p in 0..removed.len().max(added.len()) {
            let left = removed.get(p).map(|l| Cell {
                line_no: l.left_line_no,
                text: &l.left_text,
            });
            let right = added.get(p).map(|l| Cell {
                line_no: l.right_line_no,
                text: &l.right_text,
            });
            let kind = match (left.is_some(), right.is_some()) {
                (true, true) => LineKind::Modified,
                (true, false) => LineKind::Removed,
                _ => LineKind::Added,
            };
            rows.push(Row { kind, left, right });
        }

        i = k;
    }

    Ok(rows)
}

fn run_end(lines: &[Line], start: usize, kind: LineKind) -> usize {
    lines[start..]
        .iter()
        .position(|l| l.kind != kind)
        .map_or(lines.len(), |n| start + n)
}
