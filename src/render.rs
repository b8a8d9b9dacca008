//! Side-by-side renderer
//!
//! Writes a parsed `FileDiff` as two aligned columns: old content on the
//! left, new content on the right, separated by ` │ `.

use crate::config::DisplaySettings;
use crate::diff::{FileDiff, Hunk, LineKind};
use crate::pairing::{pair_hunk, Cell, Row};
use crate::style::{code, paint, Color};
use crate::syntax::SyntaxHighlighter;
use crate::terminal::{column_width, fit_to_width, visible_length};
use std::io::{self, Write};

/// Width of the line number gutter when line numbers are shown
pub const GUTTER_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

pub struct SideBySideRenderer<'a> {
    settings: &'a DisplaySettings,
    width: usize,
    highlighter: Option<&'a SyntaxHighlighter>,
}

impl<'a> SideBySideRenderer<'a> {
    /// `width` is the full output width, usually from `terminal::resolve_width`
    pub fn new(settings: &'a DisplaySettings, width: usize) -> Self {
        Self {
            settings,
            width,
            highlighter: None,
        }
    }

    /// Use `highlighter` for unchanged lines when colors and syntax
    /// highlighting are both enabled
    pub fn with_highlighter(mut self, highlighter: &'a SyntaxHighlighter) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    pub fn column_width(&self) -> usize {
        column_width(self.width)
    }

    pub fn gutter_width(&self) -> usize {
        if self.settings.show_line_numbers {
            GUTTER_WIDTH
        } else {
            0
        }
    }

    /// Room left for text after the gutter and the one-character marker
    pub fn content_width(&self) -> usize {
        self.column_width()
            .saturating_sub(self.gutter_width())
            .saturating_sub(1)
    }

    fn colors(&self) -> bool {
        self.settings.use_colors
    }

    pub fn render<W: Write>(&self, diff: &FileDiff, out: &mut W) -> io::Result<()> {
        self.render_header(diff, out)?;

        for hunk in &diff.hunks {
            self.render_hunk_marker(hunk, out)?;
            self.render_hunk(hunk, diff.display_path(), out)?;
        }

        writeln!(out, "{}", paint(Color::Header, &"═".repeat(self.width), self.colors()))?;
        writeln!(out)
    }

    fn render_header<W: Write>(&self, diff: &FileDiff, out: &mut W) -> io::Result<()> {
        let c = self.colors();
        writeln!(out)?;
        writeln!(out, "{}", paint(Color::Header, &"═".repeat(self.width), c))?;

        let mut line = paint(Color::Header, "  File: ", c);
        if diff.shows_rename() {
            line.push_str(&paint(Color::DelFg, &diff.old_path, c));
            line.push_str(" → ");
            line.push_str(&paint(Color::AddFg, &diff.new_path, c));
        } else {
            line.push_str(diff.display_path());
        }
        if diff.is_new {
            line.push_str(" (new file)");
        } else if diff.is_deleted {
            line.push_str(" (deleted)");
        }
        line.push_str("  ");
        line.push_str(&paint(Color::AddFg, &format!("+{}", diff.additions), c));
        line.push(' ');
        line.push_str(&paint(Color::DelFg, &format!("-{}", diff.deletions), c));
        writeln!(out, "{}", line)?;

        writeln!(out, "{}", paint(Color::Header, &"─".repeat(self.width), c))
    }

    /// The `@@` header centered in a rule
    fn render_hunk_marker<W: Write>(&self, hunk: &Hunk, out: &mut W) -> io::Result<()> {
        // At least one fill character on each side of " header ".
        let room = self.width.saturating_sub(4);
        let header = if visible_length(&hunk.header) > room {
            fit_to_width(&hunk.header, room)
        } else {
            hunk.header.clone()
        };

        let fill = self.width.saturating_sub(visible_length(&header) + 2);
        let padding = fill / 2;
        let rest = fill - padding;

        let marker = format!("{} {} {}", "─".repeat(padding), header, "─".repeat(rest));
        writeln!(out, "{}", paint(Color::Hunk, &marker, self.colors()))
    }

    fn render_hunk<W: Write>(&self, hunk: &Hunk, path: &str, out: &mut W) -> io::Result<()> {
        let rows =
            pair_hunk(hunk).map_err(|err| io::Error::new(io::ErrorKind::OutOfMemory, err))?;
        let highlighted = self.highlight_context(&rows, path);
        let mut highlighted = highlighted.iter();

        for row in &rows {
            let text = if row.kind == LineKind::Context {
                highlighted.next().map(String::as_str)
            } else {
                None
            };
            self.render_row(row, text, out)?;
        }

        Ok(())
    }

    /// Highlighted text for each context row, in row order
    fn highlight_context(&self, rows: &[Row<'_>], path: &str) -> Vec<String> {
        let Some(highlighter) = self.highlighter else {
            return Vec::new();
        };
        if !(self.settings.use_colors && self.settings.syntax_highlighting) {
            return Vec::new();
        }

        let texts: Vec<&str> = rows
            .iter()
            .filter(|row| row.kind == LineKind::Context)
            .map(|row| row.left.map_or("", |cell| cell.text))
            .collect();
        highlighter.highlight_lines(&texts, path)
    }

    fn render_row<W: Write>(
        &self,
        row: &Row<'_>,
        highlighted: Option<&str>,
        out: &mut W,
    ) -> io::Result<()> {
        let left = self.render_cell(row.kind, Side::Left, row.left, highlighted);
        let separator = paint(Color::Separator, " │ ", self.colors());
        let right = self.render_cell(row.kind, Side::Right, row.right, highlighted);
        writeln!(out, "{}{}{}", left, separator, right)
    }

    fn render_cell(
        &self,
        kind: LineKind,
        side: Side,
        cell: Option<Cell<'_>>,
        highlighted: Option<&str>,
    ) -> String {
        let c = self.colors();
        let width = self.content_width();
        let mut s = String::new();

        if self.settings.show_line_numbers {
            match cell.and_then(|cell| cell.line_no).filter(|&n| n > 0) {
                Some(n) => s.push_str(&paint(Color::LineNum, &gutter_label(n), c)),
                None => s.push_str(&" ".repeat(GUTTER_WIDTH)),
            }
        }

        let Some(cell) = cell else {
            // Nothing on this side: a solid block marks the absence.
            s.push_str(code(Color::EmptyBg, c));
            s.push_str(&" ".repeat(width + 1));
            s.push_str(code(Color::Reset, c));
            return s;
        };

        let change = match (kind, side) {
            (LineKind::Removed | LineKind::Modified, Side::Left) => Some(('-', Color::DelFg)),
            (LineKind::Added | LineKind::Modified, Side::Right) => Some(('+', Color::AddFg)),
            _ => None,
        };

        match change {
            Some((marker, color)) => {
                s.push_str(code(color, c));
                s.push(marker);
                s.push_str(&fit_to_width(cell.text, width));
                s.push_str(code(Color::Reset, c));
            }
            None => {
                s.push(' ');
                s.push_str(&fit_to_width(highlighted.unwrap_or(cell.text), width));
                s.push_str(code(Color::Reset, c));
            }
        }

        s
    }
}

/// Right-aligned line number; the lowest digits are kept when it is too wide
fn gutter_label(n: u32) -> String {
    let label = format!("{:>width$}", n, width = GUTTER_WIDTH);
    let skip = label.len() - GUTTER_WIDTH;
    label[skip..].to_string()
}
