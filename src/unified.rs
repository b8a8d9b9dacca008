//! Unified diff colorizer
//!
//! Colors each line by its leading token without parsing or pairing.

use crate::diff::LineKind;
use crate::style::{paint, Color};
use std::io::{self, Write};

/// Classify a raw unified diff line
pub fn classify(line: &str) -> LineKind {
    if line.starts_with("+++") || line.starts_with("---") || line.starts_with("diff ") {
        LineKind::Header
    } else if line.starts_with("@@") {
        LineKind::HunkMarker
    } else if line.starts_with('+') {
        LineKind::Added
    } else if line.starts_with('-') {
        LineKind::Removed
    } else if line.starts_with("Binary files") {
        LineKind::Binary
    } else if line.is_empty() {
        LineKind::Empty
    } else {
        LineKind::Context
    }
}

fn color_for(kind: LineKind) -> Option<Color> {
    match kind {
        LineKind::Header => Some(Color::Header),
        LineKind::HunkMarker => Some(Color::Hunk),
        LineKind::Added => Some(Color::AddFg),
        LineKind::Removed => Some(Color::DelFg),
        _ => None,
    }
}

pub fn colorize_unified<W: Write>(text: &str, use_colors: bool, out: &mut W) -> io::Result<()> {
    for line in text.lines() {
        match color_for(classify(line)) {
            Some(color) if use_colors => writeln!(out, "{}", paint(color, line, true))?,
            _ => writeln!(out, "{}", line)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("diff --git a/x b/x"), LineKind::Header);
        assert_eq!(classify("--- a/x"), LineKind::Header);
        assert_eq!(classify("+++ b/x"), LineKind::Header);
        assert_eq!(classify("@@ -1 +1 @@"), LineKind::HunkMarker);
        assert_eq!(classify("+added"), LineKind::Added);
        assert_eq!(classify("-removed"), LineKind::Removed);
        assert_eq!(classify(" context"), LineKind::Context);
        assert_eq!(classify("index 123..456"), LineKind::Context);
        assert_eq!(classify("Binary files a/x and b/x differ"), LineKind::Binary);
        assert_eq!(classify(""), LineKind::Empty);
    }

    #[test]
    fn test_colorize_with_colors() {
        let mut out = Vec::new();
        colorize_unified("--- a/f\n+new\n-old\n same\n", true, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "\x1b[1;36m--- a/f\x1b[0m");
        assert_eq!(lines[1], "\x1b[32m+new\x1b[0m");
        assert_eq!(lines[2], "\x1b[31m-old\x1b[0m");
        assert_eq!(lines[3], " same");
    }

    #[test]
    fn test_colorize_without_colors_is_passthrough() {
        let text = "diff --git a/f b/f\n@@ -1 +1 @@\n-a\n+b\n";
        let mut out = Vec::new();
        colorize_unified(text, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), text);
    }
}
