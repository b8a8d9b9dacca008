//! Display entry point with fallbacks
//!
//! Decides per file whether to render side by side, pass the raw text
//! through, or report that there is nothing to show.

use crate::config::DisplaySettings;
use crate::diff::{parse_unified_diff, ParseError};
use crate::render::SideBySideRenderer;
use crate::syntax::SyntaxHighlighter;
use crate::unified::colorize_unified;
use log::debug;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    /// Not a unified diff; written out unchanged
    Passthrough,
    NoDifferences,
}

pub struct Viewer<'a> {
    settings: &'a DisplaySettings,
    width: usize,
    highlighter: Option<&'a SyntaxHighlighter>,
}

impl<'a> Viewer<'a> {
    pub fn new(
        settings: &'a DisplaySettings,
        width: usize,
        highlighter: Option<&'a SyntaxHighlighter>,
    ) -> Self {
        Self {
            settings,
            width,
            highlighter,
        }
    }

    /// Show one file's diff text
    pub fn show<W: Write>(&self, text: &str, out: &mut W) -> io::Result<Outcome> {
        if text.trim().is_empty() {
            return Ok(Outcome::NoDifferences);
        }

        if !self.settings.side_by_side {
            colorize_unified(text, self.settings.use_colors, out)?;
            return Ok(Outcome::Rendered);
        }

        match parse_unified_diff(text) {
            Ok(diff) => {
                let mut renderer = SideBySideRenderer::new(self.settings, self.width);
                if let Some(highlighter) = self.highlighter {
                    renderer = renderer.with_highlighter(highlighter);
                }
                // Buffered so a failed render leaves nothing half-written.
                let mut buf = Vec::new();
                let rendered = renderer.render(&diff, &mut buf).map(|()| buf);
                emit_rendered(rendered, text, out)
            }
            Err(ParseError::Empty) => Ok(Outcome::NoDifferences),
            Err(err) => {
                debug!("showing raw text: {}", err);
                passthrough(text, out)
            }
        }
    }

    /// Show a possibly multi-file diff. Returns whether anything was written.
    pub fn show_all<W: Write>(&self, text: &str, out: &mut W) -> io::Result<bool> {
        if !self.settings.side_by_side {
            return Ok(self.show(text, out)? != Outcome::NoDifferences);
        }

        let mut shown = false;
        for chunk in split_files(text) {
            if self.show(chunk, out)? != Outcome::NoDifferences {
                shown = true;
            }
        }
        Ok(shown)
    }
}

/// Write a finished render, or the raw text when rendering ran out of memory
fn emit_rendered<W: Write>(
    rendered: io::Result<Vec<u8>>,
    text: &str,
    out: &mut W,
) -> io::Result<Outcome> {
    match rendered {
        Ok(buf) => {
            out.write_all(&buf)?;
            Ok(Outcome::Rendered)
        }
        Err(err) if err.kind() == io::ErrorKind::OutOfMemory => {
            debug!("showing raw text: {}", err);
            passthrough(text, out)
        }
        Err(err) => Err(err),
    }
}

fn passthrough<W: Write>(text: &str, out: &mut W) -> io::Result<Outcome> {
    write!(out, "{}", text)?;
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(Outcome::Passthrough)
}

/// Split diff output into one chunk per `diff --git` section.
///
/// Text without any `diff --git` line is returned as a single chunk. Blank
/// chunks are dropped.
pub fn split_files(text: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if offset > 0 && line.starts_with("diff --git ") {
            starts.push(offset);
        }
        offset += line.len();
    }

    let mut chunks = Vec::with_capacity(starts.len() + 1);
    let mut begin = 0;
    for start in starts.into_iter().chain(std::iter::once(text.len())) {
        let chunk = &text[begin..start];
        if !chunk.trim().is_empty() {
            chunks.push(chunk);
        }
        begin = start;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FILES: &str = "\
diff --git a/one.txt b/one.txt
--- a/one.txt
+++ b/one.txt
@@ -1 +1 @@
-1
+one
diff --git a/two.txt b/two.txt
--- a/two.txt
+++ b/two.txt
@@ -1 +1 @@
-2
+two
";

    fn plain() -> DisplaySettings {
        DisplaySettings {
            use_colors: false,
            syntax_highlighting: false,
            ..Default::default()
        }
    }

    fn show(settings: &DisplaySettings, text: &str) -> (Outcome, String) {
        let viewer = Viewer::new(settings, 100, None);
        let mut out = Vec::new();
        let outcome = viewer.show(text, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_empty_input_is_no_differences() {
        let (outcome, output) = show(&plain(), "");
        assert_eq!(outcome, Outcome::NoDifferences);
        assert!(output.is_empty());
    }

    #[test]
    fn test_non_diff_text_passes_through() {
        let text = "Binary files a/logo.png and b/logo.png differ";
        let (outcome, output) = show(&plain(), text);
        assert_eq!(outcome, Outcome::Passthrough);
        assert_eq!(output, format!("{}\n", text));
    }

    #[test]
    fn test_diff_is_rendered() {
        let (outcome, output) = show(&plain(), TWO_FILES.split("diff --git a/two").next().unwrap());
        assert_eq!(outcome, Outcome::Rendered);
        assert!(output.contains("  File: one.txt  +1 -1"));
    }

    #[test]
    fn test_unified_mode_skips_parsing() {
        let settings = DisplaySettings {
            side_by_side: false,
            ..plain()
        };
        let (outcome, output) = show(&settings, "not a diff at all");
        assert_eq!(outcome, Outcome::Rendered);
        assert_eq!(output, "not a diff at all\n");
    }

    #[test]
    fn test_render_out_of_memory_falls_back_to_raw() {
        let text = "@@ -1 +1 @@\n-a\n+b";
        let failed = Err(io::Error::new(io::ErrorKind::OutOfMemory, "rows"));
        let mut out = Vec::new();
        let outcome = emit_rendered(failed, text, &mut out).unwrap();
        assert_eq!(outcome, Outcome::Passthrough);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", text));
    }

    #[test]
    fn test_render_write_errors_propagate() {
        let failed = Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        let mut out = Vec::new();
        let err = emit_rendered(failed, "-a\n", &mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(out.is_empty());
    }

    #[test]
    fn test_split_files() {
        let chunks = split_files(TWO_FILES);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with("diff --git a/one.txt"));
        assert!(chunks[0].ends_with("+one\n"));
        assert!(chunks[1].starts_with("diff --git a/two.txt"));
        assert_eq!(chunks.concat(), TWO_FILES);
    }

    #[test]
    fn test_split_single_and_blank() {
        assert_eq!(split_files("@@ -1 +1 @@\n-a\n+b\n").len(), 1);
        assert!(split_files("\n\n").is_empty());
    }

    #[test]
    fn test_show_all_renders_each_file() {
        let settings = plain();
        let viewer = Viewer::new(&settings, 100, None);
        let mut out = Vec::new();
        assert!(viewer.show_all(TWO_FILES, &mut out).unwrap());

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("File: one.txt"));
        assert!(output.contains("File: two.txt"));
    }

    #[test]
    fn test_show_all_nothing_to_show() {
        let settings = plain();
        let viewer = Viewer::new(&settings, 100, None);
        let mut out = Vec::new();
        assert!(!viewer.show_all("", &mut out).unwrap());
    }
}
