//! Syntax highlighting for context cells using syntect-assets (bat themes)
//!
//! Produces lines with 24-bit foreground escapes embedded, which the renderer
//! measures and truncates with the escape-aware helpers in `terminal`.

use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::as_24_bit_terminal_escaped;
use syntect_assets::assets::HighlightingAssets;

/// Syntax highlighter using syntect parsers and bat themes
pub struct SyntaxHighlighter {
    assets: HighlightingAssets,
    theme_name: String,
}

impl SyntaxHighlighter {
    /// Theme resolution order: explicit name, `BAT_THEME`, bundled default
    pub fn new(theme_name: Option<&str>) -> Self {
        let assets = HighlightingAssets::from_binary();
        let theme_name = theme_name
            .map(|s| s.to_string())
            .or_else(|| std::env::var("BAT_THEME").ok())
            .unwrap_or_else(|| HighlightingAssets::default_theme().to_string());
        log::debug!("syntax theme: {}", theme_name);
        Self { assets, theme_name }
    }

    /// Highlight consecutive lines of one file.
    ///
    /// Always returns one string per input line; a line that fails to
    /// highlight is returned unchanged.
    pub fn highlight_lines(&self, lines: &[&str], file_path: &str) -> Vec<String> {
        let Ok(syntax_set) = self.assets.get_syntax_set() else {
            return lines.iter().map(|l| l.to_string()).collect();
        };
        let syntax = find_syntax(syntax_set, file_path);
        let theme = self.assets.get_theme(&self.theme_name);
        let mut highlighter = HighlightLines::new(syntax, theme);

        lines
            .iter()
            .map(|line| {
                let text = format!("{}\n", line);
                match highlighter.highlight_line(&text, syntax_set) {
                    Ok(ranges) => as_24_bit_terminal_escaped(&ranges[..], false)
                        .trim_end_matches('\n')
                        .to_string(),
                    Err(err) => {
                        log::debug!("highlight failed for {}: {}", file_path, err);
                        line.to_string()
                    }
                }
            })
            .collect()
    }
}

fn find_syntax<'a>(syntax_set: &'a SyntaxSet, file_path: &str) -> &'a SyntaxReference {
    syntax_set
        .find_syntax_for_file(file_path)
        .ok()
        .flatten()
        .or_else(|| {
            Path::new(file_path)
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(|ext| syntax_set.find_syntax_by_extension(ext))
        })
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
}
