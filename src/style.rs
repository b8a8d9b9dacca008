//! ANSI escape table used by every renderer.
//!
//! Codes are compile-time constants; nothing here is mutated at runtime.

/// Semantic color names mapped to fixed escape sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Reset,
    Header,
    Hunk,
    AddFg,
    DelFg,
    LineNum,
    Separator,
    EmptyBg,
}

impl Color {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Reset => "\x1b[0m",
            Self::Header => "\x1b[1;36m",
            Self::Hunk => "\x1b[36m",
            Self::AddFg => "\x1b[32m",
            Self::DelFg => "\x1b[31m",
            Self::LineNum => "\x1b[90m",
            Self::Separator => "\x1b[90m",
            Self::EmptyBg => "\x1b[100m",
        }
    }
}

/// Escape code for `color`, or an empty string when colors are off
pub fn code(color: Color, enabled: bool) -> &'static str {
    if enabled {
        color.code()
    } else {
        ""
    }
}

/// Wrap `text` in `color` and a trailing reset
pub fn paint(color: Color, text: &str, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", color.code(), text, Color::Reset.code())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_disabled_is_plain() {
        assert_eq!(paint(Color::AddFg, "abc", false), "abc");
        assert_eq!(code(Color::Hunk, false), "");
    }

    #[test]
    fn test_paint_enabled_wraps_with_reset() {
        assert_eq!(paint(Color::DelFg, "x", true), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_every_code_ends_with_m() {
        let all = [
            Color::Reset,
            Color::Header,
            Color::Hunk,
            Color::AddFg,
            Color::DelFg,
            Color::LineNum,
            Color::Separator,
            Color::EmptyBg,
        ];
        for color in all {
            assert!(color.code().starts_with('\x1b'));
            assert!(color.code().ends_with('m'));
        }
    }
}
