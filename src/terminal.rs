//! Terminal metrics: escape-aware width arithmetic and terminal size lookup.

const ESC: char = '\x1b';

/// Width used when the terminal size cannot be determined
pub const DEFAULT_WIDTH: usize = 120;

/// Each side column is never narrower than this
pub const MIN_COLUMN_WIDTH: usize = 40;

/// Width of the literal " │ " between the two columns
pub const SEPARATOR_WIDTH: usize = 3;

const ELLIPSIS: &str = "...";

/// Count characters outside of `ESC ... m` sequences
pub fn visible_length(s: &str) -> usize {
    let mut len = 0;
    let mut in_escape = false;

    for ch in s.chars() {
        if ch == ESC {
            in_escape = true;
        } else if in_escape {
            if ch == 'm' {
                in_escape = false;
            }
        } else {
            len += 1;
        }
    }

    len
}

/// Pad or truncate `s` so that its visible length is exactly `width`.
///
/// Truncated text ends in `...`. Escape sequences are copied whole or not at
/// all, so the result never contains half of one.
pub fn fit_to_width(s: &str, width: usize) -> String {
    let visible = visible_length(s);

    if visible <= width {
        let mut out = String::with_capacity(s.len() + width - visible);
        out.push_str(s);
        out.extend(std::iter::repeat(' ').take(width - visible));
        return out;
    }

    let dots = ELLIPSIS.len().min(width);
    let budget = width - dots;

    let mut out = String::with_capacity(s.len().min(width * 4) + dots);
    let mut count = 0;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            out.push(ch);
            if ch == 'm' {
                in_escape = false;
            }
            continue;
        }
        if ch == ESC {
            in_escape = true;
            out.push(ch);
            continue;
        }
        if count == budget {
            break;
        }
        out.push(ch);
        count += 1;
    }

    out.push_str(&ELLIPSIS[..dots]);
    out
}

/// Narrowest total width that still gives each column `MIN_COLUMN_WIDTH`
pub const MIN_TERMINAL_WIDTH: usize = 2 * MIN_COLUMN_WIDTH + SEPARATOR_WIDTH;

/// Terminal columns, clamped to `max` when it is positive and smaller.
///
/// The result is never below `MIN_TERMINAL_WIDTH`.
pub fn resolve_width(max: usize) -> usize {
    let detected = match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => cols as usize,
        Ok(_) | Err(_) => {
            log::debug!("terminal size unavailable, using {}", DEFAULT_WIDTH);
            DEFAULT_WIDTH
        }
    };
    clamp_width(detected, max)
}

fn clamp_width(detected: usize, max: usize) -> usize {
    let width = if max > 0 && max < detected {
        max
    } else {
        detected
    };
    width.max(MIN_TERMINAL_WIDTH)
}

/// Width of one side column for a given total width
pub fn column_width(terminal_width: usize) -> usize {
    terminal_width.saturating_sub(SEPARATOR_WIDTH) / 2
}
