use serde::{Deserialize, Serialize};

/// Outcome of cleaning the text of a numeric field after a keystroke
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sanitized {
    pub text: String,
    /// Cursor position in characters
    pub cursor: usize,
    /// Whether the field should be flagged as invalid
    pub invalid: bool,
}

/// Clean the text of a numeric field and move the cursor accordingly
///
/// Only ASCII digits, `.` and a leading `-` are kept, and only the first `.`
/// survives (the digits after later dots are concatenated onto the fraction).
/// When anything was removed the cursor moves left by the number of removed
/// characters, stopping at zero.
pub fn sanitize(text: &str, cursor: usize) -> Sanitized {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let (sign, rest) = match kept.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", kept.as_str()),
    };

    let mut cleaned = String::with_capacity(kept.len());
    cleaned.push_str(sign);
    let mut seen_dot = false;
    for c in rest.chars().filter(|c| *c != '-') {
        if c == '.' {
            if seen_dot {
                continue;
            }
            seen_dot = true;
        }
        cleaned.push(c);
    }

    let cursor = if cleaned == text {
        cursor
    } else {
        let removed = text.chars().count() - cleaned.chars().count();
        cursor.saturating_sub(removed)
    };

    let invalid = is_invalid(&cleaned);
    Sanitized {
        text: cleaned,
        cursor,
        invalid,
    }
}

/// Whether field content is empty, not a number, or ends with a dot
pub fn is_invalid(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || parse_number(text).is_none() || text.ends_with('.')
}

/// Parse the content of a numeric field
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a variable count the way the count field is read: an optional
/// sign followed by digits, ignoring anything after them
pub fn parse_count(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits_start = usize::from(text.starts_with(['-', '+']));
    let digits_len = text[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    text[..digits_start + digits_len].parse().ok()
}
