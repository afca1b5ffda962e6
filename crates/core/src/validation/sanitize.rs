//! String sanitisation for user-supplied card text

use super::MAX_TICKER_LEN;

/// Upper-case, keep only `[A-Z0-9$]`, cap at 20 characters
pub fn sanitize_ticker(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '$')
        .take(MAX_TICKER_LEN)
        .collect()
}

/// Drop ASCII control characters and angle brackets, then trim
pub fn sanitize_text(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !is_stripped(*c))
        .collect();
    stripped.trim().to_string()
}

fn is_stripped(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{1F}' | '\u{7F}' | '<' | '>')
}
