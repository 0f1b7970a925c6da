//! Latin-1 sanitization for legacy database columns.
//!
//! The emulator schemas store names in Latin-1 `VARCHAR` columns. Smart
//! punctuation common in catalog names would be mangled or rejected there, so
//! it is translated to ASCII equivalents and everything else outside Latin-1
//! is dropped.

/// Translate smart punctuation to ASCII and drop code points above U+00FF.
///
/// Idempotent, and never produces a longer string than its input.
pub fn sanitize_latin1(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            c if (c as u32) < 256 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Maximum stored length (in characters) for the constrained columns.
/// Columns not listed here are not truncated.
pub fn column_max_length(column: &str) -> Option<usize> {
    match column {
        "item_name" => Some(70),
        "public_name" => Some(56),
        "category" | "furniline" | "environment" => Some(100),
        "customparams" => Some(25600),
        _ => None,
    }
}

/// Truncate to at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
