// Utility helpers for parsing and formatting.
//
// The loader funnels every raw CSV field through here so the rest of the code
// can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Trim a string-like value, treating blank text as missing.
pub fn clean_text(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    Some(s.to_string())
}

/// Parse a visitor count.
///
/// - Trims whitespace and strips thousands separators like `","`.
/// - Accepts integral floats such as `1000.0`, which dataframe exports emit.
/// - Rejects negative, fractional or non-numeric values.
pub fn parse_count_safe(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

/// Star rating as shown on the KPI card and in popups, e.g. `4.3`. Ratings
/// stay below 10, so no grouping is needed.
pub fn format_rating(rating: f64) -> String {
    format!("{:.1}", rating)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Rupiah amount as shown on the revenue card, e.g. `Rp 520,000,000`.
pub fn format_rupiah(n: u64) -> String {
    format!("Rp {}", format_int(n))
}

/// Minimal HTML escaping for text placed inside marker popups.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
