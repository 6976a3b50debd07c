//! Cell-level text primitives shared by the extractors.
//!
//! Numeric helpers validate without converting through `f64`: decimals come
//! back as the trimmed source digits so `"19.50"` stays `"19.50"`.

use regex::Regex;
use scraper::ElementRef;

/// Visible text of an element with runs of whitespace collapsed.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a non-negative integer count such as kills or a team score.
pub(crate) fn parse_count(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<u32>().ok()
}

/// Validates a non-negative decimal like `"13.86"` or `"9"` and returns it
/// trimmed.
pub(crate) fn parse_decimal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (trimmed, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    Some(trimmed.to_string())
}

/// Like [`parse_decimal`] but allows a trailing `%` and requires the value to
/// lie in `[0, 100]`.
pub(crate) fn parse_percentage(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let value = parse_decimal(trimmed.strip_suffix('%').unwrap_or(trimmed))?;
    let (int_part, frac_part) = value.split_once('.').unwrap_or((value.as_str(), ""));
    let whole = int_part.parse::<u64>().ok()?;
    let in_range = whole < 100 || (whole == 100 && frac_part.bytes().all(|b| b == b'0'));
    in_range.then_some(value)
}

/// Pulls the ladder user id out of a profile link href using the configured
/// pattern's first capture group.
pub(crate) fn external_id(href: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|id| !id.is_empty())
}
