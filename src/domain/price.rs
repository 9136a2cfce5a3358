/// Parses a free-text price such as `"$25.00"` or `"$1,200.50"`.
///
/// Everything except ASCII digits and `.` is dropped, then the longest leading
/// number (digits with at most one `.`) is parsed. Missing, unparseable,
/// negative or non-finite input yields `0.0`.
pub fn parse_price(raw: Option<&str>) -> f64 {
    raw.and_then(try_parse_price).unwrap_or(0.0)
}

/// Like [`parse_price`] but distinguishes "no usable number" from a real zero.
pub fn try_parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    // "1.2.3" reads as 1.2, the way a browser's parseFloat would
    let end = cleaned
        .match_indices('.')
        .nth(1)
        .map_or(cleaned.len(), |(i, _)| i);

    cleaned[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}
