//! Abbreviated count parsing (`"1.2M"`, `"45.3K"`, `"1,234"`).

/// Parses a human-readable, possibly abbreviated count into an integer.
///
/// Whitespace and `,` separators are removed and a trailing `K`, `M`, or `B`
/// (any case) scales the numeric prefix. Fractional results are truncated.
/// Malformed, empty, non-finite, or negative input yields `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_count(raw: &str) -> u64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect::<String>()
        .to_uppercase();

    let (number, multiplier) = match cleaned.chars().last() {
        Some('K') => (&cleaned[..cleaned.len() - 1], 1e3),
        Some('M') => (&cleaned[..cleaned.len() - 1], 1e6),
        Some('B') => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1.0),
    };

    let Ok(value) = number.parse::<f64>() else {
        return 0;
    };
    let scaled = value * multiplier;
    if !scaled.is_finite() || scaled <= 0.0 {
        return 0;
    }
    // `as` saturates at u64::MAX.
    scaled as u64
}
