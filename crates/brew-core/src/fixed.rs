//! Fixed-point decimal text conversion shared by [`Money`](crate::Money) and
//! [`Quantity`](crate::Quantity).
//!
//! Values are stored as integers scaled by `10^scale`. Parsing is exact: text
//! with more fractional digits than the scale is rejected, never rounded.

/// Parses decimal text into an integer scaled by `10^scale`.
///
/// Accepts an optional leading sign, digits, and an optional fraction
/// (`"3"`, `"3.5"`, `"-0.25"`, `".5"`). Returns `None` for anything else,
/// including too many fractional digits or overflow.
pub(crate) fn parse_scaled(text: &str, scale: u32) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if fraction.len() > scale as usize {
        return None;
    }

    let factor = 10_i64.checked_pow(scale)?;
    let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    // Right-pad the fraction to the full scale: "5" at scale 3 is 500
    let mut fraction_value: i64 = 0;
    for position in 0..scale as usize {
        let digit = fraction.as_bytes().get(position).map_or(0, |b| i64::from(b - b'0'));
        fraction_value = fraction_value * 10 + digit;
    }

    let magnitude = whole_value.checked_mul(factor)?.checked_add(fraction_value)?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Formats a scaled integer as decimal text.
///
/// Trailing fractional zeros are kept to `min_fraction` digits, so money can
/// always show cents while quantities print as compactly as possible.
pub(crate) fn format_scaled(value: i64, scale: u32, min_fraction: usize) -> String {
    let factor = 10_i128.pow(scale);
    let magnitude = (value as i128).abs();
    let whole = magnitude / factor;
    let mut fraction = format!("{:0width$}", magnitude % factor, width = scale as usize);

    while fraction.len() > min_fraction && fraction.ends_with('0') {
        fraction.pop();
    }

    let sign = if value < 0 { "-" } else { "" };
    if fraction.is_empty() {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{fraction}")
    }
}
