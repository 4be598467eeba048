use regex::Regex;
use std::borrow::Cow;

/// Remove every `strip` match, trim, map U+2212 (minus sign) to `-`, then parse.
/// Anything that does not come out as a finite number is `None`.
pub fn parse_number(raw: &str, strip: Option<&Regex>) -> Option<f64> {
    let stripped = match strip {
        Some(re) => re.replace_all(raw, ""),
        None => Cow::Borrowed(raw),
    };
    let cleaned = stripped.trim().replace('\u{2212}', "-");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Remove every `pattern` match and trim what is left. Cells without a match come back as-is.
pub fn strip_matches(raw: &str, pattern: &Regex) -> String {
    let stripped = pattern.replace_all(raw, "");
    if stripped == raw {
        // only empty matches, or none at all
        raw.to_string()
    } else {
        stripped.trim().to_string()
    }
}
