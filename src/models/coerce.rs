use serde_json::Value;

/// How a raw numeric field is cleaned before parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberRule {
    /// Keep digits only ("1 234 просмотра" -> 1234)
    Integer,
    /// Keep digits and a single decimal separator ("45,5 м²" -> 45.5)
    Decimal,
}

impl NumberRule {
    fn allows_decimal(self) -> bool {
        matches!(self, NumberRule::Decimal)
    }
}

/// Normalize a raw extracted value into a number.
///
/// Numbers pass through unchanged. Strings are stripped of everything that is
/// not a digit (or a separator, for [`NumberRule::Decimal`]) and parsed.
/// Anything else, or a string with nothing numeric left in it, is absent.
pub fn coerce(raw: &Value, rule: NumberRule) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => coerce_str(s, rule.allows_decimal()),
        _ => None,
    }
}

/// Text variant of [`coerce`]
pub fn coerce_str(raw: &str, allow_decimal: bool) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || (allow_decimal && is_separator(*c)))
        .collect();

    let normalized = if allow_decimal {
        normalize_separators(&cleaned)
    } else {
        cleaned
    };

    if normalized.is_empty() {
        return None;
    }

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_separator(c: char) -> bool {
    c == '.' || c == ','
}

// A lone '.' is always the decimal point. A lone ',' is decimal unless it
// heads a three-digit group ("1,250"). A separator that repeats is a
// thousands separator ("1,250,000"); with mixed separators the last one is
// decimal ("1.250.000,50").
fn normalize_separators(cleaned: &str) -> String {
    let Some(last) = cleaned.rfind(is_separator) else {
        return cleaned.to_string();
    };

    let (int_part, rest) = cleaned.split_at(last);
    let sep = rest.as_bytes()[0] as char;
    let fraction = &rest[1..];
    let int_digits: String = int_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let earlier: Vec<char> = int_part.chars().filter(|c| is_separator(*c)).collect();
    let is_decimal = if earlier.is_empty() {
        sep == '.' || fraction.len() != 3
    } else {
        earlier.iter().any(|c| *c != sep)
    };

    if fraction.is_empty() || !is_decimal {
        return format!("{}{}", int_digits, fraction);
    }

    if int_digits.is_empty() {
        format!("0.{}", fraction)
    } else {
        format!("{}.{}", int_digits, fraction)
    }
}
