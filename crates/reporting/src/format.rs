//! Number formatting shared by the renderers.

use roicalc_estimator::Cadence;

/// Whole units with thousands separators: `1234567.9` → `1,234,567`.
///
/// Amounts are floored, negative values keep their sign.
pub fn grouped(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let floored = value.floor();
    let digits = format!("{:.0}", floored.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if floored < 0.0 {
        out.insert(0, '-');
    }
    out
}

pub fn currency(value: f64) -> String {
    let body = grouped(value);
    match body.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${body}"),
    }
}

pub fn hours(value: f64) -> String {
    format!("{} hours", grouped(value))
}

/// `None` prints as `n/a`.
pub fn optional(value: Option<f64>, decimals: usize, suffix: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}{suffix}"),
        _ => "n/a".to_string(),
    }
}

/// Cents precision, for small per-unit amounts.
pub fn optional_currency(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("${v:.2}"),
        _ => "n/a".to_string(),
    }
}

pub fn cadence(c: Cadence) -> &'static str {
    match c {
        Cadence::Daily => "day",
        Cadence::Weekly => "week",
        Cadence::Monthly => "month",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(grouped(0.0), "0");
        assert_eq!(grouped(999.99), "999");
        assert_eq!(grouped(1_000.0), "1,000");
        assert_eq!(grouped(1_089_000.0), "1,089,000");
        assert_eq!(grouped(-2_400.5), "-2,401");
    }

    #[test]
    fn currency_and_optional() {
        assert_eq!(currency(85_440.0), "$85,440");
        assert_eq!(currency(-1_500.0), "-$1,500");
        assert_eq!(optional(Some(12.345), 1, "%"), "12.3%");
        assert_eq!(optional(None, 1, "%"), "n/a");
        assert_eq!(hours(14_520.0), "14,520 hours");
        assert_eq!(optional_currency(Some(2_400.0 / 14_520.0)), "$0.17");
        assert_eq!(optional_currency(None), "n/a");
    }
}
