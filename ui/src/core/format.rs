//! Formatting helpers for presenting counts and chart values.

/// Thousands-separated rendering for vote totals and axis labels.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Death counts arrive as floats (the parser emits NaN for malformed cells).
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    if value < 0.0 {
        return format!("-{}", format_count((-value).round() as u64));
    }
    format_count(value.round() as u64)
}

pub fn format_percent(pct: u8) -> String {
    format!("{pct}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn non_finite_values_render_as_dash() {
        assert_eq!(format_value(f64::NAN), "—");
        assert_eq!(format_value(f64::INFINITY), "—");
        assert_eq!(format_value(1042.0), "1,042");
    }
}
