/// Helper utilities for formatting TVL values and labels

/// Compact human form of a TVL value: 950, 12.3K, 4.56M, 1.20B
pub fn format_tvl(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        return format!("{:.0}", value);
    };

    if scaled.abs() >= 100.0 {
        format!("{:.0}{}", scaled, suffix)
    } else if scaled.abs() >= 10.0 {
        format!("{:.1}{}", scaled, suffix)
    } else {
        format!("{:.2}{}", scaled, suffix)
    }
}

/// Thousands separators for full-precision display
pub fn format_with_commas(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = value.abs().round() as u128;
    let digits = rounded.to_string();

    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (count, c) in digits.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    if negative {
        result.push('-');
    }

    result.chars().rev().collect()
}

/// Cut a label to `max` characters, marking the cut with `…`
pub fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out: String = label.chars().take(max - 1).collect();
    out.push('…');
    out
}
