//! Compact numeric display for control text fields.

/// Format `value` with `digits` significant digits, `%g` style.
///
/// Fixed notation is used when the decimal exponent lies in
/// `[-4, digits)`, scientific otherwise; trailing zeros are stripped.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let digits = digits.max(1);
    // Rounding to `digits` may bump the exponent (9.99996 -> 1.000e1), so
    // read it back from the scientific rendering.
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= digits as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
