//! Currency formatting for amounts printed on the invoice.

/// Symbol placed before the amount, and the number of minor-unit digits.
fn currency_format(code: &str) -> (String, usize) {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" | "NZD" => ("$".to_string(), 2),
        "EUR" => ("\u{20AC}".to_string(), 2),
        "GBP" => ("\u{00A3}".to_string(), 2),
        "JPY" => ("\u{00A5}".to_string(), 0),
        "INR" => ("\u{20B9}".to_string(), 2),
        "" => (String::new(), 2),
        other => (format!("{other} "), 2),
    }
}

/// Group the integer digits in threes.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format `amount` in `currency`, e.g. `format_money(1234.5, "USD")` is
/// `"$1,234.50"`. Rounds half away from zero at the minor unit.
pub fn format_money(amount: f64, currency: &str) -> String {
    let (symbol, decimals) = currency_format(currency);
    let amount = if amount.is_finite() { amount } else { 0.0 };

    let scale = 10f64.powi(decimals as i32);
    let minor = (amount.abs() * scale).round();
    let negative = amount < 0.0 && minor > 0.0;

    let fixed = format!("{:.*}", decimals, minor / scale);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&symbol);
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// The "N x price each" annotation shown under multi-quantity rows.
pub fn unit_breakdown(quantity: i64, unit_price: f64, currency: &str) -> String {
    format!("{} x {} each", quantity, format_money(unit_price, currency))
}
