//! Monetary amount helpers.
//!
//! Prices arrive from the catalog and from on-device storage as loosely
//! typed JSON: numbers, numeric strings, `null`, or garbage left behind by
//! older app versions. Everything here folds those inputs into `Option<f64>`
//! so the price engine only ever sees finite values or nothing.

use serde::{Deserialize, Deserializer};

/// Keep a value only if it is a finite number.
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Keep a value only if it is finite and strictly positive.
pub fn positive(value: Option<f64>) -> Option<f64> {
    finite(value).filter(|v| *v > 0.0)
}

/// Coerce a JSON value into an amount.
///
/// Accepts numbers and numeric strings (surrounding whitespace allowed).
/// Returns `None` for everything else, including non-finite results.
pub fn coerce_amount(value: &serde_json::Value) -> Option<f64> {
    let amount = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    finite(amount)
}

/// Serde adapter for optional amount fields.
///
/// Use together with `#[serde(default)]` so missing fields become `None`.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_amount))
}

/// Convert an amount to integer cents, rounding half away from zero.
pub fn to_cents(amount: f64) -> i64 {
    if !amount.is_finite() {
        return 0;
    }
    (amount * 100.0).round() as i64
}

/// Format an amount with two decimal places (e.g., "12.50").
pub fn display_amount(amount: f64) -> String {
    let cents = to_cents(amount);
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{}{}.{:02}", sign, cents / 100, cents % 100)
}
