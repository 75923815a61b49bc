//! `system.convert(value, from_unit, to_unit)` — unit conversion over the
//! fixed table in SPEC_FULL.md §4.4: m<->km, m<->mi, kg<->lb, C<->F, C<->K.
//! An unrecognized unit pair returns null rather than throwing — a typo here
//! is meant to degrade gracefully, the same as any other built-in misuse.

use super::arg;
use crate::value::Value;

/// Length/mass units expressed as a factor to the table's base unit (meters
/// for length, kilograms for mass).
fn linear_factor(unit: &str) -> Option<f64> {
    match unit {
        "m" => Some(1.0),
        "km" => Some(1000.0),
        "mi" => Some(1609.344),
        "kg" => Some(1.0),
        "lb" => Some(1.0 / 2.20462),
        _ => None,
    }
}

fn to_celsius(value: f64, unit: &str) -> Option<f64> {
    match unit {
        "C" => Some(value),
        "F" => Some((value - 32.0) * 5.0 / 9.0),
        "K" => Some(value - 273.15),
        _ => None,
    }
}

fn from_celsius(celsius: f64, unit: &str) -> Option<f64> {
    match unit {
        "C" => Some(celsius),
        "F" => Some(celsius * 9.0 / 5.0 + 32.0),
        "K" => Some(celsius + 273.15),
        _ => None,
    }
}

pub(super) fn convert(args: &[Value]) -> Value {
    let value = match arg(args, 0) {
        Value::Number(n) => n,
        _ => return Value::Null,
    };
    let from = arg(args, 1).to_string();
    let to = arg(args, 2).to_string();

    if let Some(result) = to_celsius(value, &from).and_then(|c| from_celsius(c, &to)) {
        return Value::Number(result);
    }

    match (linear_factor(&from), linear_factor(&to)) {
        (Some(f), Some(t)) => Value::Number(value * f / t),
        _ => Value::Null,
    }
}
