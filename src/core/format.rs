use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const MAX_PRECISION: u32 = 12;

/// Formats `value` with exactly `precision` fractional digits.
///
/// Rounding is done in decimal space so values like `0.1 + 0.2` do not leak
/// binary noise into labels; negative zero is printed as `0`.
#[must_use]
pub fn format_decimal(value: f64, precision: u32) -> String {
    let precision = precision.min(MAX_PRECISION);
    match Decimal::from_f64(value) {
        Some(decimal) => {
            let mut rounded =
                decimal.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
            if rounded.is_zero() {
                rounded.set_sign_positive(true);
            }
            rounded.rescale(precision);
            rounded.to_string()
        }
        None => {
            let precision = precision as usize;
            format!("{value:.precision$}")
        }
    }
}

/// Smallest number of fractional digits that represents multiples of `step`.
#[must_use]
pub fn precision_for_step(step: f64) -> u32 {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let mut scaled = step;
    for precision in 0..MAX_PRECISION {
        if (scaled - scaled.round()).abs() <= 1e-9 * scaled.abs().max(1.0) {
            return precision;
        }
        scaled *= 10.0;
    }
    MAX_PRECISION
}

/// Power-of-thousand exponent factored out of labels for very large or very
/// small domains; zero when labels read fine as they are.
#[must_use]
pub fn magnitude_exponent(start: f64, end: f64) -> i32 {
    let magnitude = start.abs().max(end.abs());
    if !magnitude.is_finite() || magnitude == 0.0 {
        return 0;
    }
    if magnitude >= 1e6 || magnitude < 1e-3 {
        3 * (magnitude.log10() / 3.0).floor() as i32
    } else {
        0
    }
}

#[must_use]
pub fn magnitude_suffix(exponent: i32) -> String {
    if exponent == 0 {
        String::new()
    } else {
        format!("e{exponent}")
    }
}

/// Formats unix seconds with a `chrono` strftime pattern in UTC.
#[must_use]
pub fn format_timestamp(seconds: f64, pattern: &str) -> String {
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1_000_000_000.0).round() as u32;
    match DateTime::<Utc>::from_timestamp(whole as i64, nanos.min(999_999_999)) {
        Some(time) => time.format(pattern).to_string(),
        None => format_decimal(seconds, 0),
    }
}
