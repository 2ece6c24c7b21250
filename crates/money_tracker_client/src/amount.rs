//! Amount text parsing for the transfer and adjustment forms.
//!
//! Inputs are free text until submission. `parse_float` follows the browser's
//! `parseFloat`: leading whitespace is skipped, the longest numeric prefix wins,
//! and text with no numeric prefix yields NaN.

/// What to do with a non-finite amount at submission time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AmountPolicy {
    /// Send it anyway; serializes as JSON `null` and the server rejects it.
    #[default]
    PassThrough,
    /// Block the submission client-side.
    RejectNonFinite,
}

impl AmountPolicy {
    pub fn admits(self, value: f64) -> bool {
        value.is_finite() || self == AmountPolicy::PassThrough
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

pub fn parse_float(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    // An exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// `parseFloat(text) || 0`, used by the initial-balance field.
pub fn parse_float_or_zero(input: &str) -> f64 {
    let v = parse_float(input);
    if v.is_nan() {
        0.0
    } else {
        v
    }
}
