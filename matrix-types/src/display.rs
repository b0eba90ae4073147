//! `printf`-style rendering of matrices.

use std::fmt;

use crate::Matrix;

const CELL_WIDTH: usize = 10;
const CELL_PRECISION: usize = 5;

/// Formats `value` the way C's `%.{precision}G` does.
///
/// Uses `precision` significant digits, switches to `E±XX` notation when the
/// decimal exponent is below -4 or at least `precision`, and trims trailing
/// zeros from the fraction.
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}E{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

impl fmt::Display for Matrix {
    /// One line per row: `Row i: ` followed by each cell as `%10.5G`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ix, row) in self.as_slice().chunks(self.cols()).enumerate() {
            write!(f, "Row {}: ", ix)?;
            for value in row {
                write!(f, " {:>width$}", format_g(*value, CELL_PRECISION), width = CELL_WIDTH)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
