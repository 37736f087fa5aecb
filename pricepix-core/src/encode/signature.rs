//! Date signature: a per-day watermark rendered as the bottom-right 2×2 block.
//!
//! The signature value is the decimal concatenation of month, day and the
//! 4-digit year, without separators or zero-padding (9 April 2023 → `492023`).
//! Restricting the year to four digits bounds the value at `12319999`, which is
//! always a valid color code.

use super::color::ColorCode;
use crate::error::EncodeError;
use chrono::{Datelike, NaiveDate};

/// Number of cells occupied by the signature block.
pub const SIGNATURE_LEN: usize = 4;

/// Build the raw signature integer for a date.
pub fn signature_value(date: NaiveDate) -> Result<i64, EncodeError> {
    let year = date.year();
    if !(1000..=9999).contains(&year) {
        return Err(EncodeError::UnsupportedYear { year });
    }

    let digits = format!("{}{}{}", date.month(), date.day(), year);
    // Only ASCII digits and at most 8 of them, so parsing cannot fail.
    digits
        .parse::<i64>()
        .map_err(|_| EncodeError::UnsupportedYear { year })
}

/// Generate the 4-element signature sequence for a date.
pub fn generate_signature(date: NaiveDate) -> Result<Vec<ColorCode>, EncodeError> {
    let code = ColorCode::new(signature_value(date)?)?;
    Ok(vec![code; SIGNATURE_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn concatenates_month_day_year() {
        let sig = generate_signature(date(2023, 4, 9)).unwrap();
        let values: Vec<u32> = sig.iter().map(|c| c.value()).collect();
        assert_eq!(values, vec![492_023; 4]);
    }

    #[test]
    fn two_digit_month_and_day_are_not_padded() {
        assert_eq!(signature_value(date(2024, 12, 31)).unwrap(), 12_312_024);
        assert_eq!(signature_value(date(2024, 1, 5)).unwrap(), 152_024);
    }

    #[test]
    fn largest_signature_fits_in_24_bits() {
        let value = signature_value(date(9999, 12, 31)).unwrap();
        assert_eq!(value, 12_319_999);
        assert!(generate_signature(date(9999, 12, 31)).is_ok());
    }

    #[test]
    fn rejects_years_without_four_digits() {
        assert_eq!(
            generate_signature(date(999, 1, 1)),
            Err(EncodeError::UnsupportedYear { year: 999 })
        );
        assert_eq!(
            generate_signature(date(10_000, 1, 1)),
            Err(EncodeError::UnsupportedYear { year: 10_000 })
        );
    }
}
