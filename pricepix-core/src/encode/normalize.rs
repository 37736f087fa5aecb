//! Price normalization: closing prices to fixed-point cents color codes.

use super::color::ColorCode;
use crate::error::EncodeError;
use crate::grid::GridSize;
use crate::window::PriceObservation;

/// Scale a closing price to cents, truncating toward zero.
///
/// `27345.678` becomes `2734567`, never `2734568`.
pub fn price_to_code(time: i64, close: f64) -> Result<ColorCode, EncodeError> {
    if !close.is_finite() {
        return Err(EncodeError::NonFinitePrice { time, price: close });
    }
    let cents = (close * 100.0).trunc();
    // Out-of-range floats saturate in the cast; ColorCode::new rejects them either way.
    ColorCode::new(cents as i64)
}

/// Normalize chronologically ordered observations into the price sequence.
///
/// The caller must supply exactly `grid.price_cells()` observations.
pub fn normalize(
    observations: &[PriceObservation],
    grid: GridSize,
) -> Result<Vec<ColorCode>, EncodeError> {
    let expected = grid.price_cells();
    if observations.len() != expected {
        return Err(EncodeError::Size {
            expected,
            actual: observations.len(),
        });
    }

    observations
        .iter()
        .map(|obs| price_to_code(obs.time, obs.close))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(time: i64, close: f64) -> PriceObservation {
        PriceObservation { time, close }
    }

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(price_to_code(0, 27_345.678).unwrap().value(), 2_734_567);
        assert_eq!(price_to_code(0, 0.009).unwrap().value(), 0);
        assert_eq!(price_to_code(0, 1.0).unwrap().value(), 100);
    }

    #[test]
    fn rejects_prices_beyond_color_range() {
        assert!(matches!(
            price_to_code(0, 200_000.0),
            Err(EncodeError::Range { .. })
        ));
        assert!(matches!(
            price_to_code(0, -0.5),
            Err(EncodeError::Range { value: -50 })
        ));
    }

    #[test]
    fn rejects_nan() {
        assert!(matches!(
            price_to_code(7, f64::NAN),
            Err(EncodeError::NonFinitePrice { time: 7, .. })
        ));
    }

    #[test]
    fn keeps_chronological_order() {
        let grid = GridSize::new(2).unwrap(); // zero price cells
        assert!(normalize(&[], grid).unwrap().is_empty());

        let grid = GridSize::new(3).unwrap(); // five price cells
        let input: Vec<_> = (0..5).map(|i| obs(i, 10.0 + i as f64)).collect();
        let codes: Vec<u32> = normalize(&input, grid)
            .unwrap()
            .into_iter()
            .map(ColorCode::value)
            .collect();
        assert_eq!(codes, vec![1000, 1100, 1200, 1300, 1400]);
    }

    #[test]
    fn wrong_count_is_size_error() {
        let grid = GridSize::default();
        let input: Vec<_> = (0..95).map(|i| obs(i, 1.0)).collect();
        assert_eq!(
            normalize(&input, grid),
            Err(EncodeError::Size {
                expected: 96,
                actual: 95
            })
        );
    }
}
