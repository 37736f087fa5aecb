//! Grid composition: interleave price cells with the signature block.
//!
//! Output index `i` runs over the N×N grid in row-major order. The four indices
//! of the bottom-right 2×2 block take signature values in order; every other
//! index takes the next price value. Inputs are borrowed and read through two
//! forward-only cursors.

use super::color::ColorCode;
use super::signature::SIGNATURE_LEN;
use crate::error::EncodeError;
use crate::grid::GridSize;

/// Merge `prices` and `signature` into one row-major grid sequence.
///
/// Fails with `SignatureLength` when the signature is not exactly four codes
/// (checked first), and with `SequenceLength` when the combined length is not
/// N². Neither input is modified.
pub fn compose(
    prices: &[ColorCode],
    signature: &[ColorCode],
    grid: GridSize,
) -> Result<Vec<ColorCode>, EncodeError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(EncodeError::SignatureLength {
            len: signature.len(),
        });
    }

    let cells = grid.cells();
    let actual = prices.len() + signature.len();
    if actual != cells {
        return Err(EncodeError::SequenceLength {
            size: grid.get(),
            expected: cells,
            actual,
        });
    }

    let positions = grid.signature_positions();
    let mut price_cursor = prices.iter();
    let mut signature_cursor = signature.iter();
    let mut output = Vec::with_capacity(cells);

    for i in 0..cells {
        let source = if positions.contains(&i) {
            &mut signature_cursor
        } else {
            &mut price_cursor
        };
        // Lengths were checked above, so neither cursor runs dry.
        let value = source.next().copied().ok_or(EncodeError::SequenceLength {
            size: grid.get(),
            expected: cells,
            actual,
        })?;
        output.push(value);
    }

    debug_assert!(price_cursor.next().is_none());
    debug_assert!(signature_cursor.next().is_none());

    Ok(output)
}
