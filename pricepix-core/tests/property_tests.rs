//! Property tests for encoding invariants.
//!
//! Uses proptest to verify:
//! 1. Color round-trip: decode(encode(v)) == v over the 24-bit range
//! 2. Range rejection: anything outside [0, 16777215] fails with Range
//! 3. Composition: signature cells read back in order, price cells keep order
//! 4. Length checks: wrong signature or total length fail with distinct errors

use proptest::prelude::*;
use pricepix_core::{compose, decode, encode, ColorCode, EncodeError, GridSize};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_code() -> impl Strategy<Value = ColorCode> {
    (0..=0xFF_FFFF_i64).prop_map(|v| ColorCode::new(v).unwrap())
}

fn arb_grid() -> impl Strategy<Value = GridSize> {
    (2usize..=24).prop_map(|n| GridSize::new(n).unwrap())
}

/// A grid plus a matching price sequence and signature.
fn arb_composition() -> impl Strategy<Value = (GridSize, Vec<ColorCode>, Vec<ColorCode>)> {
    arb_grid().prop_flat_map(|grid| {
        (
            Just(grid),
            prop::collection::vec(arb_code(), grid.price_cells()),
            prop::collection::vec(arb_code(), 4),
        )
    })
}

// ── 1 & 2. Color codec ───────────────────────────────────────────────

proptest! {
    #[test]
    fn color_round_trip(v in 0..=16_777_215_i64) {
        let rgb = encode(v).unwrap();
        prop_assert_eq!(decode(rgb) as i64, v);
    }

    #[test]
    fn color_rejects_above_range(v in 16_777_216_i64..i64::MAX) {
        prop_assert_eq!(encode(v), Err(EncodeError::Range { value: v }));
    }

    #[test]
    fn color_rejects_negative(v in i64::MIN..0) {
        prop_assert_eq!(encode(v), Err(EncodeError::Range { value: v }));
    }
}

// ── 3. Composition ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn compose_reads_back_both_inputs((grid, prices, signature) in arb_composition()) {
        let out = compose(&prices, &signature, grid).unwrap();
        prop_assert_eq!(out.len(), grid.cells());

        let positions = grid.signature_positions();
        let sig_back: Vec<ColorCode> = positions.iter().map(|&i| out[i]).collect();
        prop_assert_eq!(&sig_back, &signature);

        let price_back: Vec<ColorCode> = out
            .iter()
            .enumerate()
            .filter(|(i, _)| !positions.contains(i))
            .map(|(_, c)| *c)
            .collect();
        prop_assert_eq!(&price_back, &prices);
    }

    #[test]
    fn signature_is_bottom_right_block(grid in arb_grid()) {
        let n = grid.get();
        let expected = [
            (n - 2) * n + (n - 2),
            (n - 2) * n + (n - 1),
            (n - 1) * n + (n - 2),
            (n - 1) * n + (n - 1),
        ];
        prop_assert_eq!(grid.signature_positions(), expected);
    }
}

// ── 4. Length checks ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn bad_signature_length_always_reported(
        grid in arb_grid(),
        price_len in 0usize..600,
        sig_len in (0usize..12).prop_filter("not four", |l| *l != 4),
    ) {
        let code = ColorCode::new(1).unwrap();
        let prices = vec![code; price_len];
        let signature = vec![code; sig_len];
        prop_assert_eq!(
            compose(&prices, &signature, grid),
            Err(EncodeError::SignatureLength { len: sig_len })
        );
    }

    #[test]
    fn bad_total_length_reported(grid in arb_grid(), price_len in 0usize..600) {
        prop_assume!(price_len != grid.price_cells());
        let code = ColorCode::new(1).unwrap();
        let prices = vec![code; price_len];
        let signature = vec![code; 4];
        let result = compose(&prices, &signature, grid);
        let is_sequence_length = matches!(result, Err(EncodeError::SequenceLength { .. }));
        prop_assert!(is_sequence_length);
    }
}
