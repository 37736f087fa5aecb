//! PricePix Core: the encoding pipeline behind one deterministic image per day.
//!
//! This crate contains everything between raw market observations and a pixel grid:
//! - Color codec (24-bit integer <-> RGB triple)
//! - Date signature watermark
//! - Price normalization (closing price -> fixed-point cents color code)
//! - Grid composition (price cells interleaved with the 2×2 signature block)
//! - Day-window sanity checks on fetched observations
//! - Price provider trait with CryptoCompare and CSV replay implementations

pub mod data;
pub mod encode;
pub mod error;
pub mod grid;
pub mod window;

pub use encode::color::{decode, encode, ColorCode, Rgb, MAX_COLOR_CODE};
pub use encode::compose::compose;
pub use encode::normalize::{normalize, price_to_code};
pub use encode::signature::{generate_signature, SIGNATURE_LEN};
pub use error::EncodeError;
pub use grid::{GridSize, PixelGrid};
pub use window::{validate_window, DayWindow, PriceObservation};

/// Encode one day's observations into the full grid sequence.
///
/// Runs window validation, normalization, signature generation and composition
/// in that order. The returned sequence always has exactly `grid.cells()` entries.
pub fn encode_day(
    observations: &[PriceObservation],
    window: &DayWindow,
    grid: GridSize,
) -> Result<Vec<ColorCode>, EncodeError> {
    validate_window(observations, window)?;
    let prices = normalize(observations, grid)?;
    let signature = generate_signature(window.date())?;
    compose(&prices, &signature, grid)
}
