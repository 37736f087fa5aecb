//! Per-date art generation: fetch → validate → normalize → sign → compose → pixels.

use crate::manifest::ImageManifest;
use crate::sink::PersistError;
use chrono::NaiveDate;
use pricepix_core::data::{DataError, PriceProvider, TradingPair};
use pricepix_core::{encode_day, DayWindow, EncodeError, GridSize, PixelGrid};
use thiserror::Error;

/// Errors that abort generation for one date.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] DataError),

    #[error("encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("persist failed: {0}")]
    Persist(#[from] PersistError),
}

/// One date's finished grid, ready for a sink.
#[derive(Debug, Clone)]
pub struct GeneratedArt {
    pub date: NaiveDate,
    pub pixels: PixelGrid,
    pub manifest: ImageManifest,
}

/// Orchestrates a single date's pipeline against a price provider.
///
/// Holds no mutable state, so one generator can serve many dates, including
/// from several threads at once.
pub struct ArtGenerator<'a> {
    provider: &'a dyn PriceProvider,
    pair: TradingPair,
    grid: GridSize,
}

impl<'a> ArtGenerator<'a> {
    pub fn new(provider: &'a dyn PriceProvider, pair: TradingPair, grid: GridSize) -> Self {
        Self {
            provider,
            pair,
            grid,
        }
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn pair(&self) -> &TradingPair {
        &self.pair
    }

    /// Whether the provider is currently accepting requests.
    pub fn provider_available(&self) -> bool {
        self.provider.is_available()
    }

    /// Build the pixel grid for `date`. Nothing is persisted here.
    #[tracing::instrument(skip(self), fields(pair = %self.pair, provider = self.provider.name()))]
    pub fn generate_for_date(&self, date: NaiveDate) -> Result<GeneratedArt, GenerateError> {
        let window = DayWindow::for_date(date, self.grid.price_cells())?;

        let observations = self.provider.fetch_window(&self.pair, &window)?;
        tracing::debug!(count = observations.len(), "fetched observations");

        let sequence = encode_day(&observations, &window, self.grid)?;
        let pixels = PixelGrid::from_sequence(&sequence, self.grid)?;

        let [corner, ..] = self.grid.signature_positions();
        let manifest = ImageManifest::build(
            date,
            &self.pair,
            self.provider.name(),
            self.grid.get(),
            sequence[corner],
            &observations,
            &sequence,
        );
        tracing::debug!(fingerprint = %manifest.fingerprint, "grid encoded");

        Ok(GeneratedArt {
            date,
            pixels,
            manifest,
        })
    }
}
