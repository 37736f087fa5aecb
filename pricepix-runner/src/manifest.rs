//! Per-image manifest sidecar (JSON).
//!
//! Records what went into an image so a later run can confirm it reproduces
//! the same grid. Contains no wall-clock fields, so regenerating a date with
//! the same data yields a byte-identical manifest.

use chrono::NaiveDate;
use pricepix_core::data::TradingPair;
use pricepix_core::{ColorCode, PriceObservation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageManifest {
    pub date: NaiveDate,
    pub pair: TradingPair,
    pub provider: String,
    pub grid_size: usize,
    pub signature: u32,
    pub observation_count: usize,
    pub first_observation: i64,
    pub last_observation: i64,
    /// BLAKE3 over the grid size and every encoded cell.
    pub fingerprint: String,
}

impl ImageManifest {
    pub fn build(
        date: NaiveDate,
        pair: &TradingPair,
        provider: &str,
        grid_size: usize,
        signature: ColorCode,
        observations: &[PriceObservation],
        sequence: &[ColorCode],
    ) -> Self {
        Self {
            date,
            pair: pair.clone(),
            provider: provider.to_string(),
            grid_size,
            signature: signature.value(),
            observation_count: observations.len(),
            first_observation: observations.first().map_or(0, |o| o.time),
            last_observation: observations.last().map_or(0, |o| o.time),
            fingerprint: fingerprint(grid_size, sequence),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Deterministic hash of an encoded grid sequence.
pub fn fingerprint(grid_size: usize, sequence: &[ColorCode]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(grid_size as u64).to_le_bytes());
    for code in sequence {
        hasher.update(&code.value().to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
