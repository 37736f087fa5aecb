//! CSV replay provider: offline observations from a `time,close` file.
//!
//! Rows may span many days and appear in any order; each fetch returns the
//! rows inside the requested window, oldest first.

use super::provider::{DataError, PriceProvider, TradingPair};
use crate::window::{DayWindow, PriceObservation};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ReplayProvider {
    observations: Vec<PriceObservation>,
}

impl ReplayProvider {
    /// Serve a fixed set of observations, sorted by time.
    pub fn new(mut observations: Vec<PriceObservation>) -> Self {
        observations.sort_by_key(|o| o.time);
        Self { observations }
    }

    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let file = std::fs::File::open(path)
            .map_err(|e| DataError::Replay(format!("open {}: {e}", path.display())))?;
        Self::from_reader(file)
    }

    /// Parse CSV with a `time,close` header. Extra columns are ignored.
    pub fn from_reader(reader: impl Read) -> Result<Self, DataError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let observations = rdr
            .deserialize::<PriceObservation>()
            .enumerate()
            .map(|(i, row)| row.map_err(|e| DataError::Replay(format!("row {}: {e}", i + 1))))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(observations))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl PriceProvider for ReplayProvider {
    fn name(&self) -> &str {
        "csv_replay"
    }

    fn fetch_window(
        &self,
        _pair: &TradingPair,
        window: &DayWindow,
    ) -> Result<Vec<PriceObservation>, DataError> {
        Ok(self
            .observations
            .iter()
            .filter(|o| window.contains(o.time))
            .copied()
            .collect())
    }

    fn is_available(&self) -> bool {
        true
    }
}
