//! Price provider trait and structured error types.
//!
//! The PriceProvider trait abstracts over observation sources (CryptoCompare,
//! CSV replay) so the generator can swap implementations and mock for tests.

use crate::window::{DayWindow, PriceObservation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for fetch operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("provider returned an error: {0}")]
    Provider(String),

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("replay file error: {0}")]
    Replay(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Base/quote currency pair, e.g. BTC priced in USD.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    pub base: String,
    pub quote: String,
}

impl TradingPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }
}

impl Default for TradingPair {
    fn default() -> Self {
        Self::new("BTC", "USD")
    }
}

impl std::fmt::Display for TradingPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Trait for observation sources.
///
/// Implementations return observations for the window, oldest first. They do
/// not validate window alignment; that is the encoder's job.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch closing prices covering `window` for `pair`.
    fn fetch_window(
        &self,
        pair: &TradingPair,
        window: &DayWindow,
    ) -> Result<Vec<PriceObservation>, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}
