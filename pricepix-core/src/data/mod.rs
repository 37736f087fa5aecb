//! Price providers: where a day's observations come from.

pub mod circuit_breaker;
pub mod cryptocompare;
pub mod provider;
pub mod replay;

pub use circuit_breaker::CircuitBreaker;
pub use cryptocompare::{CryptoCompareConfig, CryptoCompareProvider};
pub use provider::{DataError, PriceProvider, TradingPair};
pub use replay::ReplayProvider;
