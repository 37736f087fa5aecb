//! PricePix Runner: per-date generation, persistence, and batch orchestration.
//!
//! This crate builds on `pricepix-core` to provide:
//! - ArtGenerator: fetch one day and run the encoding pipeline
//! - PNG persistence with optional nearest-neighbour upscaling and a JSON manifest
//! - BatchRunner: single-day and rolling-window runs with an explicit failure policy
//! - TOML configuration

pub mod batch;
pub mod config;
pub mod generator;
pub mod manifest;
pub mod sink;

pub use batch::{
    window_dates, BatchError, BatchProgress, BatchRunner, BatchSummary, FailurePolicy,
    SilentProgress, StdoutProgress,
};
pub use config::{AppConfig, ConfigError};
pub use generator::{ArtGenerator, GenerateError, GeneratedArt};
pub use manifest::ImageManifest;
pub use sink::{image_key, ImageSink, PersistError, PngSink};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn generator_is_send_sync() {
        assert_send::<ArtGenerator<'static>>();
        assert_sync::<ArtGenerator<'static>>();
    }

    #[test]
    fn generate_error_is_send() {
        assert_send::<GenerateError>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<AppConfig>();
        assert_sync::<AppConfig>();
        assert_send::<PngSink>();
        assert_sync::<PngSink>();
    }
}
