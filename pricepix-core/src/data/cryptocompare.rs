//! CryptoCompare price provider.
//!
//! Fetches aggregated minute bars from the `histominute` endpoint. Handles rate
//! limiting, retries with exponential backoff, response parsing, and the
//! circuit breaker.
//!
//! The API key travels in the `Authorization` header, never in the URL, and
//! transport errors are formatted without their URL.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, PriceProvider, TradingPair};
use crate::window::{DayWindow, PriceObservation};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://min-api.cryptocompare.com";

/// `Type` code CryptoCompare uses for "over your rate limit" (sent with HTTP 200).
const THROTTLED_TYPE: i64 = 99;

/// `histominute` response envelope.
#[derive(Debug, Deserialize)]
struct HistoResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Type", default)]
    kind: i64,
    #[serde(rename = "Data", default)]
    data: Option<HistoData>,
}

#[derive(Debug, Deserialize)]
struct HistoData {
    #[serde(rename = "Data", default)]
    data: Option<Vec<HistoBar>>,
}

#[derive(Debug, Deserialize)]
struct HistoBar {
    time: i64,
    close: f64,
}

/// Connection settings for [`CryptoCompareProvider`].
#[derive(Debug, Clone)]
pub struct CryptoCompareConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    /// First retry delay; doubles on every further attempt.
    pub base_delay: Duration,
    pub api_key: Option<String>,
}

impl Default for CryptoCompareConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            api_key: None,
        }
    }
}

pub struct CryptoCompareProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    config: CryptoCompareConfig,
}

impl CryptoCompareProvider {
    /// Build the blocking HTTP client. Shares `circuit_breaker` with any other
    /// provider holding the same `Arc`.
    pub fn new(
        config: CryptoCompareConfig,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pricepix/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DataError::Other(format!("failed to build HTTP client: {}", e.without_url()))
            })?;

        Ok(Self {
            client,
            circuit_breaker,
            config,
        })
    }

    /// Build the `histominute` URL ending at the window's closing midnight.
    pub fn histo_url(&self, pair: &TradingPair, window: &DayWindow) -> String {
        format!(
            "{}/data/v2/histominute?fsym={}&tsym={}&aggregate={}&toTs={}&limit={}",
            self.config.base_url.trim_end_matches('/'),
            pair.base,
            pair.quote,
            window.interval_minutes(),
            window.end(),
            window.count().saturating_sub(1),
        )
    }

    /// Parse a `histominute` body into observations, oldest first.
    ///
    /// A throttled response maps to `RateLimited` with no retry hint
    /// (`retry_after_secs == 0`), so the caller falls back to its backoff.
    pub fn parse_body(body: &str) -> Result<Vec<PriceObservation>, DataError> {
        let resp: HistoResponse = serde_json::from_str(body)
            .map_err(|e| DataError::ResponseFormatChanged(format!("invalid JSON: {e}")))?;

        if resp.response != "Success" {
            if resp.kind == THROTTLED_TYPE {
                return Err(DataError::RateLimited {
                    retry_after_secs: 0,
                });
            }
            return Err(DataError::Provider(if resp.message.is_empty() {
                format!("response status '{}'", resp.response)
            } else {
                resp.message
            }));
        }

        let bars = resp
            .data
            .and_then(|d| d.data)
            .ok_or_else(|| DataError::ResponseFormatChanged("no Data.Data array".into()))?;

        let mut observations: Vec<PriceObservation> = bars
            .into_iter()
            .map(|b| PriceObservation {
                time: b.time,
                close: b.close,
            })
            .collect();
        observations.sort_by_key(|o| o.time);
        Ok(observations)
    }

    fn request(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        let req = self.client.get(url);
        match &self.config.api_key {
            Some(key) => req.header(AUTHORIZATION, format!("Apikey {key}")),
            None => req,
        }
    }

    fn fetch_with_retry(
        &self,
        pair: &TradingPair,
        window: &DayWindow,
    ) -> Result<Vec<PriceObservation>, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let url = self.histo_url(pair, window);
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let mut delay = self.config.base_delay * 2u32.pow(attempt - 1);
                if let Some(DataError::RateLimited { retry_after_secs }) = &last_error {
                    delay = delay.max(Duration::from_secs(*retry_after_secs));
                }
                tracing::warn!(attempt, ?delay, "retrying price fetch");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            tracing::debug!(%pair, date = %window.date(), "requesting histominute");
            match self.request(&url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::FORBIDDEN {
                        self.circuit_breaker.trip();
                        return Err(DataError::CircuitBreakerTripped);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        self.circuit_breaker.record_failure();
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(DataError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if !status.is_success() {
                        self.circuit_breaker.record_failure();
                        last_error = Some(DataError::Other(format!("HTTP {status} for {pair}")));
                        continue;
                    }

                    let body = resp.text().map_err(|e| {
                        DataError::ResponseFormatChanged(format!(
                            "failed to read body: {}",
                            e.without_url()
                        ))
                    })?;
                    match Self::parse_body(&body) {
                        Ok(observations) => {
                            self.circuit_breaker.record_success();
                            return Ok(observations);
                        }
                        Err(throttled @ DataError::RateLimited { .. }) => {
                            self.circuit_breaker.record_failure();
                            last_error = Some(throttled);
                            continue;
                        }
                        Err(e) => return Err(e),
                    }
                }
                Err(e) => {
                    let retryable = e.is_connect() || e.is_timeout();
                    let message = e.without_url().to_string();
                    if retryable {
                        self.circuit_breaker.record_failure();
                        last_error = Some(DataError::NetworkUnreachable(message));
                        continue;
                    }
                    return Err(DataError::NetworkUnreachable(message));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl PriceProvider for CryptoCompareProvider {
    fn name(&self) -> &str {
        "cryptocompare"
    }

    fn fetch_window(
        &self,
        pair: &TradingPair,
        window: &DayWindow,
    ) -> Result<Vec<PriceObservation>, DataError> {
        self.fetch_with_retry(pair, window)
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}
