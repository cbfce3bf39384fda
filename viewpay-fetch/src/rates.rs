//! Exchange-rate service client.
//!
//! Speaks the currency-api wire format: one JSON document per base
//! currency (`/latest/currencies/usd/{code}.json`) holding the code and
//! its rate, plus a display-name listing (`/latest/currencies.json`)
//! used by the currency picker.

use async_trait::async_trait;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

use crate::client::HttpClient;
use crate::error::FetchError;

/// Default rate service base URL.
pub const DEFAULT_BASE_URL: &str = "https://cdn.jsdelivr.net/gh/fawazahmed0/currency-api@1";

// ============================================================================
// Rate Source Seam
// ============================================================================

/// Source of USD exchange rates.
///
/// The rate store depends on this trait rather than on HTTP so its
/// refresh logic is testable with a stub.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches the exchange rate from one USD into `code`.
    async fn usd_rate(&self, code: &str) -> Result<Decimal, FetchError>;
}

// ============================================================================
// Currency Names
// ============================================================================

/// A currency code with its human-readable name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CurrencyName {
    /// Lowercase wire code (e.g. "eur").
    pub code: String,
    /// Display name (e.g. "Euro").
    pub name: String,
}

/// Sorts a code-to-name listing by display name, dropping entries with
/// blank names, matching what the currency picker shows.
fn sorted_names(map: HashMap<String, String>) -> Vec<CurrencyName> {
    let mut names: Vec<CurrencyName> = map
        .into_iter()
        .filter(|(_, name)| !name.is_empty())
        .map(|(code, name)| CurrencyName { code, name })
        .collect();
    names.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    names
}

// ============================================================================
// Rate Client
// ============================================================================

/// HTTP client for the exchange-rate collaborator.
#[derive(Debug, Clone)]
pub struct RateClient {
    http: HttpClient,
    base_url: String,
}

impl RateClient {
    /// Creates a client against the default service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL (test servers,
    /// mirrors).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot
    /// be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        Url::parse(base_url)?;
        Ok(Self {
            http: HttpClient::new()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Replaces the HTTP client, keeping the base URL.
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    fn rate_url(&self, code: &str) -> String {
        format!(
            "{}/latest/currencies/usd/{}.json",
            self.base_url,
            code.to_lowercase()
        )
    }

    fn names_url(&self) -> String {
        format!("{}/latest/currencies.json", self.base_url)
    }

    /// Fetches the currency display-name listing, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or an unusable response.
    pub async fn currency_names(&self) -> Result<Vec<CurrencyName>, FetchError> {
        let response = self.http.get(&self.names_url()).await?;
        let map: HashMap<String, String> = response.json().await?;
        debug!(count = map.len(), "Fetched currency listing");
        Ok(sorted_names(map))
    }
}

#[async_trait]
impl RateSource for RateClient {
    async fn usd_rate(&self, code: &str) -> Result<Decimal, FetchError> {
        let code = code.to_lowercase();
        let response = self.http.get(&self.rate_url(&code)).await?;
        let map: HashMap<String, f64> = response.json().await?;

        let raw = *map
            .get(&code)
            .ok_or_else(|| FetchError::MissingRate { code: code.clone() })?;

        let rate = Decimal::from_f64(raw)
            .filter(|r| *r > Decimal::ZERO)
            .ok_or_else(|| {
                FetchError::InvalidResponse(format!("unusable rate {raw} for {code:?}"))
            })?;

        debug!(code = %code, rate = %rate, "Fetched USD exchange rate");
        Ok(rate)
    }
}
