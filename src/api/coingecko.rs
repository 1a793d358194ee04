//! [`PriceApi`] implementation backed by CoinGecko's public
//! `/simple/price` endpoint.
//!
//! Uses a blocking HTTP client: the widget fetches on the GTK main thread
//! and accepts that the UI stalls for the duration of the request.

use crate::api::{FetchError, SimplePrice, SimplePriceResponse};
use crate::traits::PriceApi;
use log::debug;
use std::collections::BTreeMap;

/// Default CoinGecko endpoint.
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// CoinGecko-backed price API.
///
/// One request per [`simple_price`](PriceApi::simple_price) call, all ids
/// batched into a single `ids=` parameter.
pub struct CoinGeckoApi {
    client: reqwest::blocking::Client,
    url: String,
}

impl CoinGeckoApi {
    /// Create a client for `url`.
    ///
    /// Fails only if the HTTP client itself cannot be constructed (e.g. the
    /// TLS backend is unavailable).
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Query parameters for a batched USD price request.
fn query_params(ids: &[String]) -> [(&'static str, String); 2] {
    [("ids", ids.join(",")), ("vs_currencies", "usd".to_string())]
}

impl PriceApi for CoinGeckoApi {
    fn simple_price(&self, ids: &[String]) -> Result<SimplePriceResponse, FetchError> {
        let params = query_params(ids);
        debug!("GET {} ids={}", self.url, params[0].1);

        let response = self
            .client
            .get(&self.url)
            .header("accept", "application/json")
            .query(&params)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let raw: BTreeMap<String, SimplePrice> = response
            .json()
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        SimplePriceResponse::from_entries(raw)
    }
}
