//! Price API boundary.
//!
//! This module defines the expected shape of the `/simple/price` response
//! and the error taxonomy for a failed fetch.  Concrete transports live in
//! submodules; nothing outside this module should know about CoinGecko's
//! URL or JSON layout.

pub mod coingecko;

use crate::traits::PriceApi;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Why a fetch did not produce a usable response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// Connection, TLS, or body-read failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("HTTP status {0}")]
    Status(u16),
    /// The body did not match the expected schema.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// One asset entry of a `/simple/price` response.
///
/// Only the USD price is read; any other currency or field is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimplePrice {
    pub usd: f64,
}

/// A decoded and validated `/simple/price` response: asset id → USD price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimplePriceResponse {
    prices: BTreeMap<String, f64>,
}

impl SimplePriceResponse {
    /// Build a response from `(id, usd)` pairs.  No validation is done;
    /// use [`parse`](Self::parse) for untrusted input.
    pub fn new(pairs: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            prices: pairs.into_iter().collect(),
        }
    }

    /// Decode a raw JSON body.
    ///
    /// Fails with [`FetchError::Malformed`] if the body is not an object of
    /// `{ "<id>": { "usd": <number> } }` entries, or if the decoded entries
    /// are rejected by [`from_entries`](Self::from_entries).
    pub fn parse(body: &str) -> Result<Self, FetchError> {
        let raw: BTreeMap<String, SimplePrice> =
            serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
        Self::from_entries(raw)
    }

    /// Validate already-decoded entries.
    ///
    /// An empty map, or a price that is negative or not finite, is
    /// [`FetchError::Malformed`].
    pub fn from_entries(raw: BTreeMap<String, SimplePrice>) -> Result<Self, FetchError> {
        if raw.is_empty() {
            return Err(FetchError::Malformed("no assets in response".into()));
        }
        let mut prices = BTreeMap::new();
        for (id, entry) in raw {
            if !entry.usd.is_finite() || entry.usd < 0.0 {
                return Err(FetchError::Malformed(format!(
                    "invalid usd price for {}: {}",
                    id, entry.usd
                )));
            }
            prices.insert(id, entry.usd);
        }
        Ok(Self { prices })
    }

    /// Iterate `(id, usd)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.prices.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// A [`PriceApi`] that never reaches the network.
///
/// Stands in when the real client cannot be constructed: every call fails
/// with the stored error, so the widget keeps showing its defaults.
#[derive(Debug, Clone)]
pub struct OfflineApi(pub FetchError);

impl PriceApi for OfflineApi {
    fn simple_price(&self, _ids: &[String]) -> Result<SimplePriceResponse, FetchError> {
        Err(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::DefaultQuoteTable;
    use crate::source::{FetchOutcome, PriceSource};
    use std::time::{Duration, Instant};

    #[test]
    fn parse_valid_body() {
        let body = r#"{"bitcoin":{"usd":64000.5},"ethereum":{"usd":3100}}"#;
        let r = SimplePriceResponse::parse(body).unwrap();
        assert_eq!(r.len(), 2);
        let pairs: Vec<(&str, f64)> = r.iter().collect();
        assert_eq!(pairs, vec![("bitcoin", 64000.5), ("ethereum", 3100.0)]);
    }

    #[test]
    fn extra_fields_ignored() {
        let body = r#"{"bitcoin":{"usd":1.0,"eur":0.9,"usd_24h_change":2.5}}"#;
        let r = SimplePriceResponse::parse(body).unwrap();
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn missing_usd_is_malformed() {
        let body = r#"{"bitcoin":{"eur":0.9}}"#;
        assert!(matches!(
            SimplePriceResponse::parse(body),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn non_object_is_malformed() {
        assert!(matches!(
            SimplePriceResponse::parse("[1,2,3]"),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            SimplePriceResponse::parse("not json"),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn empty_object_is_malformed() {
        assert!(matches!(
            SimplePriceResponse::parse("{}"),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn negative_price_is_malformed() {
        let body = r#"{"bitcoin":{"usd":-3}}"#;
        assert!(matches!(
            SimplePriceResponse::parse(body),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn from_entries_validates_decoded_map() {
        let mut raw = BTreeMap::new();
        raw.insert("bitcoin".to_string(), SimplePrice { usd: 2.0 });
        let r = SimplePriceResponse::from_entries(raw.clone()).unwrap();
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![("bitcoin", 2.0)]);

        raw.insert("ethereum".to_string(), SimplePrice { usd: f64::NAN });
        assert!(matches!(
            SimplePriceResponse::from_entries(raw),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            SimplePriceResponse::from_entries(BTreeMap::new()),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn offline_api_keeps_defaults() {
        let err = FetchError::Transport("no TLS backend".into());
        let defaults = DefaultQuoteTable::builtin();
        let ids = defaults.table().ids();
        let mut source =
            PriceSource::new(OfflineApi(err.clone()), ids, Duration::from_secs(30), defaults);

        assert_eq!(source.fetch_at(Instant::now()), FetchOutcome::Failed(err));
        assert_eq!(source.quotes(), DefaultQuoteTable::builtin().table());
        assert!(source.last_fetch().is_none());
    }
}
