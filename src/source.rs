//! The price source: a cached view over a [`PriceApi`].
//!
//! [`PriceSource`] owns the current [`QuoteTable`].  It starts out as the
//! injected [`DefaultQuoteTable`], is replaced wholesale on every successful
//! network fetch, and is left untouched when a fetch fails.

use crate::api::FetchError;
use crate::quote::{AssetQuote, DefaultQuoteTable, QuoteTable};
use crate::traits::PriceApi;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Bounds of the synthetic percent change assigned to fetched quotes.
pub const CHANGE_RANGE: f64 = 5.0;

/// What a single [`PriceSource::fetch_at`] call did.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The cache window had not expired; no request was made.
    Cached,
    /// A request succeeded and the table was replaced.
    Fetched,
    /// A request was made and failed; the table is unchanged.
    Failed(FetchError),
}

/// Cached, failure-tolerant access to a [`PriceApi`].
///
/// The upstream endpoint only reports prices, so the percent change of
/// every fetched quote is a fresh uniform random value in
/// `[-CHANGE_RANGE, CHANGE_RANGE]` drawn from the injected RNG.  It is a
/// placeholder and carries no market information.
pub struct PriceSource<A: PriceApi, R: Rng = StdRng> {
    api: A,
    assets: Vec<String>,
    cache_window: Duration,
    quotes: QuoteTable,
    last_fetch: Option<Instant>,
    rng: R,
}

impl<A: PriceApi> PriceSource<A, StdRng> {
    /// Create a source seeded from OS entropy.
    ///
    /// `assets` are requested in one batch per fetch; `cache_window` is the
    /// minimum time between two real network requests.
    pub fn new(
        api: A,
        assets: Vec<String>,
        cache_window: Duration,
        defaults: DefaultQuoteTable,
    ) -> Self {
        Self::with_rng(api, assets, cache_window, defaults, StdRng::from_entropy())
    }
}

impl<A: PriceApi, R: Rng> PriceSource<A, R> {
    /// Create a source drawing synthetic changes from `rng`.
    pub fn with_rng(
        api: A,
        assets: Vec<String>,
        cache_window: Duration,
        defaults: DefaultQuoteTable,
        rng: R,
    ) -> Self {
        Self {
            api,
            assets,
            cache_window,
            quotes: defaults.into_table(),
            last_fetch: None,
            rng,
        }
    }

    /// The current quote table.
    pub fn quotes(&self) -> &QuoteTable {
        &self.quotes
    }

    /// The asset ids requested on every fetch.
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// When the last successful network fetch happened, if ever.
    pub fn last_fetch(&self) -> Option<Instant> {
        self.last_fetch
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch using the current time and return the resulting table.
    pub fn fetch(&mut self) -> &QuoteTable {
        self.fetch_at(Instant::now());
        &self.quotes
    }

    /// Refresh the table as of `now`.
    ///
    /// Never fails: errors are logged and reported through
    /// [`FetchOutcome::Failed`] while the cached table stays as it was.
    pub fn fetch_at(&mut self, now: Instant) -> FetchOutcome {
        if let Some(last) = self.last_fetch {
            let age = now.saturating_duration_since(last);
            if age < self.cache_window {
                info!("using cached data ({}s old)", age.as_secs());
                return FetchOutcome::Cached;
            }
        }

        debug!("requesting {} asset(s) from API", self.assets.len());
        let response = match self.api.simple_price(&self.assets) {
            Ok(r) => r,
            Err(e) => {
                warn!("error: {}", e);
                return FetchOutcome::Failed(e);
            }
        };

        let table: QuoteTable = response
            .iter()
            .map(|(id, usd)| {
                let change = self.rng.gen_range(-CHANGE_RANGE..=CHANGE_RANGE);
                AssetQuote::new(id, usd, change, AssetQuote::symbol_for(id))
            })
            .collect();

        info!("fetched {} quote(s)", table.len());
        self.quotes = table;
        self.last_fetch = Some(now);
        FetchOutcome::Fetched
    }
}
