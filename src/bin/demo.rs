//! Offline demo: the real widget fed by an in-process random walk instead
//! of the CoinGecko API.  Prices drift a little on every fetch, roughly one
//! in five fetches fails so the stale-data path is visible too.
//!
//! Run with:
//!     RUST_LOG=debug cargo run --bin cryptogrid-demo
//!
//! Right-click (Ctrl-click on macOS) and pick "Close" to quit.

use cryptogrid::api::{FetchError, SimplePriceResponse};
use cryptogrid::config::WidgetConfig;
use cryptogrid::platform::Platform;
use cryptogrid::quote::DefaultQuoteTable;
use cryptogrid::refresh::Countdown;
use cryptogrid::source::PriceSource;
use cryptogrid::traits::PriceApi;
use cryptogrid::widget::WidgetState;
use rand::Rng;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::time::Duration;

/// Seconds between fetches; short so the demo is lively.
const INTERVAL_SECS: u64 = 5;
/// Max relative price move per fetch.
const MAX_STEP: f64 = 0.03;
const FAILURE_RATE: f64 = 0.2;

/// Random-walk price feed seeded from the built-in defaults.
struct RandomWalkApi {
    prices: RefCell<BTreeMap<String, f64>>,
}

impl RandomWalkApi {
    fn new(defaults: &DefaultQuoteTable) -> Self {
        Self {
            prices: RefCell::new(
                defaults
                    .table()
                    .iter()
                    .map(|q| (q.id.clone(), q.price))
                    .collect(),
            ),
        }
    }
}

impl PriceApi for RandomWalkApi {
    fn simple_price(&self, ids: &[String]) -> Result<SimplePriceResponse, FetchError> {
        let mut rng = rand::thread_rng();
        if rng.gen_bool(FAILURE_RATE) {
            return Err(FetchError::Status(429));
        }
        let mut prices = self.prices.borrow_mut();
        let quotes: Vec<(String, f64)> = ids
            .iter()
            .filter_map(|id| {
                let price = prices.get_mut(id)?;
                *price *= 1.0 + rng.gen_range(-MAX_STEP..=MAX_STEP);
                Some((id.clone(), *price))
            })
            .collect();
        Ok(SimplePriceResponse::new(quotes))
    }
}

fn main() {
    env_logger::init();

    let defaults = DefaultQuoteTable::builtin();
    let api = RandomWalkApi::new(&defaults);
    let interval = Duration::from_secs(INTERVAL_SECS);
    let source = PriceSource::new(api, defaults.table().ids(), interval, defaults);
    let state = WidgetState::new(source, Countdown::new(interval));

    let config = WidgetConfig {
        title: "cryptogrid demo".into(),
        ..WidgetConfig::default()
    };

    eprintln!("Demo widget running: prices random-walk every {}s.", INTERVAL_SECS);
    if let Err(e) = cryptogrid::widget::gtk::run_main_loop(
        state,
        interval,
        &config,
        Platform::detect(None),
        None,
    ) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
