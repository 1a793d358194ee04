//! Entry point for the **cryptogrid** widget.
//!
//! Takes no command-line arguments: it loads the optional config file,
//! builds the price source on top of the CoinGecko API and hands it to the
//! widget host.
//!
//! When the `widget-gtk` feature is enabled the main thread runs the GLib
//! main loop (GTK4 requires it) and both timers are driven from there.
//! Without the feature, a simple blocking loop fetches and logs instead.

use cryptogrid::api::coingecko::CoinGeckoApi;
use cryptogrid::api::OfflineApi;
use cryptogrid::config::Config;
use cryptogrid::quote::DefaultQuoteTable;
use cryptogrid::refresh::Countdown;
use cryptogrid::source::PriceSource;
use cryptogrid::traits::PriceApi;
use cryptogrid::widget::WidgetState;
use log::{error, info};

/// Resolve the config directory (`$XDG_CONFIG_HOME/cryptogrid`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("cryptogrid")
}

/// Try to load the config from `$XDG_CONFIG_HOME/cryptogrid/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

/// Resolve the CSS stylesheet path.
#[cfg(feature = "widget-gtk")]
fn css_path() -> std::path::PathBuf {
    config_dir().join("style.css")
}

//  Main

fn main() {
    env_logger::init();

    let config = load_config();

    let api: Box<dyn PriceApi> = match CoinGeckoApi::new(config.source.api_url.clone()) {
        Ok(api) => {
            info!(
                "tracking {} asset(s) via {}",
                config.source.assets.len(),
                api.url()
            );
            Box::new(api)
        }
        Err(e) => {
            error!("failed to create HTTP client, showing defaults only: {}", e);
            Box::new(OfflineApi(e))
        }
    };

    let source = PriceSource::new(
        api,
        config.source.assets.clone(),
        config.source.cache_window(),
        DefaultQuoteTable::builtin(),
    );
    let state = WidgetState::new(source, Countdown::new(config.refresh.interval()));

    start_event_loop(state, config);
}

//  Event loops

#[cfg(feature = "widget-gtk")]
fn start_event_loop(state: WidgetState<Box<dyn PriceApi>>, config: Config) {
    let platform = cryptogrid::platform::Platform::detect(config.widget.borderless);
    if let Err(e) = cryptogrid::widget::gtk::run_main_loop(
        state,
        config.refresh.interval(),
        &config.widget,
        platform,
        Some(css_path()),
    ) {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "widget-gtk"))]
fn start_event_loop(mut state: WidgetState<Box<dyn PriceApi>>, config: Config) {
    let interval = config.refresh.interval();
    let (width, height) = (config.widget.width as f64, config.widget.height as f64);
    info!("cryptogrid running headless");
    loop {
        let outcome = state.refresh();
        let commands = state.draw_commands(width, height);
        info!(
            "{:?}: {} quote(s), {} draw command(s)",
            outcome,
            state.source().quotes().len(),
            commands.len()
        );
        for quote in state.source().quotes().sorted_by_price() {
            info!(
                "  {:<4} {:>8} {:>14}",
                quote.symbol,
                cryptogrid::render::format_change(quote.percent_change),
                cryptogrid::render::format_price(quote.price)
            );
        }
        std::thread::sleep(interval);
    }
}
