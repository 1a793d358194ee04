//! **cryptogrid**: a desktop heatmap of cryptocurrency prices.
//!
//! A fixed list of assets is polled from a public price API and drawn as a
//! near-square grid of coloured cells, highest price first.  Green cells
//! gained, red cells lost.
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! * [`source::PriceSource`] keeps the current [`quote::QuoteTable`] fresh
//!   through the [`traits::PriceApi`] seam, with a cache window and
//!   stale-on-failure semantics.
//! * [`render::render`] is a pure function from a quote table and a
//!   surface size to a list of draw commands, laid out by [`grid`].
//!
//! [`widget`] glues both to a window and two timers (data refresh and a
//! one-second [`refresh::Countdown`]).  The concrete CoinGecko client lives
//! in [`api::coingecko`].

pub mod api;
pub mod config;
pub mod grid;
pub mod platform;
pub mod quote;
pub mod refresh;
pub mod render;
pub mod source;
pub mod traits;
pub mod widget;
