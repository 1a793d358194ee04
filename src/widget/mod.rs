//! The heatmap widget.
//!
//! [`WidgetState`] holds everything the timers, the draw function and the
//! pointer handlers share: the price source, the countdown and the zoom
//! level.  It is toolkit-agnostic; when the `widget-gtk` feature is enabled
//! [`gtk::run_main_loop`] hosts it in a GTK4 window.

#[cfg(feature = "widget-gtk")]
pub mod gtk;

use crate::refresh::Countdown;
use crate::render::{render_scaled, DrawCommand};
use crate::source::{FetchOutcome, PriceSource};
use crate::traits::PriceApi;
use rand::Rng;
use std::time::Instant;

/// Multiplicative zoom step per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;
pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 3.0;

/// Text zoom driven by the mouse wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    scale: f64,
}

impl Default for Zoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Zoom {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Apply one scroll event.  `delta < 0` (wheel up) zooms in, `delta > 0`
    /// zooms out, zero is ignored.
    pub fn scroll(&mut self, delta: f64) -> f64 {
        if delta < 0.0 {
            self.scale *= ZOOM_STEP;
        } else if delta > 0.0 {
            self.scale /= ZOOM_STEP;
        }
        self.scale = self.scale.clamp(ZOOM_MIN, ZOOM_MAX);
        self.scale
    }
}

/// Window position tracker for pointer drags.
///
/// Each drag update reports the pointer offset relative to where the
/// pointer sits inside the (already moved) window, so the offsets are
/// accumulated onto the position rather than applied to the drag origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDrag {
    x: i32,
    y: i32,
}

impl WindowDrag {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Move by `(dx, dy)` and return the new position.
    pub fn apply(&mut self, dx: f64, dy: f64) -> (i32, i32) {
        self.x += dx.round() as i32;
        self.y += dy.round() as i32;
        (self.x, self.y)
    }
}

/// Shared state of a running widget.
pub struct WidgetState<A: PriceApi, R: Rng = rand::rngs::StdRng> {
    source: PriceSource<A, R>,
    countdown: Countdown,
    zoom: Zoom,
}

impl<A: PriceApi, R: Rng> WidgetState<A, R> {
    pub fn new(source: PriceSource<A, R>, countdown: Countdown) -> Self {
        Self {
            source,
            countdown,
            zoom: Zoom::default(),
        }
    }

    pub fn source(&self) -> &PriceSource<A, R> {
        &self.source
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    /// Data timer body: fetch, and restart the countdown on a real success.
    pub fn refresh(&mut self) -> FetchOutcome {
        self.refresh_at(Instant::now())
    }

    pub fn refresh_at(&mut self, now: Instant) -> FetchOutcome {
        let outcome = self.source.fetch_at(now);
        self.countdown.observe(&outcome);
        outcome
    }

    /// Countdown timer body.
    pub fn tick(&mut self) -> &str {
        self.countdown.tick()
    }

    /// Mouse wheel handler.
    pub fn scroll(&mut self, delta: f64) -> f64 {
        self.zoom.scroll(delta)
    }

    /// Full render pass for a surface of `width × height`.
    pub fn draw_commands(&self, width: f64, height: f64) -> Vec<DrawCommand> {
        render_scaled(self.source.quotes(), width, height, self.zoom.scale())
    }
}
