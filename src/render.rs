//! Heatmap renderer.
//!
//! [`render`] turns a [`QuoteTable`] and a surface size into a flat list of
//! [`DrawCommand`]s.  It is a pure function: the host executes the commands
//! after clearing the surface, so every pass is a full redraw.
//!
//! Each quote gets one cell, highest price first:
//!
//! ```text
//! ┌──────────┬──────────┐
//! │   BIT    │   ETH    │   1/4  symbol
//! │  +2.87%  │  +0.57%  │   1/2  change
//! │$20,000.00│$1,500.00 │   3/4  price
//! ├──────────┼──────────┤
//! │   …      │          │
//! ```

use crate::grid::{GridLayout, Rect};
use crate::quote::{AssetQuote, QuoteTable};
use log::debug;

/// Upper bound on the label font size, in points.
pub const MAX_TEXT_SIZE: f64 = 20.0;
/// How much smaller the price line is than the other two.
pub const PRICE_TEXT_SHRINK: u32 = 2;

/// An sRGB colour with components in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Window and cell-outline background.
    pub const BACKGROUND: Color = Color::rgb(0x1e, 0x1e, 0x1e);
    /// Cell fill for a non-negative change.
    pub const GAIN: Color = Color::rgb(0x00, 0x80, 0x00);
    /// Cell fill for a negative change.
    pub const LOSS: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const TEXT: Color = Color::rgb(0xff, 0xff, 0xff);
}

/// A single drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill `rect` and stroke its outline.
    Rect {
        rect: Rect,
        fill: Color,
        outline: Color,
        outline_width: f64,
    },
    /// Bold text centred on `(x, y)`.
    Text {
        x: f64,
        y: f64,
        text: String,
        size: u32,
        color: Color,
    },
}

/// Render at the default text scale.
pub fn render(quotes: &QuoteTable, width: f64, height: f64) -> Vec<DrawCommand> {
    render_scaled(quotes, width, height, 1.0)
}

/// Render with label sizes multiplied by `text_scale`.
///
/// Emits nothing while the surface is unsized (either side `<= 1`) or the
/// table is empty.
pub fn render_scaled(
    quotes: &QuoteTable,
    width: f64,
    height: f64,
    text_scale: f64,
) -> Vec<DrawCommand> {
    if width <= 1.0 || height <= 1.0 {
        debug!("surface not ready ({}x{}), skipping render", width, height);
        return Vec::new();
    }
    let layout = match GridLayout::new(quotes.len(), width, height) {
        Some(l) => l,
        None => {
            debug!("no quotes to render");
            return Vec::new();
        }
    };
    debug!(
        "rendering {} quote(s) on {}x{} as {}x{} grid",
        quotes.len(),
        width,
        height,
        layout.size(),
        layout.size()
    );

    let mut commands = Vec::with_capacity(quotes.len() * 4);
    for (i, quote) in quotes.sorted_by_price().into_iter().enumerate() {
        draw_cell(&mut commands, layout.cell(i), quote, text_scale);
    }
    commands
}

fn draw_cell(out: &mut Vec<DrawCommand>, rect: Rect, quote: &AssetQuote, text_scale: f64) {
    out.push(DrawCommand::Rect {
        rect,
        fill: cell_color(quote.percent_change),
        outline: Color::BACKGROUND,
        outline_width: 1.0,
    });

    let size = text_size(rect.width, rect.height, &quote.symbol, text_scale);
    let x = rect.center_x();
    let lines = [
        (0.25, quote.symbol.clone(), size),
        (0.5, format_change(quote.percent_change), size),
        (0.75, format_price(quote.price), size.saturating_sub(PRICE_TEXT_SHRINK)),
    ];
    for (fraction, text, size) in lines {
        out.push(DrawCommand::Text {
            x,
            y: rect.y_at(fraction),
            text,
            size,
            color: Color::TEXT,
        });
    }
}

/// Green for a non-negative change, red otherwise.
pub fn cell_color(percent_change: f64) -> Color {
    if percent_change >= 0.0 {
        Color::GAIN
    } else {
        Color::LOSS
    }
}

/// `floor(min(h / 5, w / symbol_len, 20) * scale)`.
pub fn text_size(cell_width: f64, cell_height: f64, symbol: &str, scale: f64) -> u32 {
    let symbol_len = symbol.chars().count().max(1) as f64;
    let base = (cell_height / 5.0)
        .min(cell_width / symbol_len)
        .min(MAX_TEXT_SIZE);
    (base * scale).floor().max(0.0) as u32
}

/// Signed change with two decimals, e.g. `+1.50%` or `-0.25%`.
pub fn format_change(percent_change: f64) -> String {
    let sign = if percent_change >= 0.0 { '+' } else { '-' };
    format!("{}{:.2}%", sign, percent_change.abs())
}

/// USD price with thousands separators, e.g. `$12,345.68`.
pub fn format_price(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::grid_size;
    use crate::quote::DefaultQuoteTable;

    fn table(rows: &[(&str, f64, f64)]) -> QuoteTable {
        rows.iter()
            .map(|(id, price, change)| {
                AssetQuote::new(*id, *price, *change, AssetQuote::symbol_for(id))
            })
            .collect()
    }

    fn rects(cmds: &[DrawCommand]) -> Vec<(Rect, Color)> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { rect, fill, .. } => Some((*rect, *fill)),
                _ => None,
            })
            .collect()
    }

    fn texts(cmds: &[DrawCommand]) -> Vec<(String, u32)> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, size, .. } => Some((text.clone(), *size)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn two_quotes_on_square_surface() {
        let q = table(&[("aaa", 100.0, 1.0), ("bbb", 50.0, -1.0)]);
        let cmds = render(&q, 200.0, 200.0);
        let r = rects(&cmds);
        assert_eq!(r.len(), 2, "bottom row stays undrawn");
        assert_eq!(r[0], (Rect::new(0.0, 0.0, 100.0, 100.0), Color::GAIN));
        assert_eq!(r[1], (Rect::new(100.0, 0.0, 100.0, 100.0), Color::LOSS));
        assert!(r.iter().all(|(rect, _)| rect.y < 100.0));
    }

    #[test]
    fn nine_quotes_fill_three_by_three() {
        let rows: Vec<(String, f64, f64)> =
            (0..9).map(|i| (format!("c{}", i), i as f64, 0.0)).collect();
        let q: QuoteTable = rows
            .iter()
            .map(|(id, p, c)| AssetQuote::new(id.clone(), *p, *c, "X"))
            .collect();
        let r = rects(&render(&q, 300.0, 300.0));
        assert_eq!(r.len(), 9);
        for row in 0..3 {
            for col in 0..3 {
                let origin = (col as f64 * 100.0, row as f64 * 100.0);
                assert!(
                    r.iter().any(|(rect, _)| (rect.x, rect.y) == origin),
                    "cell ({}, {}) not drawn",
                    row,
                    col
                );
            }
        }
    }

    #[test]
    fn degenerate_surface_renders_nothing() {
        let q = DefaultQuoteTable::builtin();
        assert!(render(q.table(), 1.0, 400.0).is_empty());
        assert!(render(q.table(), 400.0, 1.0).is_empty());
        assert!(render(q.table(), 0.0, 0.0).is_empty());
    }

    #[test]
    fn empty_table_renders_nothing() {
        assert!(render(&QuoteTable::new(), 400.0, 400.0).is_empty());
    }

    #[test]
    fn higher_price_gets_lower_index() {
        let q = table(&[
            ("low", 1.0, 0.0),
            ("high", 1000.0, 0.0),
            ("mid", 10.0, 0.0),
            ("top", 5000.0, 0.0),
            ("tiny", 0.01, 0.0),
        ]);
        let symbols: Vec<String> = texts(&render(&q, 300.0, 300.0))
            .into_iter()
            .step_by(3)
            .map(|(t, _)| t)
            .collect();
        assert_eq!(symbols, vec!["TOP", "HIG", "MID", "LOW", "TIN"]);
    }

    #[test]
    fn only_occupied_cells_are_drawn() {
        for n in 1..=20usize {
            let q: QuoteTable = (0..n)
                .map(|i| AssetQuote::new(format!("a{:02}", i), (n - i) as f64, 0.0, "A"))
                .collect();
            let cmds = render(&q, 500.0, 500.0);
            let r = rects(&cmds);
            let s = grid_size(n);
            assert_eq!(r.len(), n);
            assert_eq!(cmds.len(), n * 4);
            let cell = 500.0 / s as f64;
            for (i, (rect, _)) in r.iter().enumerate() {
                assert_eq!(rect.x, (i % s) as f64 * cell);
                assert_eq!(rect.y, (i / s) as f64 * cell);
            }
        }
    }

    #[test]
    fn labels_are_stacked_and_centred() {
        let q = table(&[("bitcoin", 64000.0, 2.5)]);
        let cmds = render(&q, 200.0, 400.0);
        let ys: Vec<(f64, f64)> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .collect();
        assert_eq!(ys, vec![(100.0, 100.0), (100.0, 200.0), (100.0, 300.0)]);
        assert_eq!(
            texts(&cmds),
            vec![
                ("BIT".to_string(), 20),
                ("+2.50%".to_string(), 20),
                ("$64,000.00".to_string(), 18),
            ]
        );
    }

    #[test]
    fn text_size_is_capped_and_floored() {
        assert_eq!(text_size(1000.0, 1000.0, "BTC", 1.0), 20);
        assert_eq!(text_size(100.0, 52.0, "BTC", 1.0), 10);
        assert_eq!(text_size(31.0, 500.0, "BTC", 1.0), 10);
        assert_eq!(text_size(100.0, 100.0, "", 1.0), 20);
    }

    #[test]
    fn text_scale_multiplies_size() {
        assert_eq!(text_size(1000.0, 1000.0, "BTC", 1.5), 30);
        assert_eq!(text_size(100.0, 52.0, "BTC", 0.5), 5);
    }

    #[test]
    fn tiny_cells_do_not_underflow_price_size() {
        let q = table(&[("bitcoin", 1.0, 0.0)]);
        let t = texts(&render(&q, 4.0, 4.0));
        assert_eq!(t[0].1, 0);
        assert_eq!(t[2].1, 0);
    }

    #[test]
    fn change_formatting() {
        assert_eq!(format_change(1.0), "+1.00%");
        assert_eq!(format_change(0.0), "+0.00%");
        assert_eq!(format_change(-2.346), "-2.35%");
        assert_eq!(format_change(4.999), "+5.00%");
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(0.06), "$0.06");
        assert_eq!(format_price(150.0), "$150.00");
        assert_eq!(format_price(1500.0), "$1,500.00");
        assert_eq!(format_price(20000.0), "$20,000.00");
        assert_eq!(format_price(1234567.891), "$1,234,567.89");
        assert_eq!(format_price(999.999), "$1,000.00");
    }

    #[test]
    fn every_cell_has_background_outline() {
        let cmds = render(DefaultQuoteTable::builtin().table(), 400.0, 300.0);
        let outlines: Vec<(Color, f64)> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect {
                    outline,
                    outline_width,
                    ..
                } => Some((*outline, *outline_width)),
                _ => None,
            })
            .collect();
        assert_eq!(outlines.len(), 11);
        assert!(outlines.iter().all(|o| *o == (Color::BACKGROUND, 1.0)));
    }

    #[test]
    fn zero_change_is_green() {
        assert_eq!(cell_color(0.0), Color::GAIN);
        assert_eq!(cell_color(-0.01), Color::LOSS);
    }
}
