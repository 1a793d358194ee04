//! Quote data model.
//!
//! A [`QuoteTable`] maps asset ids to their latest [`AssetQuote`].  It is
//! backed by a [`BTreeMap`] so iteration order is deterministic; the
//! renderer re-sorts by price on every pass anyway.

use std::collections::BTreeMap;

/// Price, change and display symbol of one asset at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetQuote {
    /// Asset identifier as understood by the price API (e.g. `"bitcoin"`).
    pub id: String,
    /// Price in USD.  Never negative.
    pub price: f64,
    /// Signed percent change.
    pub percent_change: f64,
    /// Short display symbol (3-4 characters).
    pub symbol: String,
}

impl AssetQuote {
    pub fn new(
        id: impl Into<String>,
        price: f64,
        percent_change: f64,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            price,
            percent_change,
            symbol: symbol.into(),
        }
    }

    /// Derive a display symbol from an asset id: the first three
    /// characters, upper-cased.
    pub fn symbol_for(id: &str) -> String {
        id.chars().take(3).flat_map(|c| c.to_uppercase()).collect()
    }
}

/// Mapping from asset id to [`AssetQuote`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteTable {
    inner: BTreeMap<String, AssetQuote>,
}

impl QuoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the quote for `quote.id`.
    pub fn insert(&mut self, quote: AssetQuote) {
        self.inner.insert(quote.id.clone(), quote);
    }

    pub fn get(&self, id: &str) -> Option<&AssetQuote> {
        self.inner.get(id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate quotes in asset-id order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetQuote> {
        self.inner.values()
    }

    /// All asset ids in the table.
    pub fn ids(&self) -> Vec<String> {
        self.inner.keys().cloned().collect()
    }

    /// Quotes sorted by price, highest first.  Equal prices fall back to
    /// ascending asset id.
    pub fn sorted_by_price(&self) -> Vec<&AssetQuote> {
        let mut quotes: Vec<&AssetQuote> = self.inner.values().collect();
        quotes.sort_by(|a, b| b.price.total_cmp(&a.price).then_with(|| a.id.cmp(&b.id)));
        quotes
    }
}

impl FromIterator<AssetQuote> for QuoteTable {
    fn from_iter<I: IntoIterator<Item = AssetQuote>>(iter: I) -> Self {
        let mut table = Self::new();
        for quote in iter {
            table.insert(quote);
        }
        table
    }
}

/// The built-in table shown before the first successful fetch.
///
/// Retained indefinitely if every fetch fails.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultQuoteTable(QuoteTable);

impl DefaultQuoteTable {
    /// Wrap an arbitrary table as the fallback.
    pub fn new(table: QuoteTable) -> Self {
        Self(table)
    }

    /// The compiled-in placeholder values.
    pub fn builtin() -> Self {
        let rows: [(&str, f64, f64, &str); 11] = [
            ("bitcoin", 20000.0, 2.87, "BIT"),
            ("ethereum", 1500.0, 0.57, "ETH"),
            ("dogecoin", 0.06, -2.33, "DOG"),
            ("ripple", 0.3, 0.77, "RIP"),
            ("litecoin", 60.0, -3.63, "LIT"),
            ("polkadot", 5.0, -2.04, "POL"),
            ("cardano", 0.35, 2.04, "CAR"),
            ("solana", 20.0, -2.62, "SOL"),
            ("tron", 0.08, 1.97, "TRO"),
            ("monero", 150.0, 3.06, "MON"),
            ("shiba-inu", 1.0, -4.46, "XRP"),
        ];
        Self(
            rows.into_iter()
                .map(|(id, price, change, symbol)| AssetQuote::new(id, price, change, symbol))
                .collect(),
        )
    }

    pub fn table(&self) -> &QuoteTable {
        &self.0
    }

    pub fn into_table(self) -> QuoteTable {
        self.0
    }
}

impl Default for DefaultQuoteTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_is_first_three_chars_uppercased() {
        assert_eq!(AssetQuote::symbol_for("bitcoin"), "BIT");
        assert_eq!(AssetQuote::symbol_for("shiba-inu"), "SHI");
        assert_eq!(AssetQuote::symbol_for("op"), "OP");
    }

    #[test]
    fn insert_replaces_existing_id() {
        let mut t = QuoteTable::new();
        t.insert(AssetQuote::new("btc", 1.0, 0.0, "BTC"));
        t.insert(AssetQuote::new("btc", 2.0, 0.0, "BTC"));
        assert_eq!(t.len(), 1);
        assert_eq!(t.get("btc").unwrap().price, 2.0);
    }

    #[test]
    fn sorted_by_price_descending() {
        let t: QuoteTable = vec![
            AssetQuote::new("a", 1.0, 0.0, "A"),
            AssetQuote::new("b", 300.0, 0.0, "B"),
            AssetQuote::new("c", 20.0, 0.0, "C"),
        ]
        .into_iter()
        .collect();
        let ids: Vec<&str> = t.sorted_by_price().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn equal_prices_tie_break_by_id() {
        let t: QuoteTable = vec![
            AssetQuote::new("zeta", 5.0, 0.0, "ZET"),
            AssetQuote::new("alpha", 5.0, 0.0, "ALP"),
            AssetQuote::new("mid", 5.0, 0.0, "MID"),
        ]
        .into_iter()
        .collect();
        let ids: Vec<&str> = t.sorted_by_price().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn builtin_defaults_cover_eleven_assets() {
        let d = DefaultQuoteTable::builtin();
        assert_eq!(d.table().len(), 11);
        let btc = d.table().get("bitcoin").unwrap();
        assert_eq!(btc.price, 20000.0);
        assert_eq!(btc.symbol, "BIT");
        assert!(d.table().iter().all(|q| q.price >= 0.0));
    }
}
