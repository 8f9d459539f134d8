//! Dashboard layout: which symbols are fetched and how they are grouped.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

const GLOBAL_MARKETS: &[(&str, &str)] = &[
    ("S&P500", "^GSPC"),
    ("NASDAQ", "^IXIC"),
    ("DOW", "^DJI"),
    ("NIKKEI", "^N225"),
    ("HANG SENG", "^HSI"),
    ("DAX", "^GDAXI"),
    ("FTSE", "^FTSE"),
];

const INDIA_MARKETS: &[(&str, &str)] = &[
    ("GIFT NIFTY", "^NIFTY_GIFT"),
    ("NIFTY", "^NSEI"),
    ("BANKNIFTY", "^NSEBANK"),
    ("SENSEX", "^BSESN"),
    ("VIX", "^INDIAVIX"),
    ("USDINR", "USDINR=X"),
];

const BONDS_COMMODITIES: &[(&str, &str)] = &[
    ("US10Y", "^TNX"),
    ("GOLD", "GC=F"),
    ("SILVER", "SI=F"),
    ("CRUDE", "CL=F"),
    ("COPPER", "HG=F"),
    ("URANIUM ETF", "URA"),
];

const NIFTY_50: &[&str] = &[
    "ADANIENT", "ADANIPORTS", "APOLLOHOSP", "ASIANPAINT", "AXISBANK", "BAJAJ-AUTO",
    "BAJFINANCE", "BAJAJFINSV", "BPCL", "BHARTIARTL", "BRITANNIA", "CIPLA", "COALINDIA",
    "DIVISLAB", "DRREDDY", "EICHERMOT", "GRASIM", "HCLTECH", "HDFCBANK", "HDFCLIFE",
    "HEROMOTOCO", "HINDALCO", "HINDUNILVR", "ICICIBANK", "ITC", "INDUSINDBK", "INFY",
    "JSWSTEEL", "KOTAKBANK", "LT", "LTIM", "M&M", "MARUTI", "NESTLEIND", "NTPC", "ONGC",
    "POWERGRID", "RELIANCE", "SBIN", "SUNPHARMA", "TATACONSUM", "TATAMOTORS",
    "TATASTEEL", "TECHM", "TITAN", "ULTRACEMCO", "UPL", "WIPRO",
];

const NIFTY_NEXT_50: &[&str] = &[
    "ABB", "ADANIGREEN", "ALKEM", "AMBUJACEM", "AUROPHARMA", "BERGEPAINT", "BIOCON",
    "BOSCHLTD", "CANBK", "COLPAL", "CONCOR", "DABUR", "DLF", "GAIL", "GODREJCP",
    "HAVELLS", "HDFCAMC", "ICICIGI", "IGL", "INDIGO", "LUPIN", "MARICO", "MOTHERSON",
    "MUTHOOTFIN", "NAUKRI", "NMDC", "PAGEIND", "PEL", "PETRONET", "PIDILITIND", "PNB",
    "SHREECEM", "SIEMENS", "SRF", "TORNTPHARM", "TRENT", "TVSMOTOR", "UBL", "VEDL",
    "VOLTAS", "ZEEL", "ZYDUSLIFE",
];

const NSE_SUFFIX: &str = ".NS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub name: String,
    pub symbol: String,
}

/// A simple category table (no weighting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDef {
    pub label: String,
    pub entries: Vec<SymbolEntry>,
}

/// A capitalization-weighted equity universe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketDef {
    pub label: String,
    pub tickers: Vec<String>,
    /// Appended to a ticker to form its market-data symbol
    #[serde(default)]
    pub symbol_suffix: String,
    /// Per-ticker fractions used when no capitalization is known
    #[serde(default)]
    pub fallback_weights: BTreeMap<String, Decimal>,
}

impl BasketDef {
    pub fn symbol_for(&self, ticker: &str) -> String {
        format!("{}{}", ticker, self.symbol_suffix)
    }

    pub fn entries(&self) -> Vec<SymbolEntry> {
        self.tickers
            .iter()
            .map(|t| SymbolEntry {
                name: t.clone(),
                symbol: self.symbol_for(t),
            })
            .collect()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.tickers.iter().map(|t| self.symbol_for(t)).collect()
    }

    /// Fallback weights re-keyed by market-data symbol
    pub fn fallback_by_symbol(&self) -> BTreeMap<String, Decimal> {
        self.fallback_weights
            .iter()
            .map(|(ticker, w)| (self.symbol_for(ticker), *w))
            .collect()
    }
}

/// The three instruments behind the mood score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodSymbols {
    pub volatility: String,
    pub bond_yield: String,
    pub equity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsFeed {
    pub category: String,
    pub feed_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardLayout {
    pub groups: Vec<GroupDef>,
    pub baskets: Vec<BasketDef>,
    pub mood: MoodSymbols,
    #[serde(default)]
    pub news_feeds: Vec<NewsFeed>,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        Self {
            groups: vec![
                group("Global Markets", GLOBAL_MARKETS),
                group("India Markets", INDIA_MARKETS),
                group("Bonds & Commodities", BONDS_COMMODITIES),
            ],
            baskets: vec![basket("NIFTY 50", NIFTY_50), basket("NIFTY NEXT 50", NIFTY_NEXT_50)],
            mood: MoodSymbols {
                volatility: "^INDIAVIX".to_string(),
                bond_yield: "^TNX".to_string(),
                equity: "^NSEI".to_string(),
            },
            news_feeds: vec![
                feed("India Markets", "indian stock market"),
                feed("Global Markets", "global stock markets"),
                feed("Economy", "rbi fed inflation economy"),
            ],
        }
    }
}

impl DashboardLayout {
    /// Every symbol whose price is needed, deduplicated, in first-seen order
    pub fn price_symbols(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mood = [&self.mood.volatility, &self.mood.bond_yield, &self.mood.equity];

        self.groups
            .iter()
            .flat_map(|g| g.entries.iter().map(|e| e.symbol.clone()))
            .chain(self.baskets.iter().flat_map(|b| b.symbols()))
            .chain(mood.into_iter().cloned())
            .filter(|s| seen.insert(s.clone()))
            .collect()
    }
}

fn group(label: &str, entries: &[(&str, &str)]) -> GroupDef {
    GroupDef {
        label: label.to_string(),
        entries: entries
            .iter()
            .map(|(name, symbol)| SymbolEntry {
                name: name.to_string(),
                symbol: symbol.to_string(),
            })
            .collect(),
    }
}

fn basket(label: &str, tickers: &[&str]) -> BasketDef {
    BasketDef {
        label: label.to_string(),
        tickers: tickers.iter().map(|t| t.to_string()).collect(),
        symbol_suffix: NSE_SUFFIX.to_string(),
        fallback_weights: BTreeMap::new(),
    }
}

fn feed(category: &str, feed_id: &str) -> NewsFeed {
    NewsFeed {
        category: category.to_string(),
        feed_id: feed_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = DashboardLayout::default();
        assert_eq!(layout.groups.len(), 3);
        assert_eq!(layout.baskets[0].label, "NIFTY 50");
        assert_eq!(layout.baskets[0].symbol_for("RELIANCE"), "RELIANCE.NS");
    }

    #[test]
    fn test_price_symbols_deduplicated() {
        let layout = DashboardLayout::default();
        let symbols = layout.price_symbols();

        // ^INDIAVIX, ^TNX and ^NSEI appear in both groups and mood
        let unique: HashSet<&String> = symbols.iter().collect();
        assert_eq!(unique.len(), symbols.len());
        assert_eq!(symbols[0], "^GSPC");
        assert!(symbols.contains(&"ZYDUSLIFE.NS".to_string()));
    }

    #[test]
    fn test_fallback_rekeyed_by_symbol() {
        let mut b = basket("Mini", &["ITC"]);
        b.fallback_weights.insert("ITC".to_string(), Decimal::ONE);
        assert!(b.fallback_by_symbol().contains_key("ITC.NS"));
    }
}
