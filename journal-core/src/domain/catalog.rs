//! Fixed vocabularies offered by the entry form.

/// A tradable symbol and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolInfo {
    pub value: &'static str,
    pub label: &'static str,
}

pub static SYMBOLS: [SymbolInfo; 13] = [
    SymbolInfo { value: "USOIL/USD", label: "USOIL/USD – WTI Crude Oil / USD" },
    SymbolInfo { value: "EUR/USD", label: "EUR/USD – Euro / USD" },
    SymbolInfo { value: "GBP/USD", label: "GBP/USD – British Pound / USD" },
    SymbolInfo { value: "USD/JPY", label: "USD/JPY – USD / Japanese Yen" },
    SymbolInfo { value: "USD/CHF", label: "USD/CHF – USD / Swiss Franc" },
    SymbolInfo { value: "USD/CAD", label: "USD/CAD – USD / Canadian Dollar" },
    SymbolInfo { value: "AUD/USD", label: "AUD/USD – Australian Dollar / USD" },
    SymbolInfo { value: "NZD/USD", label: "NZD/USD – New Zealand Dollar / USD" },
    SymbolInfo { value: "EUR/GBP", label: "EUR/GBP – Euro / British Pound" },
    SymbolInfo { value: "EUR/JPY", label: "EUR/JPY – Euro / Japanese Yen" },
    SymbolInfo { value: "GBP/JPY", label: "GBP/JPY – British Pound / Japanese Yen" },
    SymbolInfo { value: "BTC/USD", label: "BTC/USD – Bitcoin / USD" },
    SymbolInfo { value: "XAU/USD", label: "XAU/USD – Gold / USD" },
];

pub const TRADE_TYPES: [&str; 2] = ["BUY", "SELL"];

pub const NO_MISTAKE: &str = "No Mistake";
/// Selecting this swaps the mistake value over to free text.
pub const CUSTOM_MISTAKE: &str = "Custom";

pub const MISTAKES: [&str; 9] = [
    NO_MISTAKE,
    "Overtrading",
    "No Risk Management",
    "No Stop-Loss",
    "Revenge Trading",
    "FOMO",
    "Letting Losses Run",
    "No Trading Plan",
    CUSTOM_MISTAKE,
];

/// Display label for a catalog symbol.
pub fn symbol_label(value: &str) -> Option<&'static str> {
    SYMBOLS.iter().find(|s| s.value == value).map(|s| s.label)
}

/// Case-insensitive substring search over symbol values and labels.
///
/// An empty query returns the whole catalog in display order.
pub fn search_symbols(query: &str) -> Vec<&'static SymbolInfo> {
    let needle = query.trim().to_lowercase();
    SYMBOLS
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.value.to_lowercase().contains(&needle)
                || s.label.to_lowercase().contains(&needle)
        })
        .collect()
}
