//! Domain types: trade records, the creation payload, and the fixed vocabularies.

pub mod catalog;
pub mod new_trade;
pub mod trade;

pub use catalog::{
    search_symbols, symbol_label, SymbolInfo, CUSTOM_MISTAKE, MISTAKES, NO_MISTAKE, SYMBOLS,
    TRADE_TYPES,
};
pub use new_trade::NewTrade;
pub use trade::{parse_wire_timestamp, Trade, TradeType};
