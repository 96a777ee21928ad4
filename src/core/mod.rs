//! Valuation logic: parsing, unit conversion, pricing and the item ledger

pub mod config;
pub mod error;
pub mod ledger;
pub mod log;
pub mod metal;
pub mod parser;
pub mod pricing;
pub mod session;

// Re-export main types for cleaner imports
pub use error::ParseError;
pub use ledger::{ItemId, Ledger, LedgerItem, Totals};
pub use metal::{MetalKind, Weight, WeightUnit, to_troy_ounces};
pub use parser::{ParsedItem, parse};
pub use pricing::{MarketConfig, Valuation, price, valuate};
