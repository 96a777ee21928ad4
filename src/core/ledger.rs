//! The running list of priced items and its totals.
use crate::core::error::ParseError;
use crate::core::metal::MetalKind;
use crate::core::parser::{ParsedItem, parse};
use crate::core::pricing::{MarketConfig, price};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Creation-order identifier, a millisecond timestamp kept strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerItem {
    pub id: ItemId,
    pub metal: MetalKind,
    pub item: ParsedItem,
    pub pay_price: f64,
}

/// Per-metal sums (every metal present, zero when unused) and the grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub by_metal: BTreeMap<MetalKind, f64>,
    pub grand: f64,
}

impl Totals {
    pub fn metal(&self, metal: MetalKind) -> f64 {
        self.by_metal.get(&metal).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Default)]
pub struct Ledger {
    items: Vec<LedgerItem>,
    last_id: Option<ItemId>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LedgerItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&LedgerItem> {
        self.items.iter().find(|entry| entry.id == id)
    }

    /// Parses, prices and appends an item.
    pub fn add_item(&mut self, raw: &str, config: &MarketConfig) -> Result<&LedgerItem, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let item = parse(raw);
        let Some(metal) = item.metal else {
            warn!(text = raw, "Rejected item without a detectable metal");
            return Err(ParseError::NoMetalDetected(raw.trim().to_string()));
        };

        let id = self.next_id();
        let pay_price = price(&item, config);
        info!(%id, text = raw, pay_price, "Added item");

        self.items.push(LedgerItem {
            id,
            metal,
            item,
            pay_price,
        });
        Ok(&self.items[self.items.len() - 1])
    }

    /// Removes an item; returns whether anything was removed.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|entry| entry.id != id);
        let removed = self.items.len() != before;
        if removed {
            info!(%id, "Removed item");
        } else {
            debug!(%id, "No item to remove");
        }
        removed
    }

    pub fn clear(&mut self) {
        info!(count = self.items.len(), "Cleared ledger");
        self.items.clear();
    }

    /// Recomputes every pay price under `config`, keeping ids and order.
    pub fn reprice(&mut self, config: &MarketConfig) {
        for entry in &mut self.items {
            entry.pay_price = price(&entry.item, config);
        }
        debug!(count = self.items.len(), "Repriced ledger");
    }

    pub fn totals(&self) -> Totals {
        let mut by_metal: BTreeMap<MetalKind, f64> =
            MetalKind::ALL.iter().map(|metal| (*metal, 0.0)).collect();
        let mut grand = 0.0;

        for entry in &self.items {
            *by_metal.entry(entry.metal).or_insert(0.0) += entry.pay_price;
            grand += entry.pay_price;
        }

        Totals { by_metal, grand }
    }

    fn next_id(&mut self) -> ItemId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let id = match self.last_id {
            Some(ItemId(last)) if last >= now => ItemId(last + 1),
            _ => ItemId(now),
        };
        self.last_id = Some(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn unrounded() -> MarketConfig {
        MarketConfig {
            rounding: false,
            ..MarketConfig::default()
        }
    }

    fn sample_ledger(config: &MarketConfig) -> Ledger {
        let mut ledger = Ledger::new();
        for text in [
            "403g sterling silver",
            "1/10 ozt .9999 gold bar",
            "$10 junk silver",
            "1 ozt pt .9995 bar",
            "10g 999 pd",
            "sterling silver spoon",
        ] {
            ledger.add_item(text, config).unwrap();
        }
        ledger
    }

    #[test]
    fn test_add_item_preserves_order_and_unique_ids() {
        let ledger = sample_ledger(&unrounded());
        assert_eq!(ledger.len(), 6);
        assert_eq!(ledger.items()[0].item.original_text, "403g sterling silver");
        assert_eq!(ledger.items()[5].item.original_text, "sterling silver spoon");

        let ids: Vec<ItemId> = ledger.items().iter().map(|entry| entry.id).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_add_item_rejects_missing_metal() {
        let mut ledger = Ledger::new();
        let err = ledger.add_item("5 ozt copper round", &unrounded()).unwrap_err();
        assert_eq!(err, ParseError::NoMetalDetected("5 ozt copper round".to_string()));
        assert!(err.to_string().contains("Could not detect metal type"));
        assert_eq!(ledger.add_item("   ", &unrounded()), Err(ParseError::EmptyInput));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_zero_priced_item_is_kept() {
        let mut ledger = Ledger::new();
        let entry = ledger.add_item("sterling silver spoon", &unrounded()).unwrap();
        assert_eq!(entry.pay_price, 0.0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_item() {
        let mut ledger = sample_ledger(&unrounded());
        let id = ledger.items()[1].id;
        assert!(ledger.remove_item(id));
        assert_eq!(ledger.len(), 5);
        assert!(ledger.get(id).is_none());
        assert!(!ledger.remove_item(id));
        assert_eq!(ledger.len(), 5);
    }

    #[test]
    fn test_totals_invariant() {
        let ledger = sample_ledger(&unrounded());
        let totals = ledger.totals();

        let item_sum: f64 = ledger.items().iter().map(|entry| entry.pay_price).sum();
        let metal_sum: f64 = totals.by_metal.values().sum();
        assert!((totals.grand - item_sum).abs() < EPSILON);
        assert!((totals.grand - metal_sum).abs() < EPSILON);
        assert_eq!(totals.by_metal.len(), MetalKind::ALL.len());
        assert!(totals.metal(MetalKind::Gold) > 0.0);
    }

    #[test]
    fn test_empty_totals() {
        let totals = Ledger::new().totals();
        assert_eq!(totals.grand, 0.0);
        assert!(MetalKind::ALL.iter().all(|metal| totals.metal(*metal) == 0.0));
    }

    #[test]
    fn test_reprice_updates_in_place() {
        let config = unrounded();
        let mut ledger = sample_ledger(&config);
        let ids_before: Vec<ItemId> = ledger.items().iter().map(|entry| entry.id).collect();
        let silver_before = ledger.items()[0].pay_price;

        let mut doubled = config.clone();
        doubled.set_spot(MetalKind::Silver, config.spot(MetalKind::Silver) * 2.0);
        ledger.reprice(&doubled);

        let ids_after: Vec<ItemId> = ledger.items().iter().map(|entry| entry.id).collect();
        assert_eq!(ids_before, ids_after);
        assert!((ledger.items()[0].pay_price - silver_before * 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_reprice_is_idempotent() {
        let mut ledger = sample_ledger(&unrounded());
        let config = MarketConfig::default();

        ledger.reprice(&config);
        let first: Vec<f64> = ledger.items().iter().map(|entry| entry.pay_price).collect();
        ledger.reprice(&config);
        let second: Vec<f64> = ledger.items().iter().map(|entry| entry.pay_price).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|p| p % 5.0 == 0.0));
    }

    #[test]
    fn test_clear() {
        let mut ledger = sample_ledger(&unrounded());
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.totals().grand, 0.0);
    }
}
