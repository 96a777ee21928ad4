//! Offer pricing for parsed items under a market configuration.
use crate::core::metal::{GRAMS_PER_TROY_OUNCE, MetalKind};
use crate::core::parser::ParsedItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Approximate fine silver grams per dollar of face value in 80% coinage.
pub const JUNK_FINE_GRAMS_PER_DOLLAR: f64 = 18.0;

/// Silver below this fineness takes the low purity penalty.
pub const SILVER_PENALTY_THRESHOLD: f64 = 0.925;
pub const SILVER_PENALTY_FACTOR: f64 = 0.80;

pub const ROUNDING_INCREMENT: f64 = 5.0;

/// Spot prices, buyer multipliers and the rounding policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    pub spot_prices: BTreeMap<MetalKind, f64>,
    pub multipliers: BTreeMap<MetalKind, f64>,
    pub rounding: bool,
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig {
            spot_prices: BTreeMap::from([
                (MetalKind::Silver, 32.50),
                (MetalKind::Gold, 2650.00),
                (MetalKind::Platinum, 1250.00),
                (MetalKind::Palladium, 1100.00),
            ]),
            multipliers: BTreeMap::from([
                (MetalKind::Silver, 0.90),
                (MetalKind::Gold, 0.97),
                (MetalKind::Platinum, 0.92),
                (MetalKind::Palladium, 0.90),
            ]),
            rounding: true,
        }
    }
}

impl MarketConfig {
    pub fn spot(&self, metal: MetalKind) -> f64 {
        self.spot_prices.get(&metal).copied().unwrap_or(0.0)
    }

    pub fn multiplier(&self, metal: MetalKind) -> f64 {
        self.multipliers.get(&metal).copied().unwrap_or(0.0)
    }

    /// Spot prices are never negative; non-finite input becomes 0.
    pub fn set_spot(&mut self, metal: MetalKind, price: f64) {
        self.spot_prices.insert(metal, finite_or_zero(price).max(0.0));
    }

    /// Multipliers are kept within [0, 1]; non-finite input becomes 0.
    pub fn set_multiplier(&mut self, metal: MetalKind, multiplier: f64) {
        self.multipliers
            .insert(metal, finite_or_zero(multiplier).clamp(0.0, 1.0));
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Intermediate figures behind an offer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Valuation {
    pub gross_ozt: f64,
    pub fine_ozt: f64,
    pub melt_value: f64,
    pub penalty_applied: bool,
    pub offer: f64,
}

/// Computes the offer for an item. Items missing the data needed for their
/// pricing path are worth exactly zero.
pub fn price(item: &ParsedItem, config: &MarketConfig) -> f64 {
    valuate(item, config).offer
}

pub fn valuate(item: &ParsedItem, config: &MarketConfig) -> Valuation {
    let valuation = match item.face_value {
        Some(face_value) => valuate_face_value(item, face_value, config),
        None => valuate_weight(item, config),
    };
    let Some(mut valuation) = valuation else {
        debug!(text = %item.original_text, "Item is missing fields, priced at zero");
        return Valuation::default();
    };

    if config.rounding {
        valuation.offer = round_down(valuation.offer);
    }
    debug!(text = %item.original_text, ?valuation, "Priced item");
    valuation
}

fn valuate_face_value(item: &ParsedItem, face_value: f64, config: &MarketConfig) -> Option<Valuation> {
    let metal = item.metal?;
    let fine_grams = face_value * JUNK_FINE_GRAMS_PER_DOLLAR;
    let fine_ozt = fine_grams / GRAMS_PER_TROY_OUNCE;
    let melt_value = fine_ozt * config.spot(metal);
    let penalty_applied = item.purity.is_some_and(|p| p < SILVER_PENALTY_THRESHOLD);

    Some(offer_from(fine_ozt, fine_ozt, melt_value, metal, penalty_applied, config))
}

fn valuate_weight(item: &ParsedItem, config: &MarketConfig) -> Option<Valuation> {
    let metal = item.metal?;
    let purity = item.purity?;
    let weight = item.weight?;

    let gross_ozt = weight.troy_ounces();
    let fine_ozt = gross_ozt * purity;
    let melt_value = fine_ozt * config.spot(metal);
    let penalty_applied = metal == MetalKind::Silver && purity < SILVER_PENALTY_THRESHOLD;

    Some(offer_from(gross_ozt, fine_ozt, melt_value, metal, penalty_applied, config))
}

fn offer_from(
    gross_ozt: f64,
    fine_ozt: f64,
    melt_value: f64,
    metal: MetalKind,
    penalty_applied: bool,
    config: &MarketConfig,
) -> Valuation {
    let mut offer = melt_value * config.multiplier(metal);
    if penalty_applied {
        offer *= SILVER_PENALTY_FACTOR;
    }
    Valuation {
        gross_ozt,
        fine_ozt,
        melt_value,
        penalty_applied,
        offer,
    }
}

/// Floors to the next lower multiple of the rounding increment.
pub fn round_down(value: f64) -> f64 {
    (value / ROUNDING_INCREMENT).floor() * ROUNDING_INCREMENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metal::{Weight, WeightUnit};
    use crate::core::parser::parse;

    const EPSILON: f64 = 1e-9;

    fn unrounded() -> MarketConfig {
        MarketConfig {
            rounding: false,
            ..MarketConfig::default()
        }
    }

    fn silver_troy_ounce(purity: f64) -> ParsedItem {
        ParsedItem {
            original_text: "test".to_string(),
            metal: Some(MetalKind::Silver),
            purity: Some(purity),
            weight: Some(Weight::new(31.1034768, WeightUnit::Gram)),
            face_value: None,
        }
    }

    #[test]
    fn test_sterling_troy_ounce() {
        let valuation = valuate(&silver_troy_ounce(0.925), &unrounded());
        assert!((valuation.gross_ozt - 1.0).abs() < EPSILON);
        assert!((valuation.fine_ozt - 0.925).abs() < EPSILON);
        assert!((valuation.melt_value - 30.0625).abs() < EPSILON);
        assert!(!valuation.penalty_applied);
        assert!((valuation.offer - 27.05625).abs() < EPSILON);
    }

    #[test]
    fn test_low_purity_silver_penalty() {
        let offer = price(&silver_troy_ounce(0.800), &unrounded());
        let expected = 32.50 * 0.8 * 0.90 * 0.80;
        assert!((offer - expected).abs() < EPSILON);
        assert!((offer - 18.72).abs() < EPSILON);
    }

    #[test]
    fn test_no_penalty_for_low_purity_gold() {
        let item = ParsedItem {
            original_text: "10k gold 1 ozt".to_string(),
            metal: Some(MetalKind::Gold),
            purity: Some(0.4167),
            weight: Some(Weight::new(1.0, WeightUnit::TroyOunce)),
            face_value: None,
        };
        let valuation = valuate(&item, &unrounded());
        assert!(!valuation.penalty_applied);
        assert!((valuation.offer - 0.4167 * 2650.0 * 0.97).abs() < EPSILON);
    }

    #[test]
    fn test_junk_face_value() {
        let item = parse("$10 junk silver");
        let valuation = valuate(&item, &unrounded());
        let fine_ozt = 180.0 / GRAMS_PER_TROY_OUNCE;
        assert!((valuation.fine_ozt - fine_ozt).abs() < EPSILON);
        assert!(valuation.penalty_applied);
        assert!((valuation.offer - fine_ozt * 32.50 * 0.90 * 0.80).abs() < EPSILON);
    }

    #[test]
    fn test_rounding_floors_to_five() {
        assert_eq!(round_down(27.3), 25.0);
        assert_eq!(round_down(29.99), 25.0);
        assert_eq!(round_down(30.0), 30.0);
        assert_eq!(round_down(4.99), 0.0);

        let offer = price(&silver_troy_ounce(0.925), &MarketConfig::default());
        assert_eq!(offer, 25.0);
    }

    #[test]
    fn test_missing_fields_price_to_zero() {
        let mut item = silver_troy_ounce(0.925);
        item.purity = None;
        assert_eq!(price(&item, &unrounded()), 0.0);

        let mut item = silver_troy_ounce(0.925);
        item.weight = None;
        assert_eq!(price(&item, &unrounded()), 0.0);

        assert_eq!(price(&parse("sterling silver spoon"), &unrounded()), 0.0);
        assert_eq!(valuate(&parse("5g gold"), &unrounded()), Valuation::default());
    }

    #[test]
    fn test_config_lookups_default_to_zero() {
        let mut config = unrounded();
        config.spot_prices.remove(&MetalKind::Gold);
        assert_eq!(config.spot(MetalKind::Gold), 0.0);

        config.set_spot(MetalKind::Gold, -2650.0);
        config.set_multiplier(MetalKind::Gold, 1.5);
        config.set_multiplier(MetalKind::Platinum, f64::NAN);
        assert_eq!(config.spot(MetalKind::Gold), 0.0);
        assert_eq!(config.multiplier(MetalKind::Gold), 1.0);
        assert_eq!(config.multiplier(MetalKind::Platinum), 0.0);

        config.set_spot(MetalKind::Silver, 40.0);
        config.set_multiplier(MetalKind::Silver, 1.0);
        let offer = price(&silver_troy_ounce(1.0), &config);
        assert!((offer - 40.0).abs() < EPSILON);
    }
}
