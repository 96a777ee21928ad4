//! Metal kinds, weight units and conversion to troy ounces

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1034768;
pub const GRAMS_PER_PENNYWEIGHT: f64 = 1.55517384;
pub const GRAMS_PER_GRAIN: f64 = 0.06479891;
pub const GRAMS_PER_KILOGRAM: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetalKind {
    Silver,
    Gold,
    Platinum,
    Palladium,
}

impl MetalKind {
    pub const ALL: [MetalKind; 4] = [
        MetalKind::Silver,
        MetalKind::Gold,
        MetalKind::Platinum,
        MetalKind::Palladium,
    ];

    /// Returns display name and element symbol for the metal
    pub fn display_info(&self) -> (&'static str, &'static str) {
        match self {
            MetalKind::Silver => ("Silver", "Ag"),
            MetalKind::Gold => ("Gold", "Au"),
            MetalKind::Platinum => ("Platinum", "Pt"),
            MetalKind::Palladium => ("Palladium", "Pd"),
        }
    }
}

impl Display for MetalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_info().0)
    }
}

impl FromStr for MetalKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "silver" | "ag" => Ok(MetalKind::Silver),
            "gold" | "au" => Ok(MetalKind::Gold),
            "platinum" | "pt" => Ok(MetalKind::Platinum),
            "palladium" | "pd" => Ok(MetalKind::Palladium),
            _ => Err(anyhow::anyhow!("Invalid metal: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightUnit {
    Gram,
    TroyOunce,
    Pennyweight,
    Grain,
    Kilogram,
}

impl WeightUnit {
    /// Grams in one of this unit.
    pub fn grams(&self) -> f64 {
        match self {
            WeightUnit::Gram => 1.0,
            WeightUnit::TroyOunce => GRAMS_PER_TROY_OUNCE,
            WeightUnit::Pennyweight => GRAMS_PER_PENNYWEIGHT,
            WeightUnit::Grain => GRAMS_PER_GRAIN,
            WeightUnit::Kilogram => GRAMS_PER_KILOGRAM,
        }
    }
}

impl Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                WeightUnit::Gram => "g",
                WeightUnit::TroyOunce => "ozt",
                WeightUnit::Pennyweight => "dwt",
                WeightUnit::Grain => "gr",
                WeightUnit::Kilogram => "kg",
            }
        )
    }
}

/// A magnitude paired with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub magnitude: f64,
    pub unit: WeightUnit,
}

impl Weight {
    pub fn new(magnitude: f64, unit: WeightUnit) -> Self {
        Self { magnitude, unit }
    }

    pub fn troy_ounces(&self) -> f64 {
        to_troy_ounces(self.magnitude, self.unit)
    }
}

impl Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

/// Converts a weight in any supported unit into troy ounces.
pub fn to_troy_ounces(magnitude: f64, unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::TroyOunce => magnitude,
        WeightUnit::Gram => magnitude / GRAMS_PER_TROY_OUNCE,
        other => magnitude * other.grams() / GRAMS_PER_TROY_OUNCE,
    }
}
