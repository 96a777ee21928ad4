//! Turns a free-form item description into a structured [`ParsedItem`].
//!
//! Every field is extracted independently by walking a fixed, ordered table of
//! patterns; the first entry that matches wins. Ordering is part of the
//! behaviour: "1 gr" must be read as grains, and a named alias such as
//! "sterling" overrides a karat or decimal fineness found earlier.
use crate::core::metal::{MetalKind, Weight, WeightUnit};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Purity forced on coin lots that are priced by face value.
pub const JUNK_SILVER_PURITY: f64 = 0.800;

const KARAT_TO_FINENESS: [(u32, f64); 5] = [
    (24, 1.0000),
    (22, 0.9167),
    (18, 0.7500),
    (14, 0.5833),
    (10, 0.4167),
];

const PURITY_ALIASES: [(&str, f64); 9] = [
    ("sterling", 0.925),
    ("britannia", 0.958),
    ("coin", 0.900),
    ("junk", 0.800),
    (".9999", 0.9999),
    (".999", 0.999),
    (".925", 0.925),
    (".900", 0.900),
    (".800", 0.800),
];

#[derive(Debug, Clone, Copy)]
enum Magnitude {
    Decimal,
    Fraction,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

// Symbols start a word but may run into a hallmark number ("pt950", "au750").
static METAL_PATTERNS: Lazy<Vec<(MetalKind, Regex)>> = Lazy::new(|| {
    vec![
        (MetalKind::Silver, compile(r"silver|\bag(?:\d|\b)")),
        (MetalKind::Gold, compile(r"gold|\bau(?:\d|\b)")),
        (MetalKind::Platinum, compile(r"platinum|\bpt(?:\d|\b)")),
        (MetalKind::Palladium, compile(r"palladium|\bpd(?:\d|\b)")),
    ]
});

static FACE_VALUE: Lazy<Regex> = Lazy::new(|| compile(r"\$(\d+\.?\d*)"));

static KARAT: Lazy<Regex> = Lazy::new(|| compile(r"(\d+)\s?k(?:t|arat)?\b"));

// A fineness never continues or follows another number: "31.1034768g" is a weight.
static DECIMAL_FINENESS: Lazy<Regex> =
    Lazy::new(|| compile(r"(?:^|[^\d.])0?\.(\d{3,4})(?:[^\d]|$)"));

// Numeric magnitudes may not start right after a digit, '.' or '/', so the
// denominator of "1/10 ozt" and the digits of ".9999 g" are never taken as weights.
static WEIGHT_PATTERNS: Lazy<Vec<(Regex, WeightUnit, Magnitude)>> = Lazy::new(|| {
    const NUM: &str = r"(?:^|[^\d./])(\d+(?:\.\d+)?)";
    vec![
        (
            compile(&format!(r"{NUM}\s*g(?:rams?)?\b")),
            WeightUnit::Gram,
            Magnitude::Decimal,
        ),
        (
            compile(&format!(r"{NUM}\s*ozt")),
            WeightUnit::TroyOunce,
            Magnitude::Decimal,
        ),
        (
            compile(&format!(r"{NUM}\s*oz")),
            WeightUnit::TroyOunce,
            Magnitude::Decimal,
        ),
        (
            compile(&format!(r"{NUM}\s*dwt")),
            WeightUnit::Pennyweight,
            Magnitude::Decimal,
        ),
        (
            compile(&format!(r"{NUM}\s*gr")),
            WeightUnit::Grain,
            Magnitude::Decimal,
        ),
        (
            compile(&format!(r"{NUM}\s*kg")),
            WeightUnit::Kilogram,
            Magnitude::Decimal,
        ),
        (
            compile(r"(\d+/\d+)\s*ozt?"),
            WeightUnit::TroyOunce,
            Magnitude::Fraction,
        ),
    ]
});

/// Structured description of a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedItem {
    pub original_text: String,
    pub metal: Option<MetalKind>,
    pub purity: Option<f64>,
    pub weight: Option<Weight>,
    pub face_value: Option<f64>,
}

impl ParsedItem {
    fn empty(original_text: &str) -> Self {
        Self {
            original_text: original_text.to_string(),
            metal: None,
            purity: None,
            weight: None,
            face_value: None,
        }
    }

    pub fn is_face_value_lot(&self) -> bool {
        self.face_value.is_some()
    }
}

/// Parses raw operator input. Never fails; undetected fields are `None`.
pub fn parse(raw: &str) -> ParsedItem {
    let text = raw.trim().to_lowercase();
    let mut item = ParsedItem::empty(raw);

    item.metal = detect_metal(&text);

    if let Some(face_value) = detect_junk_face_value(&text) {
        item.face_value = Some(face_value);
        item.metal = Some(MetalKind::Silver);
        item.purity = Some(JUNK_SILVER_PURITY);
        debug!(?item, "Parsed face value lot");
        return item;
    }

    item.purity = detect_purity(&text);
    item.weight = detect_weight(&text);

    debug!(?item, "Parsed item");
    item
}

fn detect_metal(text: &str) -> Option<MetalKind> {
    METAL_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(metal, _)| *metal)
}

fn detect_junk_face_value(text: &str) -> Option<f64> {
    if !text.contains("junk") {
        return None;
    }
    FACE_VALUE
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

fn detect_purity(text: &str) -> Option<f64> {
    let mut purity = None;

    if let Some(caps) = KARAT.captures(text) {
        purity = caps[1].parse::<u32>().ok().and_then(karat_fineness);
    }

    if let Some(caps) = DECIMAL_FINENESS.captures(text) {
        purity = format!("0.{}", &caps[1]).parse::<f64>().ok();
    }

    if let Some((_, alias_purity)) = PURITY_ALIASES
        .iter()
        .find(|(alias, _)| text.contains(alias))
    {
        purity = Some(*alias_purity);
    }

    purity
}

fn karat_fineness(karat: u32) -> Option<f64> {
    KARAT_TO_FINENESS
        .iter()
        .find(|(k, _)| *k == karat)
        .map(|(_, fineness)| *fineness)
}

fn detect_weight(text: &str) -> Option<Weight> {
    for (pattern, unit, magnitude) in WEIGHT_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let raw = &caps[1];
            let value = match magnitude {
                Magnitude::Decimal => raw.parse::<f64>().ok(),
                Magnitude::Fraction => parse_fraction(raw),
            };
            // The first matching pattern decides, even if its number is unusable.
            return value.map(|v| Weight::new(v, *unit));
        }
    }
    None
}

fn parse_fraction(raw: &str) -> Option<f64> {
    let (numerator, denominator) = raw.split_once('/')?;
    let numerator = numerator.parse::<f64>().ok()?;
    let denominator = denominator.parse::<f64>().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}
