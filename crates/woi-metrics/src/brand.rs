//! Brand catalogue and the product-code classification rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name given to products whose code matches no known brand.
pub const UNKNOWN_BRAND: &str = "UNKNOWN";

/// Brands carried in the accessory range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Brand {
    /// MLB
    Mlb,

    /// MLB Kids
    MlbKids,

    /// Discovery Expedition
    DiscoveryExpedition,

    /// Duvetica
    Duvetica,

    /// Sergio Tacchini
    SergioTacchini,
}

impl Brand {
    /// Returns all brands in catalogue order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Mlb,
            Self::MlbKids,
            Self::DiscoveryExpedition,
            Self::Duvetica,
            Self::SergioTacchini,
        ]
    }

    /// Returns the brand code used in product codes.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Mlb => "M",
            Self::MlbKids => "I",
            Self::DiscoveryExpedition => "X",
            Self::Duvetica => "V",
            Self::SergioTacchini => "ST",
        }
    }

    /// Returns the reporting name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mlb => "MLB",
            Self::MlbKids => "MLB KIDS",
            Self::DiscoveryExpedition => "DISCOVERY EXPEDITION",
            Self::Duvetica => "DUVETICA",
            Self::SergioTacchini => "SERGIO TACCHINI",
        }
    }

    /// Look a brand up by its exact code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Self::Mlb),
            "I" => Some(Self::MlbKids),
            "X" => Some(Self::DiscoveryExpedition),
            "V" => Some(Self::Duvetica),
            "ST" => Some(Self::SergioTacchini),
            _ => None,
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Reporting name for a brand code, [`UNKNOWN_BRAND`] when unmapped.
pub fn brand_name_for_code(code: Option<&str>) -> &'static str {
    code.and_then(Brand::from_code)
        .map_or(UNKNOWN_BRAND, |brand| brand.name())
}

/// One step of the brand-code decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandCodeRule {
    /// Two-character prefix starting with `ST` is always Sergio Tacchini.
    SergioTacchiniPrefix,
    /// Two-character prefix that is itself a known code.
    KnownPrefix,
    /// First character of the product code.
    FirstCharacter,
}

/// Decision table for inferring a brand code, first match wins.
pub const BRAND_CODE_RULES: [BrandCodeRule; 3] = [
    BrandCodeRule::SergioTacchiniPrefix,
    BrandCodeRule::KnownPrefix,
    BrandCodeRule::FirstCharacter,
];

impl BrandCodeRule {
    /// Apply the rule to a product code and its trimmed two-character prefix.
    pub fn apply<'a>(&self, product_code: &'a str, prefix: &'a str) -> Option<&'a str> {
        match self {
            Self::SergioTacchiniPrefix => prefix
                .starts_with("ST")
                .then_some(Brand::SergioTacchini.code()),
            Self::KnownPrefix => Brand::from_code(prefix).map(|_| prefix),
            Self::FirstCharacter => Some(
                product_code
                    .char_indices()
                    .nth(1)
                    .map_or(product_code, |(end, _)| &product_code[..end]),
            ),
        }
    }
}

/// Infer a brand code from a product code.
pub fn derive_brand_code(product_code: &str) -> &str {
    let prefix = two_char_prefix(product_code).trim();
    BRAND_CODE_RULES
        .iter()
        .find_map(|rule| rule.apply(product_code, prefix))
        .unwrap_or(product_code)
}

fn two_char_prefix(s: &str) -> &str {
    s.char_indices().nth(2).map_or(s, |(end, _)| &s[..end])
}
