//! WOI look-back horizons and the column names derived from them.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Trailing window over which sales are averaged.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WoiHorizon {
    /// Four weeks
    #[display("4w")]
    FourWeeks,
    /// Eight weeks
    #[display("8w")]
    EightWeeks,
    /// Twelve weeks
    #[display("12w")]
    TwelveWeeks,
}

impl WoiHorizon {
    /// Every horizon, shortest first.
    pub const ALL: [Self; 3] = [Self::FourWeeks, Self::EightWeeks, Self::TwelveWeeks];

    /// Window length in periods.
    pub const fn weeks(&self) -> usize {
        match self {
            Self::FourWeeks => 4,
            Self::EightWeeks => 8,
            Self::TwelveWeeks => 12,
        }
    }

    /// Trailing average sales column, e.g. `avg_4w_sale`.
    pub const fn avg_sale_column(&self) -> &'static str {
        match self {
            Self::FourWeeks => "avg_4w_sale",
            Self::EightWeeks => "avg_8w_sale",
            Self::TwelveWeeks => "avg_12w_sale",
        }
    }

    /// Weeks-of-inventory column, e.g. `woi_4w`.
    pub const fn woi_column(&self) -> &'static str {
        match self {
            Self::FourWeeks => "woi_4w",
            Self::EightWeeks => "woi_8w",
            Self::TwelveWeeks => "woi_12w",
        }
    }

    /// Brand-level mean WOI column, e.g. `avg_woi_4w`.
    pub const fn summary_column(&self) -> &'static str {
        match self {
            Self::FourWeeks => "avg_woi_4w",
            Self::EightWeeks => "avg_woi_8w",
            Self::TwelveWeeks => "avg_woi_12w",
        }
    }
}
