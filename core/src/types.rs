//! Shared primitive types used across the entire pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable, unique identifier for any generated entity.
pub type EntityId = String;

/// The canonical run identifier.
pub type RunId = String;

/// City classification driving every tier-dependent sampling parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    #[serde(rename = "Metro")]
    Metro,
    #[serde(rename = "Tier 2")]
    Tier2,
    #[serde(rename = "Tier 3")]
    Tier3,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Metro, Tier::Tier2, Tier::Tier3];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Metro => "Metro",
            Self::Tier2 => "Tier 2",
            Self::Tier3 => "Tier 3",
        }
    }

    /// Alphabetical label encoding (Metro=0, Tier 2=1, Tier 3=2).
    pub fn code(&self) -> usize {
        match self {
            Self::Metro => 0,
            Self::Tier2 => 1,
            Self::Tier3 => 2,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncomeBracket {
    #[default]
    #[serde(rename = "10-15K")]
    From10To15K,
    #[serde(rename = "15-25K")]
    From15To25K,
    #[serde(rename = "25-50K")]
    From25To50K,
    #[serde(rename = "50-75K")]
    From50To75K,
    #[serde(rename = "75K+")]
    Above75K,
}

impl IncomeBracket {
    pub const ALL: [IncomeBracket; 5] = [
        IncomeBracket::From10To15K,
        IncomeBracket::From15To25K,
        IncomeBracket::From25To50K,
        IncomeBracket::From50To75K,
        IncomeBracket::Above75K,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::From10To15K => "10-15K",
            Self::From15To25K => "15-25K",
            Self::From25To50K => "25-50K",
            Self::From50To75K => "50-75K",
            Self::Above75K    => "75K+",
        }
    }

    /// Ordinal rank used as a model feature (1 = lowest income).
    pub fn rank(&self) -> u8 {
        match self {
            Self::From10To15K => 1,
            Self::From15To25K => 2,
            Self::From25To50K => 3,
            Self::From50To75K => 4,
            Self::Above75K    => 5,
        }
    }
}

impl fmt::Display for IncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "UPI")]
    Upi,
    Card,
    Wallet,
    #[serde(rename = "COD")]
    Cod,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Upi,
        PaymentMethod::Card,
        PaymentMethod::Wallet,
        PaymentMethod::Cod,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Upi    => "UPI",
            Self::Card   => "Card",
            Self::Wallet => "Wallet",
            Self::Cod    => "COD",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Round to two decimal places, the precision every stored money field uses.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// First day of the store-opening and customer-registration windows.
pub fn window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Reference "today" for transactions, restocks and customer tenure.
pub fn cutoff_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 30).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_labels_serialize_with_spaces() {
        assert_eq!(serde_json::to_string(&Tier::Tier2).unwrap(), "\"Tier 2\"");
        let parsed: Tier = serde_json::from_str("\"Tier 3\"").unwrap();
        assert_eq!(parsed, Tier::Tier3);
    }

    #[test]
    fn income_rank_is_ordinal() {
        let ranks: Vec<u8> = IncomeBracket::ALL.iter().map(|b| b.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn round2_matches_cents() {
        assert_eq!(round2(33.33333), 33.33);
        assert_eq!(round2(-1.005_1), -1.01);
        assert_eq!(round2(180.0), 180.0);
    }
}
