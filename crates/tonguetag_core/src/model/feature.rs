//! Tongue feature reference model.
//!
//! # Responsibility
//! - Define the six observation categories recorded per tongue photograph.
//! - Carry immutable reference rows loaded from `tongue_features`.
//!
//! # Invariants
//! - Feature ids are stable and globally unique across categories.
//! - Only `TongueShape` is multi-select; the other five are single-select.

use serde::{Deserialize, Serialize};

/// Stable identifier of one tongue feature reference row.
pub type FeatureId = i64;

/// Observation category of a tongue feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureCategory {
    /// Tongue body color.
    #[serde(rename = "TC")]
    TongueColor,
    /// Coating (moss) color.
    #[serde(rename = "MC")]
    MossColor,
    /// Coating (moss) quality.
    #[serde(rename = "MQ")]
    MossQuality,
    /// Tongue body shape. Multi-select.
    #[serde(rename = "TS")]
    TongueShape,
    /// Body fluid appearance.
    #[serde(rename = "BF")]
    BodyFluid,
    /// Sublingual collateral vessels.
    #[serde(rename = "SC")]
    SublingualCollaterals,
}

/// Single-select categories in the order they appear on a tagging record.
pub const SINGLE_SELECT_CATEGORIES: [FeatureCategory; 5] = [
    FeatureCategory::TongueColor,
    FeatureCategory::MossColor,
    FeatureCategory::MossQuality,
    FeatureCategory::BodyFluid,
    FeatureCategory::SublingualCollaterals,
];

impl FeatureCategory {
    /// Two-letter storage code.
    pub fn code(self) -> &'static str {
        match self {
            Self::TongueColor => "TC",
            Self::MossColor => "MC",
            Self::MossQuality => "MQ",
            Self::TongueShape => "TS",
            Self::BodyFluid => "BF",
            Self::SublingualCollaterals => "SC",
        }
    }

    /// Parses a two-letter storage code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TC" => Some(Self::TongueColor),
            "MC" => Some(Self::MossColor),
            "MQ" => Some(Self::MossQuality),
            "TS" => Some(Self::TongueShape),
            "BF" => Some(Self::BodyFluid),
            "SC" => Some(Self::SublingualCollaterals),
            _ => None,
        }
    }

    pub fn is_multi_select(self) -> bool {
        matches!(self, Self::TongueShape)
    }

    /// Human-readable category name used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::TongueColor => "tongue color",
            Self::MossColor => "moss color",
            Self::MossQuality => "moss quality",
            Self::TongueShape => "tongue shape",
            Self::BodyFluid => "body fluid",
            Self::SublingualCollaterals => "sublingual collaterals",
        }
    }
}

/// One enumerated clinical observation value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TongueFeature {
    pub id: FeatureId,
    pub category: FeatureCategory,
    pub label: String,
}

impl TongueFeature {
    pub fn new(id: FeatureId, category: FeatureCategory, label: impl Into<String>) -> Self {
        Self {
            id,
            category,
            label: label.into(),
        }
    }
}
