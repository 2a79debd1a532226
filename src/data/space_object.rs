//! Tracked object records matching the dashboard API schema

use std::fmt;

use serde::{Deserialize, Serialize};

/// Object category as reported by the catalog
///
/// The API delivers free text; anything unrecognised is normalized to
/// [`ObjectCategory::Unknown`] when the record is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectCategory {
    Payload,
    Debris,
    RocketBody,
    Unknown,
}

impl ObjectCategory {
    /// Every known category, in display order
    pub const ALL: [ObjectCategory; 4] = [
        ObjectCategory::Payload,
        ObjectCategory::Debris,
        ObjectCategory::RocketBody,
        ObjectCategory::Unknown,
    ];

    /// Normalize a catalog label
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "payload" => Self::Payload,
            "debris" => Self::Debris,
            "rocketbody" | "rb" => Self::RocketBody,
            _ => Self::Unknown,
        }
    }

    /// Catalog label (as used by Space-Track)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Payload => "PAYLOAD",
            Self::Debris => "DEBRIS",
            Self::RocketBody => "ROCKET BODY",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl From<String> for ObjectCategory {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<ObjectCategory> for String {
    fn from(category: ObjectCategory) -> Self {
        category.label().to_string()
    }
}

impl fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Two-Line Element set, kept as the raw text lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlePair {
    #[serde(rename = "tle_line1")]
    pub line1: String,
    #[serde(rename = "tle_line2")]
    pub line2: String,
}

impl TlePair {
    pub fn new(line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
        }
    }
}

/// Conjunction alert attached to a tracked object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionAlert {
    pub id: u64,
    pub cdm_id: Option<String>,
    pub created: String,
    /// Time of closest approach
    pub tca: String,
    /// Minimum range (km)
    pub min_rng: Option<f64>,
    /// Probability of collision
    pub pc: Option<f64>,
    pub sat_1_id: String,
    pub sat_1_name: String,
    pub sat_2_id: String,
    pub sat_2_name: String,
    pub risk_level: Option<String>,
    pub alert_reason: Option<String>,
}

/// A single tracked object (payload, debris, rocket body, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedObject {
    pub norad_id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "object_type", default = "unknown_category")]
    pub category: ObjectCategory,
    #[serde(flatten)]
    pub tle: TlePair,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub collision_alerts: Option<Vec<CollisionAlert>>,
}

fn unknown_category() -> ObjectCategory {
    ObjectCategory::Unknown
}

impl TrackedObject {
    /// Get display name (falls back to NORAD ID if no name)
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("NORAD {}", self.norad_id)
        } else {
            self.name.clone()
        }
    }

    pub fn alerts(&self) -> &[CollisionAlert] {
        self.collision_alerts.as_deref().unwrap_or(&[])
    }

    /// Case-insensitive substring match on name or catalog number.
    /// `query_lower` must already be lowercased.
    pub fn matches_query(&self, query_lower: &str) -> bool {
        if query_lower.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(query_lower)
            || self.norad_id.to_string().contains(query_lower)
    }
}
