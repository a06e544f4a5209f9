// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

use crate::record::deserialize_nps;

/// The label used for records that carry neither a month nor a timestamp.
pub const UNKNOWN_MONTH: &str = "Unknown";

/// The field holding the "value for the price" rating.
pub const VALUE_PRICE_FIELD: &str = "value_price";

/// One respondent's submission.
///
/// The section ratings are not named fields: they are stored under
/// `<section>_<item index>` keys (`internet_0`, `catering_4`, ...) together
/// with `value_price` and any field this version does not know about.
/// Unknown fields are kept as-is, so that a record read from the store is
/// written back unchanged.
///
/// ```
/// use survey_metrics::SurveyRecord;
///
/// let record: SurveyRecord = serde_json::from_str(
///     r#"{"nps": 9, "internet_0": 4, "internet_1": 0, "value_price": "5"}"#,
/// )?;
/// assert_eq!(record.nps, Some(9));
/// assert_eq!(record.rating("internet_0"), Some(4.0));
/// // Zero means "not rated".
/// assert_eq!(record.rating("internet_1"), None);
/// assert_eq!(record.value_price(), Some(5.0));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyRecord {
    /// Likelihood to recommend, between 0 and 10.
    #[serde(default, deserialize_with = "deserialize_nps")]
    pub nps: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liked_most: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_improvement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Human-readable month. When missing, it is derived from the timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// Ratings and any other field.
    #[serde(flatten)]
    pub fields: BTreeMap<String, JSValue>,
}

/// A group of related survey items that are rated together.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct SectionDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    /// The item labels. The position of an item is the suffix of its field.
    pub items: &'static [&'static str],
}

impl SectionDefinition {
    /// The names of the rating fields of this section, in item order.
    pub fn field_keys(&self) -> Vec<String> {
        (0..self.items.len())
            .map(|idx| format!("{}_{}", self.key, idx))
            .collect()
    }

    pub fn by_key(key: &str) -> Option<&'static SectionDefinition> {
        SECTIONS.iter().find(|s| s.key == key)
    }
}

/// The sections of the survey, in the order they are presented and scored.
pub const SECTIONS: [SectionDefinition; 6] = [
    SectionDefinition {
        key: "internet",
        label: "Internet quality",
        icon: "📡",
        items: &[
            "Connection speed",
            "Connection stability",
            "Backup when the connection drops",
        ],
    },
    SectionDefinition {
        key: "chairs",
        label: "Chairs and desks",
        icon: "🪑",
        items: &[
            "Chair comfort",
            "Desks suited to long work sessions",
            "Seating layout",
        ],
    },
    SectionDefinition {
        key: "vibe",
        label: "Atmosphere",
        icon: "🌿",
        items: &["Quiet", "Lighting", "Ventilation", "Noise level"],
    },
    SectionDefinition {
        key: "staff",
        label: "Customer service",
        icon: "👨‍💼",
        items: &[
            "Response speed",
            "Professionalism",
            "Problem solving",
            "Courtesy",
        ],
    },
    SectionDefinition {
        key: "catering",
        label: "Catering and snacks",
        icon: "☕",
        items: &[
            "Drinks variety",
            "Snacks variety",
            "Product quality",
            "Value for money",
            "Price clarity",
        ],
    },
    SectionDefinition {
        key: "clean",
        label: "Cleanliness",
        icon: "✨",
        items: &[
            "Desks",
            "Restrooms",
            "Catering area",
            "Overall cleanliness",
        ],
    },
];

// ******** Output data structures *********

/// Promoter / passive / detractor split of a set of responses.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpsResult {
    /// Between -100 and 100.
    pub score: i32,
    pub promoters_pct: u32,
    pub passives_pct: u32,
    pub detractors_pct: u32,
    pub promoters: usize,
    pub passives: usize,
    pub detractors: usize,
    pub total: usize,
}

/// The class of a single NPS answer.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NpsClass {
    Detractor,
    Passive,
    Promoter,
}

impl NpsClass {
    pub fn of(nps: u8) -> NpsClass {
        match nps {
            0..=6 => NpsClass::Detractor,
            7..=8 => NpsClass::Passive,
            _ => NpsClass::Promoter,
        }
    }
}

/// How a NPS score reads on the dashboard.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NpsBand {
    /// 50 and above.
    Excellent,
    /// 0 to 49.
    Good,
    /// Negative scores.
    Critical,
}

impl NpsBand {
    pub fn of(score: i32) -> NpsBand {
        if score >= 50 {
            NpsBand::Excellent
        } else if score >= 0 {
            NpsBand::Good
        } else {
            NpsBand::Critical
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            NpsBand::Excellent => "Excellent: very strong loyalty",
            NpsBand::Good => "Good: room to improve",
            NpsBand::Critical => "Needs immediate action",
        }
    }
}

/// The average rating of one section.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SectionScore {
    pub key: String,
    pub label: String,
    pub icon: String,
    /// Rounded to two decimals. 0 when nothing was rated.
    pub average: f64,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusTier {
    Excellent,
    Strong,
    NeedsImprovement,
    OperationalRisk,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
pub struct Status {
    pub label: &'static str,
    pub tier: StatusTier,
}

/// Aggregates for one month.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub month: String,
    /// None when no response of that month has a NPS answer.
    pub nps: Option<i32>,
    /// Mean of the section averages, rounded to two decimals.
    pub nbs: f64,
    pub count: usize,
}

/// Errors when assembling a new record.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SurveyErrors {
    /// A record cannot be submitted without a NPS answer.
    MissingNps,
    NpsOutOfRange(u8),
    RatingOutOfRange { field: String, value: u8 },
    UnknownField(String),
}

impl Error for SurveyErrors {}

impl Display for SurveyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurveyErrors::MissingNps => write!(f, "a NPS answer is required"),
            SurveyErrors::NpsOutOfRange(x) => {
                write!(f, "NPS answer must be between 0 and 10, got {}", x)
            }
            SurveyErrors::RatingOutOfRange { field, value } => {
                write!(f, "rating for {} must be between 1 and 5, got {}", field, value)
            }
            SurveyErrors::UnknownField(field) => write!(f, "unknown rating field {:?}", field),
        }
    }
}

// ********* Configuration **********

/// The order in which months are reported by the monthly trend.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonthOrder {
    /// Months appear in the order they are first seen in the responses.
    FirstSeen,
    /// Months are sorted by their earliest response. Months without any
    /// timestamp come last, in the order they are first seen.
    Chronological,
}

impl Default for MonthOrder {
    fn default() -> Self {
        MonthOrder::FirstSeen
    }
}
