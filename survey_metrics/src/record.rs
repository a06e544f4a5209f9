use chrono::{DateTime, Utc};
use serde::de::{self, Deserialize, Deserializer};
use serde_json::Value as JSValue;

use crate::config::*;

impl SurveyRecord {
    /// The rating stored under the given field, if any.
    ///
    /// Numbers and numeric strings are accepted. A value that is zero, negative
    /// or not a number means that the item was not rated.
    pub fn rating(&self, field: &str) -> Option<f64> {
        let x = match self.fields.get(field)? {
            JSValue::Number(n) => n.as_f64()?,
            JSValue::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if x.is_finite() && x > 0.0 {
            Some(x)
        } else {
            None
        }
    }

    pub fn value_price(&self) -> Option<f64> {
        self.rating(VALUE_PRICE_FIELD)
    }

    pub fn nps_class(&self) -> Option<NpsClass> {
        self.nps.map(NpsClass::of)
    }

    /// The month this record is grouped under.
    pub fn month_label(&self) -> String {
        match (&self.month, &self.timestamp) {
            (Some(m), _) if !m.is_empty() => m.clone(),
            (_, Some(ts)) => month_label_of(ts),
            _ => UNKNOWN_MONTH.to_string(),
        }
    }

    /// True if at least one of the free-text answers is filled.
    pub fn has_comments(&self) -> bool {
        [&self.liked_most, &self.needs_improvement, &self.if_manager]
            .iter()
            .any(|c| c.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false))
    }
}

/// Month label of a timestamp, for example `October 2026`.
pub fn month_label_of(ts: &DateTime<Utc>) -> String {
    ts.format("%B %Y").to_string()
}

// The NPS answer may have been written as a number, a float or a string by
// older versions of the form.
pub(crate) fn deserialize_nps<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<JSValue> = Option::deserialize(deserializer)?;
    match raw {
        None | Some(JSValue::Null) => Ok(None),
        Some(v) => parse_nps(&v)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid nps value: {}", v))),
    }
}

fn parse_nps(v: &JSValue) -> Option<u8> {
    let x = match v {
        JSValue::Number(n) => n.as_f64()?,
        JSValue::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if x.fract() == 0.0 && (0.0..=10.0).contains(&x) {
        Some(x as u8)
    } else {
        None
    }
}
