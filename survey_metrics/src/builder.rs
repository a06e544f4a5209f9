use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::debug;
use serde_json::Value as JSValue;

pub use crate::config::*;
use crate::record::month_label_of;

/// Collects the answers of one respondent.
///
/// The builder checks every answer as it is given, so that an invalid record
/// never reaches the store.
///
/// ```
/// use chrono::Utc;
/// use survey_metrics::builder::RecordBuilder;
/// # use survey_metrics::SurveyErrors;
///
/// let mut builder = RecordBuilder::new().nps(9)?;
/// builder.rate("internet", 0, 4)?;
/// builder.rate_field("value_price", 5)?;
/// builder.liked_most("The quiet room");
///
/// let record = builder.build(Utc::now())?;
/// assert_eq!(record.rating("internet_0"), Some(4.0));
///
/// # Ok::<(), SurveyErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    nps: Option<u8>,
    ratings: BTreeMap<String, u8>,
    liked_most: Option<String>,
    needs_improvement: Option<String>,
    if_manager: Option<String>,
}

impl RecordBuilder {
    pub fn new() -> RecordBuilder {
        RecordBuilder::default()
    }

    pub fn nps(self, score: u8) -> Result<RecordBuilder, SurveyErrors> {
        if score > 10 {
            return Err(SurveyErrors::NpsOutOfRange(score));
        }
        Ok(RecordBuilder {
            nps: Some(score),
            ..self
        })
    }

    /// Rates one item of a section. Items are numbered from 0.
    pub fn rate(&mut self, section: &str, item: usize, value: u8) -> Result<(), SurveyErrors> {
        let field = format!("{}_{}", section, item);
        match SectionDefinition::by_key(section) {
            Some(s) if item < s.items.len() => self.set_rating(field, value),
            _ => Err(SurveyErrors::UnknownField(field)),
        }
    }

    /// Rates a field given by its name: `internet_0`, `value_price`, ...
    pub fn rate_field(&mut self, field: &str, value: u8) -> Result<(), SurveyErrors> {
        if field == VALUE_PRICE_FIELD {
            return self.set_rating(field.to_string(), value);
        }
        let (section, item) = field
            .rsplit_once('_')
            .ok_or_else(|| SurveyErrors::UnknownField(field.to_string()))?;
        let item = item
            .parse::<usize>()
            .map_err(|_| SurveyErrors::UnknownField(field.to_string()))?;
        self.rate(section, item, value)
    }

    pub fn liked_most(&mut self, text: &str) {
        self.liked_most = non_empty(text);
    }

    pub fn needs_improvement(&mut self, text: &str) {
        self.needs_improvement = non_empty(text);
    }

    pub fn if_manager(&mut self, text: &str) {
        self.if_manager = non_empty(text);
    }

    /// Creates the record, stamped with the given submission time.
    ///
    /// Fails if no NPS answer was given.
    pub fn build(&self, at: DateTime<Utc>) -> Result<SurveyRecord, SurveyErrors> {
        let nps = self.nps.ok_or(SurveyErrors::MissingNps)?;
        let fields: BTreeMap<String, JSValue> = self
            .ratings
            .iter()
            .map(|(k, v)| (k.clone(), JSValue::from(*v)))
            .collect();
        debug!("build: nps={} ratings={:?}", nps, self.ratings);
        Ok(SurveyRecord {
            nps: Some(nps),
            liked_most: self.liked_most.clone(),
            needs_improvement: self.needs_improvement.clone(),
            if_manager: self.if_manager.clone(),
            timestamp: Some(at),
            month: Some(month_label_of(&at)),
            fields,
        })
    }

    fn set_rating(&mut self, field: String, value: u8) -> Result<(), SurveyErrors> {
        if !(1..=5).contains(&value) {
            return Err(SurveyErrors::RatingOutOfRange { field, value });
        }
        self.ratings.insert(field, value);
        Ok(())
    }
}

fn non_empty(text: &str) -> Option<String> {
    let t = text.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}
