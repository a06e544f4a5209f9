// Generated responses to try the dashboard without real data.

use std::collections::BTreeMap;

use chrono::Duration;

use crate::survey::*;

const DEMO_LIKED: [&str; 3] = [
    "Fast internet and a quiet room",
    "The staff are very helpful",
    "Clean space and good coffee",
];

const DEMO_IMPROVE: [&str; 3] = [
    "More comfortable chairs",
    "Better ventilation in the afternoon",
    "A wider choice of snacks",
];

const DEMO_MANAGER: [&str; 3] = [
    "Add a second meeting room",
    "Offer a monthly membership discount",
    "Open earlier in the morning",
];

// A number in 0..n, always the same for a given seed, record and field.
fn pick(seed: u32, idx: usize, field: &str, n: u32) -> u32 {
    let digest = sha256::digest(format!("{:08}{:08}{}", seed, idx, field));
    let x = u32::from_str_radix(&digest[..8], 16).unwrap_or(0);
    x % n
}

/// Creates `count` responses, the first one at `now` and each following one
/// three days before the previous one.
pub fn demo_records(count: usize, seed: u32, now: DateTime<Utc>) -> Vec<SurveyRecord> {
    let mut res: Vec<SurveyRecord> = Vec::with_capacity(count);
    for idx in 0..count {
        let ts = now - Duration::days(3 * idx as i64);
        let mut fields: BTreeMap<String, JSValue> = BTreeMap::new();
        for section in SECTIONS.iter() {
            for field in section.field_keys() {
                let rating = 2 + pick(seed, idx, &field, 4);
                fields.insert(field, JSValue::from(rating));
            }
        }
        fields.insert(
            VALUE_PRICE_FIELD.to_string(),
            JSValue::from(2 + pick(seed, idx, VALUE_PRICE_FIELD, 4)),
        );
        let nps = pick(seed, idx, "nps", 11) as u8;
        res.push(SurveyRecord {
            nps: Some(nps),
            liked_most: Some(DEMO_LIKED[idx % 3].to_string()),
            needs_improvement: Some(DEMO_IMPROVE[idx % 3].to_string()),
            if_manager: Some(DEMO_MANAGER[idx % 3].to_string()),
            timestamp: Some(ts),
            month: Some(month_label_of(&ts)),
            fields,
        });
    }
    debug!("demo_records: {} responses with seed {}", count, seed);
    res
}
