pub mod builder;
mod config;
pub mod manual;
mod record;
use log::{debug, info};

use std::collections::HashMap;

use chrono::{DateTime, Utc};

pub use crate::config::*;
pub use crate::record::month_label_of;

// Rounds half-way values up, towards positive infinity.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Rounds to two decimals, the way the value is written with two decimals.
///
/// The exact binary value is rounded, so `1.075` (stored as 1.07499...)
/// becomes 1.07. Exact ties, such as 4.125, are rounded up.
pub fn round2(x: f64) -> f64 {
    let eighths = x * 8.0;
    if eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        return round_half_up(x * 100.0) / 100.0;
    }
    format!("{:.2}", x).parse().unwrap_or(x)
}

fn percent(count: usize, total: usize) -> u32 {
    round_half_up(count as f64 / total as f64 * 100.0) as u32
}

/// Computes the Net Promoter Score of the responses.
///
/// Only the responses with a NPS answer are considered. Returns None if there
/// are no such responses.
///
/// ```
/// use survey_metrics::{compute_nps, SurveyRecord};
///
/// let records: Vec<SurveyRecord> = [10, 9, 7, 2]
///     .iter()
///     .map(|x| SurveyRecord { nps: Some(*x), ..Default::default() })
///     .collect();
/// let nps = compute_nps(&records).unwrap();
/// assert_eq!(nps.score, 25);
/// assert_eq!((nps.promoters, nps.passives, nps.detractors), (2, 1, 1));
/// ```
pub fn compute_nps(records: &[SurveyRecord]) -> Option<NpsResult> {
    let mut promoters = 0;
    let mut passives = 0;
    let mut detractors = 0;
    for class in records.iter().filter_map(|r| r.nps_class()) {
        match class {
            NpsClass::Promoter => promoters += 1,
            NpsClass::Passive => passives += 1,
            NpsClass::Detractor => detractors += 1,
        }
    }
    let total = promoters + passives + detractors;
    debug!(
        "compute_nps: {} responses, {} with a NPS answer",
        records.len(),
        total
    );
    if total == 0 {
        return None;
    }
    let t = total as f64;
    let score = round_half_up((promoters as f64 / t - detractors as f64 / t) * 100.0) as i32;
    Some(NpsResult {
        score,
        promoters_pct: percent(promoters, total),
        passives_pct: percent(passives, total),
        detractors_pct: percent(detractors, total),
        promoters,
        passives,
        detractors,
        total,
    })
}

/// The average of all the ratings found under the given fields.
///
/// Unrated items (missing, zero or not a number) are left out of the average
/// instead of counting as zero. Returns 0 when nothing was rated; a real
/// average is never below 1.
pub fn compute_section_average<S: AsRef<str>>(records: &[SurveyRecord], field_keys: &[S]) -> f64 {
    let mut sum = 0.0;
    let mut count: usize = 0;
    for r in records.iter() {
        for k in field_keys.iter() {
            if let Some(x) = r.rating(k.as_ref()) {
                sum += x;
                count += 1;
            }
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// The average "value for price" rating, 0 when nothing was rated.
pub fn value_price_average(records: &[SurveyRecord]) -> f64 {
    compute_section_average(records, &[VALUE_PRICE_FIELD])
}

/// The average score of each section, in the order of [SECTIONS].
///
/// All the sections are returned, even the ones that were not rated.
pub fn compute_section_scores(records: &[SurveyRecord]) -> Vec<SectionScore> {
    SECTIONS
        .iter()
        .map(|s| SectionScore {
            key: s.key.to_string(),
            label: s.label.to_string(),
            icon: s.icon.to_string(),
            average: round2(compute_section_average(records, &s.field_keys())),
        })
        .collect()
}

/// The overall NBS: the mean of the section averages, rounded to two decimals.
///
/// Sections without any rating count as 0.
pub fn nbs_average(scores: &[SectionScore]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let total: f64 = scores.iter().map(|s| s.average).sum();
    round2(total / scores.len() as f64)
}

/// Classifies an average rating. The highest threshold reached wins.
pub fn classify_status(average: f64) -> Status {
    if average >= 4.5 {
        Status {
            label: "Competitive excellence",
            tier: StatusTier::Excellent,
        }
    } else if average >= 4.0 {
        Status {
            label: "Strong",
            tier: StatusTier::Strong,
        }
    } else if average >= 3.0 {
        Status {
            label: "Needs improvement",
            tier: StatusTier::NeedsImprovement,
        }
    } else {
        Status {
            label: "Operational risk",
            tier: StatusTier::OperationalRisk,
        }
    }
}

/// Sorts the sections from the lowest to the highest average.
///
/// The sort is stable: sections with the same average keep their order.
pub fn rank_sections_by_need(scores: &[SectionScore]) -> Vec<SectionScore> {
    let mut res = scores.to_vec();
    res.sort_by(|a, b| {
        a.average
            .partial_cmp(&b.average)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    res
}

/// The distinct month labels, in the order they are first seen.
pub fn available_months(records: &[SurveyRecord]) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    for r in records.iter() {
        let m = r.month_label();
        if !res.contains(&m) {
            res.push(m);
        }
    }
    res
}

/// The responses that belong to the given month.
pub fn filter_by_month(records: &[SurveyRecord], month: &str) -> Vec<SurveyRecord> {
    records
        .iter()
        .filter(|r| r.month_label() == month)
        .cloned()
        .collect()
}

struct MonthGroup {
    month: String,
    earliest: Option<DateTime<Utc>>,
    records: Vec<SurveyRecord>,
}

/// Computes the NPS score and the NBS average of each month.
///
/// Every month is computed independently from the others. A month with no NPS
/// answer still gets its NBS average.
pub fn compute_monthly_trend(records: &[SurveyRecord], order: MonthOrder) -> Vec<MonthlyTrend> {
    let mut groups: Vec<MonthGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for r in records.iter() {
        let month = r.month_label();
        let idx = *index.entry(month.clone()).or_insert_with(|| {
            groups.push(MonthGroup {
                month,
                earliest: None,
                records: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];
        group.earliest = match (group.earliest, r.timestamp) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        group.records.push(r.clone());
    }

    if order == MonthOrder::Chronological {
        // Undated months are all equal and stay in first-seen order.
        groups.sort_by_key(|g| (g.earliest.is_none(), g.earliest));
    }
    info!(
        "compute_monthly_trend: {} responses in {} months ({:?})",
        records.len(),
        groups.len(),
        order
    );

    groups
        .iter()
        .map(|g| {
            let nps = compute_nps(&g.records).map(|n| n.score);
            let nbs = nbs_average(&compute_section_scores(&g.records));
            debug!(
                "compute_monthly_trend: {}: {} responses nps={:?} nbs={}",
                g.month,
                g.records.len(),
                nps,
                nbs
            );
            MonthlyTrend {
                month: g.month.clone(),
                nps,
                nbs,
                count: g.records.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn nps_records(scores: &[u8]) -> Vec<SurveyRecord> {
        scores
            .iter()
            .map(|x| SurveyRecord {
                nps: Some(*x),
                ..Default::default()
            })
            .collect()
    }

    fn rated(nps: Option<u8>, month: &str, ratings: &[(&str, i64)]) -> SurveyRecord {
        let mut r = SurveyRecord {
            nps,
            month: Some(month.to_string()),
            ..Default::default()
        };
        for (k, v) in ratings {
            r.fields.insert(k.to_string(), json!(v));
        }
        r
    }

    fn score(key: &str, average: f64) -> SectionScore {
        SectionScore {
            key: key.to_string(),
            label: key.to_string(),
            icon: "".to_string(),
            average,
        }
    }

    #[test]
    fn nps_reference_scenario() {
        init();
        let records = nps_records(&[9, 9, 10, 8, 7, 6, 3, 2, 9, 10]);
        let nps = compute_nps(&records).unwrap();
        assert_eq!(nps.promoters, 5);
        assert_eq!(nps.passives, 2);
        assert_eq!(nps.detractors, 3);
        assert_eq!(nps.total, 10);
        assert_eq!(nps.score, 20);
        assert_eq!(
            (nps.promoters_pct, nps.passives_pct, nps.detractors_pct),
            (50, 20, 30)
        );
    }

    #[test]
    fn nps_none_without_answers() {
        assert_eq!(compute_nps(&[]), None);
        let records = vec![SurveyRecord::default(), rated(None, "May 2026", &[("vibe_0", 4)])];
        assert_eq!(compute_nps(&records), None);
        let mut records = records;
        records.push(SurveyRecord {
            nps: Some(0),
            ..Default::default()
        });
        assert_eq!(compute_nps(&records).map(|n| n.total), Some(1));
    }

    #[test]
    fn nps_bounds() {
        assert_eq!(compute_nps(&nps_records(&[9, 10, 9])).unwrap().score, 100);
        assert_eq!(compute_nps(&nps_records(&[0, 6, 3])).unwrap().score, -100);
        assert_eq!(compute_nps(&nps_records(&[7, 8])).unwrap().score, 0);
    }

    #[test]
    fn nps_counts_add_up() {
        let cases: Vec<Vec<u8>> = vec![
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
            vec![9, 0, 8],
            vec![10, 10, 10, 10, 10, 10, 6],
            vec![7],
        ];
        for scores in cases {
            let nps = compute_nps(&nps_records(&scores)).unwrap();
            assert_eq!(nps.promoters + nps.passives + nps.detractors, nps.total);
            let expected = round_half_up(
                (nps.promoters as f64 - nps.detractors as f64) / nps.total as f64 * 100.0,
            ) as i32;
            assert_eq!(nps.score, expected);
            assert!((-100..=100).contains(&nps.score));
        }
    }

    #[test]
    fn nps_half_values_round_up() {
        // 1 promoter, 3 passives, 4 detractors: -37.5
        let nps = compute_nps(&nps_records(&[9, 7, 7, 8, 1, 2, 3, 4])).unwrap();
        assert_eq!(nps.score, -37);
        // 1 promoter, 7 passives: 12.5
        let nps = compute_nps(&nps_records(&[10, 7, 7, 7, 8, 8, 8, 8])).unwrap();
        assert_eq!(nps.score, 13);
    }

    #[test]
    fn section_average_skips_unrated() {
        let r = rated(
            Some(5),
            "May 2026",
            &[("staff_0", 0), ("staff_1", 5), ("staff_2", 0), ("staff_3", 3)],
        );
        let avg = compute_section_average(&[r], &["staff_0", "staff_1", "staff_2", "staff_3"]);
        assert_eq!(avg, 4.0);
    }

    #[test]
    fn section_average_zero_without_ratings() {
        let r = rated(Some(5), "May 2026", &[("staff_0", 0)]);
        assert_eq!(compute_section_average(&[r], &["staff_0", "staff_1"]), 0.0);
        assert_eq!(compute_section_average::<&str>(&[], &[]), 0.0);
    }

    #[test]
    fn value_price_uses_the_same_rule() {
        let records = vec![
            rated(None, "May 2026", &[("value_price", 4)]),
            rated(None, "May 2026", &[("value_price", 0)]),
            rated(None, "May 2026", &[("value_price", 5)]),
        ];
        assert_eq!(value_price_average(&records), 4.5);
    }

    #[test]
    fn section_scores_always_complete() {
        let scores = compute_section_scores(&[]);
        let keys: Vec<&str> = scores.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["internet", "chairs", "vibe", "staff", "catering", "clean"]
        );
        assert!(scores.iter().all(|s| s.average == 0.0));
        assert_eq!(nbs_average(&scores), 0.0);
    }

    #[test]
    fn section_scores_are_rounded() {
        let records = vec![
            rated(None, "May 2026", &[("internet_0", 5), ("internet_1", 4), ("internet_2", 4)]),
            rated(None, "May 2026", &[("chairs_0", 3)]),
        ];
        let scores = compute_section_scores(&records);
        assert_eq!(scores[0].average, 4.33);
        assert_eq!(scores[1].average, 3.0);
        assert_eq!(scores[2].average, 0.0);
        // (4.33 + 3) / 6
        assert_eq!(nbs_average(&scores), 1.22);
    }

    #[test]
    fn rounding_uses_the_written_value() {
        // 43 / 40 = 1.075, stored just below the tie.
        let mut records: Vec<SurveyRecord> = (0..37)
            .map(|_| rated(None, "May 2026", &[("clean_0", 1)]))
            .collect();
        records.extend((0..3).map(|_| rated(None, "May 2026", &[("clean_0", 2)])));
        let scores = compute_section_scores(&records);
        assert_eq!(scores[5].key, "clean");
        assert_eq!(scores[5].average, 1.07);

        assert_eq!(round2(4.125), 4.13);
        assert_eq!(round2(0.625), 0.63);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(classify_status(5.0).tier, StatusTier::Excellent);
        assert_eq!(classify_status(4.5).tier, StatusTier::Excellent);
        assert_eq!(classify_status(4.49).tier, StatusTier::Strong);
        assert_eq!(classify_status(4.0).tier, StatusTier::Strong);
        assert_eq!(classify_status(3.99).tier, StatusTier::NeedsImprovement);
        assert_eq!(classify_status(3.0).tier, StatusTier::NeedsImprovement);
        assert_eq!(classify_status(2.99).tier, StatusTier::OperationalRisk);
        assert_eq!(classify_status(0.0).tier, StatusTier::OperationalRisk);
        assert_eq!(classify_status(f64::NAN).tier, StatusTier::OperationalRisk);
        assert_eq!(classify_status(4.5).label, "Competitive excellence");
    }

    #[test]
    fn ranking_is_stable() {
        let scores = vec![
            score("internet", 4.0),
            score("chairs", 3.5),
            score("vibe", 4.0),
            score("staff", 2.0),
            score("catering", 3.5),
            score("clean", 4.8),
        ];
        let ranked = rank_sections_by_need(&scores);
        let keys: Vec<&str> = ranked.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["staff", "chairs", "catering", "internet", "vibe", "clean"]
        );
    }

    #[test]
    fn monthly_trend_first_seen_order() {
        init();
        let records = vec![
            rated(Some(10), "March 2026", &[("clean_0", 5)]),
            rated(Some(2), "January 2026", &[("clean_0", 3)]),
            rated(Some(9), "March 2026", &[("clean_0", 4)]),
            rated(None, "February 2026", &[("clean_0", 2)]),
        ];
        let trend = compute_monthly_trend(&records, MonthOrder::FirstSeen);
        let months: Vec<&str> = trend.iter().map(|t| t.month.as_str()).collect();
        assert_eq!(months, vec!["March 2026", "January 2026", "February 2026"]);

        assert_eq!(trend[0].nps, Some(100));
        assert_eq!(trend[0].count, 2);
        // clean = 4.5, the other five sections are 0
        assert_eq!(trend[0].nbs, 0.75);
        assert_eq!(trend[1].nps, Some(-100));
        assert_eq!(trend[2].nps, None);
        assert_eq!(trend[2].nbs, 0.33);
        assert_eq!(trend[2].count, 1);
    }

    #[test]
    fn monthly_trend_chronological_order() {
        let at = |m: u32| Utc.with_ymd_and_hms(2026, m, 10, 12, 0, 0).unwrap();
        let mut records = vec![
            SurveyRecord {
                nps: Some(9),
                timestamp: Some(at(3)),
                ..Default::default()
            },
            SurveyRecord {
                nps: Some(5),
                month: Some("Legacy".to_string()),
                ..Default::default()
            },
            SurveyRecord {
                nps: Some(7),
                timestamp: Some(at(1)),
                ..Default::default()
            },
        ];
        records.push(SurveyRecord {
            nps: Some(10),
            timestamp: Some(at(3)),
            ..Default::default()
        });
        let trend = compute_monthly_trend(&records, MonthOrder::Chronological);
        let months: Vec<&str> = trend.iter().map(|t| t.month.as_str()).collect();
        assert_eq!(months, vec!["January 2026", "March 2026", "Legacy"]);
        assert_eq!(trend[1].count, 2);

        let trend = compute_monthly_trend(&records, MonthOrder::FirstSeen);
        let months: Vec<&str> = trend.iter().map(|t| t.month.as_str()).collect();
        assert_eq!(months, vec!["March 2026", "Legacy", "January 2026"]);
    }

    #[test]
    fn months_and_filter() {
        let records = vec![
            rated(Some(10), "March 2026", &[]),
            rated(Some(2), "January 2026", &[]),
            rated(Some(9), "March 2026", &[]),
        ];
        assert_eq!(
            available_months(&records),
            vec!["March 2026".to_string(), "January 2026".to_string()]
        );
        let march = filter_by_month(&records, "March 2026");
        assert_eq!(march.len(), 2);
        assert_eq!(compute_nps(&march).unwrap().score, 100);
        assert!(filter_by_month(&records, "April 2026").is_empty());
    }

    #[test]
    fn nps_classes_and_bands() {
        assert_eq!(NpsClass::of(6), NpsClass::Detractor);
        assert_eq!(NpsClass::of(7), NpsClass::Passive);
        assert_eq!(NpsClass::of(8), NpsClass::Passive);
        assert_eq!(NpsClass::of(9), NpsClass::Promoter);
        assert_eq!(NpsBand::of(50), NpsBand::Excellent);
        assert_eq!(NpsBand::of(0), NpsBand::Good);
        assert_eq!(NpsBand::of(-1), NpsBand::Critical);
    }
}
