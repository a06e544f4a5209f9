// The dashboard: everything that is shown to the space managers.

use std::fmt::Write;

use serde::Serialize;

use crate::survey::*;

/// How many sections are listed as improvement priorities.
const PRIORITY_COUNT: usize = 3;
/// How many of the latest responses are shown.
const RECENT_COUNT: usize = 5;

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct RatedSection {
    #[serde(flatten)]
    pub score: SectionScore,
    pub status: Status,
}

/// One of the latest responses, as listed at the bottom of the dashboard.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentResponse {
    pub month: String,
    pub nps: Option<u8>,
    pub value_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked_most: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_improvement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_manager: Option<String>,
    #[serde(skip)]
    pub has_comments: bool,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Responses shown, after the month filter.
    pub responses: usize,
    /// All the months with responses, in the order they are first seen.
    pub months: Vec<String>,
    pub nps: Option<NpsResult>,
    pub nps_band: Option<NpsBand>,
    /// None when there are no responses.
    pub nbs: Option<f64>,
    pub nbs_status: Option<Status>,
    /// None when the value for the price was never rated.
    pub value_price: Option<f64>,
    pub sections: Vec<RatedSection>,
    pub priorities: Vec<RatedSection>,
    /// Always computed over all the responses.
    pub trend: Vec<MonthlyTrend>,
    /// Newest first.
    pub recent: Vec<RecentResponse>,
}

fn rated(score: SectionScore) -> RatedSection {
    let status = classify_status(score.average);
    RatedSection { score, status }
}

pub fn build_dashboard(
    records: &[SurveyRecord],
    month: Option<&str>,
    order: MonthOrder,
) -> Dashboard {
    let shown: Vec<SurveyRecord> = match month {
        Some(m) => filter_by_month(records, m),
        None => records.to_vec(),
    };
    debug!(
        "build_dashboard: {} responses, {} shown for month {:?}",
        records.len(),
        shown.len(),
        month
    );

    let nps = compute_nps(&shown);
    let nps_band = nps.as_ref().map(|n| NpsBand::of(n.score));
    let scores = compute_section_scores(&shown);
    let (nbs, nbs_status) = if shown.is_empty() {
        (None, None)
    } else {
        let avg = nbs_average(&scores);
        (Some(avg), Some(classify_status(avg)))
    };
    let vp = round2(value_price_average(&shown));
    let priorities: Vec<RatedSection> = rank_sections_by_need(&scores)
        .into_iter()
        .take(PRIORITY_COUNT)
        .map(rated)
        .collect();
    let recent: Vec<RecentResponse> = shown
        .iter()
        .rev()
        .take(RECENT_COUNT)
        .map(|r| RecentResponse {
            month: r.month_label(),
            nps: r.nps,
            value_price: r.value_price(),
            liked_most: r.liked_most.clone(),
            needs_improvement: r.needs_improvement.clone(),
            if_manager: r.if_manager.clone(),
            has_comments: r.has_comments(),
        })
        .collect();

    Dashboard {
        responses: shown.len(),
        months: available_months(records),
        nps,
        nps_band,
        nbs,
        nbs_status,
        value_price: if vp > 0.0 { Some(vp) } else { None },
        sections: scores.into_iter().map(rated).collect(),
        priorities,
        trend: compute_monthly_trend(records, order),
        recent,
    }
}

fn signed(score: i32) -> String {
    if score > 0 {
        format!("+{}", score)
    } else {
        score.to_string()
    }
}

fn or_dash(x: Option<f64>) -> String {
    match x {
        Some(v) => format!("{:.2}", v),
        None => "—".to_string(),
    }
}

pub fn render_text(title: &str, month: Option<&str>, d: &Dashboard) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}", title);
    let _ = writeln!(
        output,
        "{} responses ({})",
        d.responses,
        month.unwrap_or("all months")
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "## Net Promoter Score");
    match (&d.nps, &d.nps_band) {
        (Some(n), Some(band)) => {
            let _ = writeln!(output, "NPS {} ({})", signed(n.score), band.description());
            let _ = writeln!(
                output,
                "- promoters: {} ({}%)\n- passives: {} ({}%)\n- detractors: {} ({}%)",
                n.promoters,
                n.promoters_pct,
                n.passives,
                n.passives_pct,
                n.detractors,
                n.detractors_pct
            );
        }
        _ => {
            let _ = writeln!(output, "No NPS answers yet.");
        }
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Net Branch Score");
    match (d.nbs, &d.nbs_status) {
        (Some(nbs), Some(status)) => {
            let _ = writeln!(output, "NBS {:.2} / 5 ({})", nbs, status.label);
        }
        _ => {
            let _ = writeln!(output, "NBS —");
        }
    }
    let _ = writeln!(output, "Value for price: {}", or_dash(d.value_price));
    for s in d.sections.iter() {
        let _ = writeln!(
            output,
            "- {} {}: {:.2} ({})",
            s.score.icon, s.score.label, s.score.average, s.status.label
        );
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Improvement priorities");
    for (idx, s) in d.priorities.iter().enumerate() {
        let _ = writeln!(
            output,
            "{}. {} {:.2}",
            idx + 1,
            s.score.label,
            s.score.average
        );
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Monthly trend");
    if d.trend.is_empty() {
        let _ = writeln!(output, "No responses yet.");
    }
    for t in d.trend.iter() {
        let nps = t.nps.map(signed).unwrap_or_else(|| "—".to_string());
        let _ = writeln!(
            output,
            "- {}: NPS {} NBS {:.2} ({} responses)",
            t.month, nps, t.nbs, t.count
        );
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Latest responses");
    for r in d.recent.iter() {
        let nps = r
            .nps
            .map(|x| x.to_string())
            .unwrap_or_else(|| "—".to_string());
        let _ = writeln!(
            output,
            "- {}: NPS {} value for price {}",
            r.month,
            nps,
            or_dash(r.value_price)
        );
        if !r.has_comments {
            let _ = writeln!(output, "  no comments");
        }
        if let Some(t) = &r.liked_most {
            let _ = writeln!(output, "  liked most: {}", t);
        }
        if let Some(t) = &r.needs_improvement {
            let _ = writeln!(output, "  needs improvement: {}", t);
        }
        if let Some(t) = &r.if_manager {
            let _ = writeln!(output, "  if I were the manager: {}", t);
        }
    }

    output
}
