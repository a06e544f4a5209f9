use serde::{Deserialize, Serialize};

use crate::survey::io_common::read_input_text;
use crate::survey::*;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "title")]
    pub title: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

/// The configuration block echoed at the top of every summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub title: String,
    pub month: Option<String>,
    #[serde(rename = "monthOrder")]
    pub month_order: MonthOrder,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "storeDirectory")]
    pub store_directory: Option<String>,
    #[serde(rename = "storeKey")]
    pub store_key: Option<String>,
    #[serde(rename = "sinkUrl")]
    pub sink_url: Option<String>,
    #[serde(rename = "sinkTimeoutSecs")]
    pub sink_timeout_secs: Option<u64>,
    #[serde(rename = "dashboardPassword")]
    pub dashboard_password: Option<String>,
    #[serde(rename = "monthOrder")]
    pub month_order: Option<MonthOrder>,
    #[serde(rename = "demoCount")]
    pub demo_count: Option<usize>,
    #[serde(rename = "demoSeed")]
    pub demo_seed: Option<u32>,
}

pub fn read_config(path: &str) -> BSurveyResult<SurveyConfig> {
    let contents = read_input_text(path)?;
    let config: SurveyConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    // The password is not logged.
    debug!(
        "read_config: {} store: {:?}/{:?} sink: {:?}",
        path, config.store_directory, config.store_key, config.sink_url
    );
    Ok(config)
}

pub fn read_summary(path: &str) -> BSurveyResult<JSValue> {
    let contents = read_input_text(path)?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_summary: {}", path);
    Ok(js)
}
