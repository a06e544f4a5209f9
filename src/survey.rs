use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_metrics::builder::RecordBuilder;
use survey_metrics::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{Args, Command, ExportArgs, ImportArgs, ReportArgs, SubmitArgs};
use crate::survey::config_reader::*;
use crate::survey::demo::demo_records;
use crate::survey::gate::AccessGate;
use crate::survey::io_common::{is_stdout, write_output};
use crate::survey::report::{build_dashboard, render_text, Dashboard};
use crate::survey::sink::{HttpSink, RecordSink};
use crate::survey::store::{JsonFileStore, RecordStore};

pub mod config_reader;
mod demo;
mod gate;
mod io_common;
mod io_json;
mod io_msforms;
mod report;
mod sink;
mod store;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error reading {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Invalid response at position {position}: {source}"))]
    InvalidRecord {
        source: serde_json::Error,
        position: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The spreadsheet has no data"))]
    EmptyExcel {},
    #[snafu(display("Several worksheets found ({names:?}), the worksheet name must be provided"))]
    ExcelWorksheetRequired { names: Vec<String> },
    #[snafu(display("Unexpected cell on line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Error reading the stored responses in {path}"))]
    ReadingStore {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing the stored responses in {path}"))]
    WritingStore {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing to JSON: {source}"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Cannot create a client for {url}: {source}"))]
    SinkClient { source: reqwest::Error, url: String },
    #[snafu(display("Could not send the response to {url}: {source}"))]
    SinkTransport { source: reqwest::Error, url: String },
    #[snafu(display("Invalid answer: {source}"))]
    Answer { source: SurveyErrors },
    #[snafu(display("Wrong or missing dashboard password"))]
    AccessDenied {},
    #[snafu(display("Unknown input type {input_type:?} (expected json or msforms)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Unknown month order {value:?} (expected firstSeen or chronological)"))]
    UnknownMonthOrder { value: String },
    #[snafu(display("Difference detected between calculated summary and reference summary {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

pub type BSurveyResult<T> = Result<T, Box<SurveyError>>;

pub const DEFAULT_STORE_KEY: &str = "survey_responses";
pub const DEFAULT_TITLE: &str = "Co-working satisfaction survey";
pub const DEFAULT_DEMO_COUNT: usize = 24;

/// The configuration file merged with the command line.
#[derive(Debug, Clone)]
pub struct Settings {
    pub title: String,
    pub store_directory: PathBuf,
    pub store_key: String,
    pub sink_url: Option<String>,
    pub sink_timeout: Option<Duration>,
    pub dashboard_password: Option<String>,
    pub month_order: MonthOrder,
    pub demo_count: usize,
    pub demo_seed: u32,
    pub output_directory: Option<PathBuf>,
}

impl Settings {
    /// Relative paths of the configuration file are relative to its directory.
    pub fn from_config(config: &SurveyConfig, root: &Path, store: Option<&str>) -> Settings {
        let store_directory = match (store, &config.store_directory) {
            (Some(s), _) => PathBuf::from(s),
            (None, Some(d)) => root.join(d),
            (None, None) => root.to_path_buf(),
        };
        Settings {
            title: config
                .output_settings
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            store_directory,
            store_key: config
                .store_key
                .clone()
                .unwrap_or_else(|| DEFAULT_STORE_KEY.to_string()),
            sink_url: config.sink_url.clone().filter(|s| !s.is_empty()),
            sink_timeout: config.sink_timeout_secs.map(Duration::from_secs),
            dashboard_password: config.dashboard_password.clone(),
            month_order: config.month_order.unwrap_or_default(),
            demo_count: config.demo_count.unwrap_or(DEFAULT_DEMO_COUNT),
            demo_seed: config.demo_seed.unwrap_or(0),
            output_directory: config
                .output_settings
                .output_directory
                .as_ref()
                .map(|d| root.join(d)),
        }
    }

    pub fn resolve(args: &Args) -> BSurveyResult<Settings> {
        let (config, root) = match &args.config {
            Some(p) => {
                let config = read_config(p)?;
                let root = Path::new(p)
                    .parent()
                    .map(|x| x.to_path_buf())
                    .unwrap_or_default();
                (config, root)
            }
            None => (SurveyConfig::default(), PathBuf::new()),
        };
        Ok(Settings::from_config(&config, &root, args.store.as_deref()))
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.store_directory, &self.store_key)
    }

    pub fn sink(&self, url: Option<&str>) -> SurveyResult<Option<Box<dyn RecordSink>>> {
        match url.or(self.sink_url.as_deref()) {
            Some(u) => {
                let sink: Box<dyn RecordSink> = Box::new(HttpSink::new(u, self.sink_timeout)?);
                Ok(Some(sink))
            }
            None => Ok(None),
        }
    }

    pub fn gate(&self) -> AccessGate {
        AccessGate::new(self.dashboard_password.clone())
    }

    /// Relative output paths go to the configured output directory, if any.
    pub fn output_path(&self, out: &str) -> PathBuf {
        let p = Path::new(out);
        match &self.output_directory {
            Some(d) if p.is_relative() => d.join(p),
            _ => p.to_path_buf(),
        }
    }
}

fn open_dashboard(settings: &Settings, password: Option<&str>) -> SurveyResult<()> {
    let mut gate = settings.gate();
    if let Some(p) = password {
        gate.unlock(p);
    }
    gate.require()
}

pub fn parse_month_order(value: &str) -> SurveyResult<MonthOrder> {
    match value {
        "firstSeen" | "first-seen" => Ok(MonthOrder::FirstSeen),
        "chronological" => Ok(MonthOrder::Chronological),
        x => UnknownMonthOrderSnafu { value: x }.fail(),
    }
}

/// Reads responses from a file, without touching the store.
pub fn read_responses(
    input: &str,
    input_type: Option<&str>,
    worksheet_name: Option<&str>,
) -> BSurveyResult<Vec<SurveyRecord>> {
    info!("read_responses: reading {} ({:?})", input, input_type);
    match input_type.unwrap_or("json") {
        "json" => io_json::read_json(input),
        "msforms" => io_msforms::read_msforms_responses(input, worksheet_name),
        x => Err(Box::new(SurveyError::UnknownInputType {
            input_type: x.to_string(),
        })),
    }
}

// `field=value`, for example `internet_0=4`.
fn parse_rating_arg(arg: &str) -> SurveyResult<(String, u8)> {
    let (field, value) = match arg.split_once('=') {
        Some(x) => x,
        None => whatever!("Invalid rating {:?}: expected field=value", arg),
    };
    let value: u8 = match value.trim().parse() {
        Ok(v) => v,
        Err(_) => whatever!("Invalid rating {:?}: the value must be between 1 and 5", arg),
    };
    Ok((field.trim().to_string(), value))
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SubmitOutcome {
    /// Stored, no sink configured.
    Stored,
    /// Stored and sent.
    Sent,
    /// Stored, but the copy could not be sent.
    SendFailed(String),
}

/// Records one response: first in the store, then in the sink.
///
/// Nothing is stored if the answers are invalid. A failure of the sink is
/// reported once and does not undo the local copy.
pub fn run_submit(
    sa: &SubmitArgs,
    store: &mut dyn RecordStore,
    sink: Option<&dyn RecordSink>,
    now: DateTime<Utc>,
) -> BSurveyResult<SubmitOutcome> {
    let mut builder = RecordBuilder::new();
    if let Some(nps) = sa.nps {
        builder = builder.nps(nps).context(AnswerSnafu {})?;
    }
    for arg in sa.ratings.iter() {
        let (field, value) = parse_rating_arg(arg)?;
        builder.rate_field(&field, value).context(AnswerSnafu {})?;
    }
    if let Some(v) = sa.value_price {
        builder
            .rate_field(VALUE_PRICE_FIELD, v)
            .context(AnswerSnafu {})?;
    }
    if let Some(t) = &sa.liked_most {
        builder.liked_most(t);
    }
    if let Some(t) = &sa.needs_improvement {
        builder.needs_improvement(t);
    }
    if let Some(t) = &sa.if_manager {
        builder.if_manager(t);
    }
    let record = builder.build(now).context(AnswerSnafu {})?;

    store.append(&record)?;
    info!("run_submit: response stored for {}", record.month_label());

    let outcome = match sink {
        None => SubmitOutcome::Stored,
        Some(s) => match s.submit(&record) {
            Ok(()) => SubmitOutcome::Sent,
            Err(e) => {
                warn!("run_submit: the response was only stored locally: {}", e);
                SubmitOutcome::SendFailed(e.to_string())
            }
        },
    };
    Ok(outcome)
}

fn summary_json(
    settings: &Settings,
    month: Option<&str>,
    order: MonthOrder,
    dashboard: &Dashboard,
) -> SurveyResult<JSValue> {
    let config = OutputConfig {
        title: settings.title.clone(),
        month: month.map(|m| m.to_string()),
        month_order: order,
    };
    let config_js = serde_json::to_value(&config).context(SerializingJsonSnafu {})?;
    let results_js = serde_json::to_value(dashboard).context(SerializingJsonSnafu {})?;
    Ok(json!({ "config": config_js, "results": results_js }))
}

/// Computes the dashboard, writes its summary and checks it against a
/// reference, as requested.
pub fn run_report(
    settings: &Settings,
    ra: &ReportArgs,
    store: &dyn RecordStore,
    now: DateTime<Utc>,
) -> BSurveyResult<Dashboard> {
    open_dashboard(settings, ra.password.as_deref())?;

    let records = if ra.demo {
        demo_records(settings.demo_count, settings.demo_seed, now)
    } else if let Some(input) = &ra.input {
        read_responses(
            input,
            ra.input_type.as_deref(),
            ra.excel_worksheet_name.as_deref(),
        )?
    } else {
        store.load()?
    };
    let order = match &ra.month_order {
        Some(o) => parse_month_order(o)?,
        None => settings.month_order,
    };
    let month = ra.month.as_deref();
    let dashboard = build_dashboard(&records, month, order);

    let summary = summary_json(settings, month, order, &dashboard)?;
    let pretty_js_stats =
        serde_json::to_string_pretty(&summary).context(SerializingJsonSnafu {})?;

    if let Some(out) = &ra.out {
        if is_stdout(out) {
            println!("{}", pretty_js_stats);
        } else {
            write_output(&settings.output_path(out), &pretty_js_stats)?;
        }
    }

    // The reference summary, if provided for comparison
    if let Some(reference) = &ra.reference {
        let summary_ref = read_summary(reference)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return Err(Box::new(SurveyError::ReferenceMismatch {
                path: reference.clone(),
            }));
        }
        info!("run_report: summary matches {}", reference);
    }
    Ok(dashboard)
}

/// Adds the responses of a file to the store, or replaces the store with them.
///
/// The file is read in full first: the store is left as-is if any response
/// is invalid.
pub fn run_import(
    settings: &Settings,
    ia: &ImportArgs,
    store: &mut dyn RecordStore,
) -> BSurveyResult<usize> {
    open_dashboard(settings, ia.password.as_deref())?;
    let records = read_responses(
        &ia.input,
        ia.input_type.as_deref(),
        ia.excel_worksheet_name.as_deref(),
    )?;
    if ia.replace {
        store.replace(&records)?;
    } else {
        store.extend(&records)?;
    }
    info!(
        "run_import: {} responses imported (replace: {})",
        records.len(),
        ia.replace
    );
    Ok(records.len())
}

pub fn run_export(
    settings: &Settings,
    ea: &ExportArgs,
    store: &dyn RecordStore,
) -> BSurveyResult<()> {
    open_dashboard(settings, ea.password.as_deref())?;
    let records = store.load()?;
    let js = serde_json::to_string_pretty(&records).context(SerializingJsonSnafu {})?;
    match ea.out.as_deref() {
        Some(out) if !is_stdout(out) => write_output(&settings.output_path(out), &js)?,
        _ => println!("{}", js),
    }
    info!("run_export: {} responses exported", records.len());
    Ok(())
}

pub fn run(args: &Args) -> BSurveyResult<()> {
    let settings = Settings::resolve(args)?;
    debug!(
        "run: store: {:?} sink: {:?}",
        settings.store().path(),
        settings.sink_url
    );
    let mut store = settings.store();
    match &args.command {
        Command::Submit(sa) => {
            let sink = settings.sink(sa.sink_url.as_deref())?;
            match run_submit(sa, &mut store, sink.as_deref(), Utc::now())? {
                SubmitOutcome::Stored => println!("Response saved."),
                SubmitOutcome::Sent => println!("Response saved and sent."),
                SubmitOutcome::SendFailed(msg) => {
                    eprintln!("Response saved locally, but it could not be sent: {}", msg)
                }
            }
        }
        Command::Report(ra) => {
            let dashboard = run_report(&settings, ra, &store, Utc::now())?;
            // Keep the standard output clean when the summary goes there.
            let json_on_stdout = ra.out.as_deref().map(is_stdout).unwrap_or(false);
            if !json_on_stdout {
                print!("{}", render_text(&settings.title, ra.month.as_deref(), &dashboard));
            }
        }
        Command::Import(ia) => {
            let count = run_import(&settings, ia, &mut store)?;
            println!("{} responses imported.", count);
        }
        Command::Export(ea) => run_export(&settings, ea, &store)?,
    }
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::survey::store::MemoryStore;
    use crate::survey::sink::HttpSink;
    use chrono::TimeZone;
    use clap::Parser;
    use snafu::ErrorCompat;
    use std::fs;

    /// A fresh directory for one test.
    pub fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "cowork-survey-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
    }

    fn test_dir() -> String {
        format!("{}/tests", env!("CARGO_MANIFEST_DIR"))
    }

    fn run_report_test(test_name: &str, extra: &[&str]) -> BSurveyResult<()> {
        let config = format!("{}/{}/{}_config.json", test_dir(), test_name, test_name);
        let summary = format!(
            "{}/{}/{}_expected_summary.json",
            test_dir(),
            test_name,
            test_name
        );
        let mut argv: Vec<&str> = vec!["cowork-survey", "--config", config.as_str(), "report"];
        argv.extend_from_slice(extra);
        argv.push("--reference");
        argv.push(summary.as_str());
        let args = Args::parse_from(argv);
        let settings = Settings::resolve(&args)?;
        let store = settings.store();
        match &args.command {
            Command::Report(ra) => run_report(&settings, ra, &store, now()).map(|_| ()),
            x => unreachable!("not a report: {:?}", x),
        }
    }

    pub fn test_wrapper(test_name: &str, extra: &[&str]) {
        let _ = env_logger::builder().is_test(true).try_init();
        info!("Running test {}", test_name);
        if let Err(e) = run_report_test(test_name, extra) {
            warn!("Error occured {:?}", e);
            eprintln!("An error occured {}", e);
            if let Some(bt) = ErrorCompat::backtrace(e.as_ref()) {
                eprintln!("trace: {}", bt);
            }
            panic!("test {} failed: {}", test_name, e);
        }
    }

    fn command(name: &str, argv: &[&str]) -> Command {
        let mut full: Vec<&str> = vec!["cowork-survey", name];
        full.extend_from_slice(argv);
        Args::parse_from(full).command
    }

    fn submit_args(argv: &[&str]) -> SubmitArgs {
        match command("submit", argv) {
            Command::Submit(sa) => sa,
            x => unreachable!("not a submit: {:?}", x),
        }
    }

    fn report_args(argv: &[&str]) -> ReportArgs {
        match command("report", argv) {
            Command::Report(ra) => ra,
            x => unreachable!("not a report: {:?}", x),
        }
    }

    fn import_args(argv: &[&str]) -> ImportArgs {
        match command("import", argv) {
            Command::Import(ia) => ia,
            x => unreachable!("not an import: {:?}", x),
        }
    }

    #[test]
    fn reference_scenario() {
        test_wrapper("reference_scenario", &[]);
    }

    #[test]
    fn mixed_months_chronological() {
        test_wrapper("mixed_months", &["--month-order", "chronological"]);
    }

    #[test]
    fn mixed_months_filtered() {
        test_wrapper("mixed_months_filtered", &["--month", "September 2026"]);
    }

    #[test]
    fn reference_mismatch_is_an_error() {
        // The fixture expects the chronological order, the default is first seen.
        let res = run_report_test("mixed_months", &[]);
        assert!(matches!(
            res.map_err(|e| *e),
            Err(SurveyError::ReferenceMismatch { .. })
        ));
    }

    #[test]
    fn submit_full_response() {
        let sa = submit_args(&[
            "--nps",
            "9",
            "--rate",
            "internet_0=4",
            "--rate",
            "catering_4=2",
            "--value-price",
            "5",
            "--liked-most",
            "The quiet room",
        ]);
        let mut store = MemoryStore::default();
        let outcome = run_submit(&sa, &mut store, None, now()).unwrap();
        assert_eq!(outcome, SubmitOutcome::Stored);
        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.nps, Some(9));
        assert_eq!(r.rating("internet_0"), Some(4.0));
        assert_eq!(r.rating("catering_4"), Some(2.0));
        assert_eq!(r.value_price(), Some(5.0));
        assert_eq!(r.liked_most.as_deref(), Some("The quiet room"));
        assert_eq!(r.month.as_deref(), Some("October 2026"));
        assert_eq!(r.timestamp, Some(now()));
    }

    #[test]
    fn submit_without_nps_stores_nothing() {
        let sa = submit_args(&["--rate", "internet_0=4"]);
        let mut store = MemoryStore::default();
        let res = run_submit(&sa, &mut store, None, now());
        assert!(matches!(
            res.map_err(|e| *e),
            Err(SurveyError::Answer {
                source: SurveyErrors::MissingNps
            })
        ));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn submit_invalid_rating_stores_nothing() {
        let mut store = MemoryStore::default();
        for bad in ["internet_0=6", "internet_9=3", "internet_0", "wifi_0=3"] {
            let sa = submit_args(&["--nps", "5", "--rate", bad]);
            assert!(run_submit(&sa, &mut store, None, now()).is_err(), "{}", bad);
        }
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn failing_sink_keeps_the_response() {
        let sa = submit_args(&["--nps", "2"]);
        let mut store = MemoryStore::default();
        let url = crate::survey::sink::tests::closing_url();
        let sink = HttpSink::new(&url, Some(Duration::from_secs(5))).unwrap();
        let outcome = run_submit(&sa, &mut store, Some(&sink as &dyn RecordSink), now()).unwrap();
        assert!(matches!(outcome, SubmitOutcome::SendFailed(_)));
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn rating_arguments() {
        assert_eq!(
            parse_rating_arg("internet_0=4").unwrap(),
            ("internet_0".to_string(), 4)
        );
        assert_eq!(
            parse_rating_arg(" value_price = 5").unwrap(),
            ("value_price".to_string(), 5)
        );
        assert!(parse_rating_arg("internet_0").is_err());
        assert!(parse_rating_arg("internet_0=four").is_err());
    }

    #[test]
    fn month_orders() {
        assert_eq!(parse_month_order("firstSeen").unwrap(), MonthOrder::FirstSeen);
        assert_eq!(
            parse_month_order("chronological").unwrap(),
            MonthOrder::Chronological
        );
        assert!(matches!(
            parse_month_order("alphabetical"),
            Err(SurveyError::UnknownMonthOrder { .. })
        ));
    }

    #[test]
    fn settings_from_config() {
        let config: SurveyConfig = serde_json::from_str(
            r#"{"storeDirectory": "data", "monthOrder": "chronological",
                "outputSettings": {"outputDirectory": "out"}}"#,
        )
        .unwrap();
        let s = Settings::from_config(&config, Path::new("/srv/survey"), None);
        assert_eq!(
            s.store().path(),
            Path::new("/srv/survey/data/survey_responses.json")
        );
        assert_eq!(s.month_order, MonthOrder::Chronological);
        assert_eq!(s.title, DEFAULT_TITLE);
        assert_eq!(s.demo_count, 24);
        assert_eq!(
            s.output_path("summary.json"),
            Path::new("/srv/survey/out/summary.json")
        );
        assert_eq!(s.output_path("/tmp/x.json"), Path::new("/tmp/x.json"));

        let s = Settings::from_config(&config, Path::new("/srv/survey"), Some("/var/lib/survey"));
        assert_eq!(
            s.store().path(),
            Path::new("/var/lib/survey/survey_responses.json")
        );
    }

    #[test]
    fn dashboard_commands_need_the_password() {
        let config: SurveyConfig =
            serde_json::from_str(r#"{"dashboardPassword": "letmein"}"#).unwrap();
        let settings = Settings::from_config(&config, Path::new(""), None);
        let store = MemoryStore::default();
        let denied = run_report(&settings, &report_args(&[]), &store, now());
        assert!(matches!(
            denied.map_err(|e| *e),
            Err(SurveyError::AccessDenied {})
        ));
        let wrong = run_report(&settings, &report_args(&["--password", "nope"]), &store, now());
        assert!(wrong.is_err());
        let ok = run_report(&settings, &report_args(&["--password", "letmein"]), &store, now()).unwrap();
        assert_eq!(ok.responses, 0);
    }

    #[test]
    fn demo_report() {
        let settings = Settings::from_config(&SurveyConfig::default(), Path::new(""), None);
        let store = MemoryStore::default();
        let d = run_report(&settings, &report_args(&["--demo"]), &store, now()).unwrap();
        assert_eq!(d.responses, DEFAULT_DEMO_COUNT);
        assert_eq!(d.nps.unwrap().total, DEFAULT_DEMO_COUNT);
        assert_eq!(d.recent.len(), 5);
    }

    #[test]
    fn import_then_export() {
        let dir = scratch_dir("import_export");
        let config: SurveyConfig = SurveyConfig::default();
        let settings = Settings::from_config(&config, &dir, None);
        let mut store = settings.store();

        let input = format!("{}/reference_scenario/responses.json", test_dir());
        let ia = import_args(&["--input", input.as_str()]);
        assert_eq!(run_import(&settings, &ia, &mut store).unwrap(), 10);
        assert_eq!(run_import(&settings, &ia, &mut store).unwrap(), 10);
        assert_eq!(store.load().unwrap().len(), 20);

        let out = dir.join("export.json").display().to_string();
        let ea = match command("export", &["--out", out.as_str()]) {
            Command::Export(ea) => ea,
            x => unreachable!("not an export: {:?}", x),
        };
        run_export(&settings, &ea, &store).unwrap();

        let exported = io_json::read_json(&out).unwrap();
        assert_eq!(exported, store.load().unwrap());
        let before = build_dashboard(&store.load().unwrap(), None, MonthOrder::FirstSeen);
        let after = build_dashboard(&exported, None, MonthOrder::FirstSeen);
        assert_eq!(before, after);

        // Replacing with the export gives back the same store.
        let ia = import_args(&["--input", out.as_str(), "--replace"]);
        assert_eq!(run_import(&settings, &ia, &mut store).unwrap(), 20);
        assert_eq!(store.load().unwrap(), exported);
    }

    #[test]
    fn invalid_import_leaves_the_store() {
        let dir = scratch_dir("invalid_import");
        fs::create_dir_all(&dir).unwrap();
        let bad = dir.join("bad.json");
        fs::write(&bad, r#"[{"nps": 4}, {"nps": 11}]"#).unwrap();
        let settings = Settings::from_config(&SurveyConfig::default(), &dir, None);
        let mut store = settings.store();
        store
            .append(&SurveyRecord {
                nps: Some(7),
                ..Default::default()
            })
            .unwrap();
        let bad = bad.display().to_string();
        let ia = import_args(&["--input", bad.as_str()]);
        assert!(matches!(
            run_import(&settings, &ia, &mut store).map_err(|e| *e),
            Err(SurveyError::InvalidRecord { position: 1, .. })
        ));
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
