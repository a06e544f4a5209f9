use clap::{Parser, Subcommand};

/// Survey intake and NPS / NBS dashboard for a co-working space.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The configuration of the survey, in JSON format.
    /// See the manual for the options.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory, optional) Where the responses are stored. Setting this option overrides
    /// the directory that may be specified with the --config option.
    #[clap(long, value_parser)]
    pub store: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Records one survey response and sends a copy to the configured sink.
    Submit(SubmitArgs),
    /// Computes the dashboard: NPS, section scores, monthly trend and priorities.
    Report(ReportArgs),
    /// Adds responses from a JSON file or a spreadsheet to the store.
    Import(ImportArgs),
    /// Writes all the stored responses as a JSON array.
    Export(ExportArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct SubmitArgs {
    /// (0 to 10) How likely the respondent is to recommend the space. Mandatory.
    #[clap(long, value_parser)]
    pub nps: Option<u8>,

    /// (field=value, repeatable) The rating of one item, between 1 and 5, for example
    /// `--rate internet_0=4`. Items are numbered from 0 in each section.
    #[clap(long = "rate", value_parser)]
    pub ratings: Vec<String>,

    /// (1 to 5) The rating of the value for the price.
    #[clap(long, value_parser)]
    pub value_price: Option<u8>,

    #[clap(long, value_parser)]
    pub liked_most: Option<String>,

    #[clap(long, value_parser)]
    pub needs_improvement: Option<String>,

    #[clap(long, value_parser)]
    pub if_manager: Option<String>,

    /// (URL, optional) Where to send a copy of the response. Setting this option overrides
    /// the sink that may be specified with the --config option.
    #[clap(long, value_parser)]
    pub sink_url: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReportArgs {
    /// (file path, optional) Compute the dashboard from this file instead of the store.
    /// The file is not added to the store.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default json) The type of the input. See the manual for all the input types.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// Compute the dashboard from generated demo responses.
    #[clap(long, takes_value = false)]
    pub demo: bool,

    /// (month label, optional) Only show the responses of this month, for example
    /// `October 2026`. The monthly trend always covers all the months.
    #[clap(long, value_parser)]
    pub month: Option<String>,

    /// (firstSeen or chronological) The order of the months in the trend.
    #[clap(long, value_parser)]
    pub month_order: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the dashboard will be
    /// written in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided,
    /// the computed summary is checked against it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// The dashboard password, if one is configured.
    #[clap(long, value_parser)]
    pub password: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ImportArgs {
    /// (file path or '-') The responses to import.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (default json) The type of the input. See the manual for all the input types.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// Replace the stored responses instead of adding to them.
    #[clap(long, takes_value = false)]
    pub replace: bool,

    /// The dashboard password, if one is configured.
    #[clap(long, value_parser)]
    pub password: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExportArgs {
    /// (file path, 'stdout' or empty) Where to write the responses. Defaults to the
    /// standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// The dashboard password, if one is configured.
    #[clap(long, value_parser)]
    pub password: Option<String>,
}
