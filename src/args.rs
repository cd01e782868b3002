use clap::Parser;

/// This program computes the aggregates and charts of a dashboard of parliamentary votes.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON configuration of the dashboard. The other options
    /// override the values it contains.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the expected summary in JSON format. If provided,
    /// votedash will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or URL) The table of votes. Setting this option overrides the source specified with
    /// the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx. URLs are always read as csv.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default 6) The first column holding party votes, starting at 1.
    #[clap(long, value_parser)]
    pub first_party_column: Option<usize>,

    /// (default 20) The last column holding party votes, starting at 1. Columns past the end
    /// of the table are ignored.
    #[clap(long, value_parser)]
    pub last_party_column: Option<usize>,

    /// (default: the first topic) The topic shown in the party breakdown chart.
    #[clap(short, long, value_parser)]
    pub topic: Option<String>,

    /// (placeholder or first_topic) What to show when the topic is not in the data.
    #[clap(long, value_parser)]
    pub fallback: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
