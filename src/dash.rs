use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use vote_aggregates::builder::TableBuilder;
use vote_aggregates::*;

use crate::args::Args;
use crate::dash::charts::ChartSet;
use crate::dash::config_reader::*;

mod charts;
mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_http;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DashError {
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("No header found in {path}"))]
    CsvEmpty { path: String },
    #[snafu(display("Error fetching {url}"))]
    FetchingUrl { source: reqwest::Error, url: String },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no worksheet {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Excel file {path} is empty"))]
    EmptyExcel { path: String },
    #[snafu(display("Error reading JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Invalid column index: {value}"))]
    ParsingColumnIndex { value: String },
    #[snafu(display("Unknown input type {input_type:?}, expected csv or xlsx"))]
    UnknownInputType { input_type: String },
    #[snafu(display("{message}"))]
    InvalidFallback { message: String },
    #[snafu(display("No input provided: use --input or a configuration file with a source"))]
    MissingInput {},
    #[snafu(display("The table in {path} does not have the expected columns"))]
    Schema { source: TableErrors, path: String },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between computed summary and reference summary"))]
    ReferenceMismatch {},
}

pub type DashResult<T> = Result<T, DashError>;

fn topic_distribution_to_json(d: &TopicDistribution) -> JSValue {
    let l: Vec<JSValue> = d
        .tallies
        .iter()
        .map(|t| {
            json!({
                "topic": t.topic,
                "total": t.total,
                "adopted": t.adopted,
                "rejected": t.rejected,
            })
        })
        .collect();
    JSValue::Array(l)
}

fn party_vote_breakdown_to_json(b: &PartyVoteBreakdown) -> JSValue {
    let mut l: Vec<JSValue> = Vec::new();
    for tb in b.topics.iter() {
        // A list rather than an object, to keep the order of the party columns.
        let votes: Vec<JSValue> = tb
            .counts
            .iter()
            .map(|(party, c)| json!({"party": party, "support": c.support, "against": c.against}))
            .collect();
        l.push(json!({"topic": tb.topic, "votes": votes}));
    }
    JSValue::Array(l)
}

fn aggregates_to_json(a: &Aggregates) -> JSValue {
    json!({
        "topics": a.topics,
        "parties": a.parties,
        "topicDistribution": topic_distribution_to_json(&a.topic_distribution),
        "partyVoteBreakdown": party_vote_breakdown_to_json(&a.party_vote_breakdown),
        "proposalMatrix": {
            "proposers": a.proposal_matrix.proposers,
            "topics": a.proposal_matrix.topics,
            "counts": a.proposal_matrix.counts,
        },
        "partyCorrelation": {
            "parties": a.party_correlation.parties,
            "values": a.party_correlation.values,
        },
    })
}

fn build_summary_js(
    settings: &DashboardSettings,
    aggregates: &Aggregates,
    charts: &ChartSet,
    topic: Option<&str>,
) -> JSValue {
    let c = OutputConfig {
        title: settings.title.clone(),
        source: io_common::simplify_file_name(&settings.source),
        topic: topic.map(|s| s.to_string()),
        fallback: settings.fallback.to_string(),
    };
    let breakdown = match topic {
        Some(t) => charts.breakdown_for(t),
        None => charts.party_breakdown.placeholder(),
    };
    json!({
        "config": c,
        "aggregates": aggregates_to_json(aggregates),
        "figures": {
            "topicDistribution": charts.topic_distribution,
            "partyVoteBreakdown": breakdown,
            "proposals": charts.proposals,
            "partyCorrelation": charts.party_correlation,
        }
    })
}

/// Reads the table of votes from the configured source.
pub fn load_table(settings: &DashboardSettings) -> DashResult<VoteTable> {
    info!("Attempting to read votes from {:?}", settings.source);
    let table = if io_common::is_remote(&settings.source) {
        io_http::read_remote_csv(&settings.source, &settings.party_columns)?
    } else {
        match settings.provider {
            Provider::Csv => io_csv::read_csv_votes(&settings.source, &settings.party_columns)?,
            Provider::Xlsx => io_excel::read_excel_votes(
                &settings.source,
                settings.excel_worksheet_name.as_deref(),
                &settings.party_columns,
            )?,
        }
    };
    info!(
        "Loaded {} motions with {} parties",
        table.len(),
        table.parties().len()
    );
    Ok(table)
}

/// Loads the votes, computes the aggregates and the charts, and assembles the summary.
pub fn build_dashboard(settings: &DashboardSettings) -> DashResult<JSValue> {
    let table = load_table(settings)?;
    let aggregates = compute_aggregates(&table);
    let charts = ChartSet::build(&aggregates, settings.fallback);

    // The selector starts on the requested topic, or on the first one.
    let topic: Option<String> = settings
        .topic
        .clone()
        .or_else(|| aggregates.topics.first().cloned());
    debug!("build_dashboard: selected topic: {:?}", topic);

    Ok(build_summary_js(
        settings,
        &aggregates,
        &charts,
        topic.as_deref(),
    ))
}

fn write_output(out: Option<&str>, content: &str) -> DashResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", content);
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, content).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> DashResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    // Both sides go through the same parser, so that floats are compared as read.
    let summary: JSValue = serde_json::from_str(pretty_js_stats).context(ParsingJsonSnafu {})?;
    let pretty_js_stats =
        serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats.as_str(), "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    info!("The summary matches the reference {:?}", reference_path);
    Ok(())
}

pub fn run_dashboard(args: &Args) -> DashResult<()> {
    let settings = resolve_settings(args)?;
    info!("settings: {:?}", settings);

    let summary = build_dashboard(&settings)?;
    let pretty_js_stats = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;
    write_output(settings.out.as_deref(), &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js_stats)?;
    }
    Ok(())
}

/// Builds a table out of rows already split in cells, given the header and the line
/// it was found on. Shared by the readers that do not stream their input.
pub(crate) fn table_from_rows<S: AsRef<str>>(
    origin: &str,
    header: &[String],
    header_lineno: usize,
    rows: &[Vec<S>],
    party_columns: &PartyColumns,
) -> DashResult<VoteTable> {
    let mut builder =
        TableBuilder::from_header(header, party_columns).context(SchemaSnafu { path: origin })?;
    for (idx, row) in rows.iter().enumerate() {
        let lineno = header_lineno + idx + 1;
        if io_common::is_blank(row.as_slice()) {
            debug!("table_from_rows: skipping blank line {}", lineno);
            continue;
        }
        builder
            .add_row(lineno, row.as_slice())
            .context(SchemaSnafu { path: origin })?;
    }
    Ok(builder.build())
}
