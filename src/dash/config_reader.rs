use log::debug;

use snafu::prelude::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

use vote_aggregates::binding::FallbackPolicy;
use vote_aggregates::PartyColumns;

use crate::args::Args;
use crate::dash::io_common::is_remote;
use crate::dash::*;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    pub title: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
    #[serde(rename = "defaultTopic")]
    pub default_topic: Option<String>,
    pub fallback: Option<String>,
}

/// The settings echoed in the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub title: Option<String>,
    pub source: String,
    pub topic: Option<String>,
    pub fallback: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstPartyColumnIndex")]
    _first_party_column_index: Option<JSValue>,
    #[serde(rename = "lastPartyColumnIndex")]
    _last_party_column_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    /// The first party column, starting at 1.
    pub fn first_party_column_index(&self) -> DashResult<Option<usize>> {
        read_js_int(&self._first_party_column_index)
    }

    /// The last party column (included), starting at 1.
    pub fn last_party_column_index(&self) -> DashResult<Option<usize>> {
        read_js_int(&self._last_party_column_index)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    pub source: Option<FileSource>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

impl FromStr for Provider {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Provider::Csv),
            "xlsx" | "excel" => Ok(Provider::Xlsx),
            x => UnknownInputTypeSnafu { input_type: x }.fail(),
        }
    }
}

/// Everything needed to build the dashboard, once the configuration file and the
/// command line have been merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DashboardSettings {
    pub title: Option<String>,
    /// A local path or a URL.
    pub source: String,
    pub provider: Provider,
    pub party_columns: PartyColumns,
    pub excel_worksheet_name: Option<String>,
    pub topic: Option<String>,
    pub fallback: FallbackPolicy,
    pub out: Option<String>,
}

pub fn read_config(path: &str) -> DashResult<DashConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DashConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> DashResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Merges the configuration file (if any) with the command line. The command line wins.
pub fn resolve_settings(args: &Args) -> DashResult<DashboardSettings> {
    let config: Option<DashConfig> = match &args.config {
        Some(p) => Some(read_config(p)?),
        None => None,
    };
    let output_settings = config
        .as_ref()
        .map(|c| c.output_settings.clone())
        .unwrap_or_default();
    let file_source: Option<&FileSource> = config.as_ref().and_then(|c| c.source.as_ref());

    let source: String = match (&args.input, file_source) {
        (Some(input), _) => input.clone(),
        (None, Some(src)) => {
            let root_p: &Path = args
                .config
                .as_deref()
                .and_then(|p| Path::new(p).parent())
                .unwrap_or_else(|| Path::new(""));
            relative_to(root_p, &src.file_path)
        }
        (None, None) => return MissingInputSnafu {}.fail(),
    };

    let config_provider = file_source.and_then(|src| src.provider.clone());
    let provider: Provider = match (&args.input_type, config_provider) {
        (Some(t), _) => t.parse()?,
        (None, Some(t)) => t.parse()?,
        (None, None) => Provider::Csv,
    };

    let first = match args.first_party_column {
        Some(x) => Some(x),
        None => match file_source {
            Some(src) => src.first_party_column_index()?,
            None => None,
        },
    };
    let last = match args.last_party_column {
        Some(x) => Some(x),
        None => match file_source {
            Some(src) => src.last_party_column_index()?,
            None => None,
        },
    };
    let party_columns = match (first, last) {
        (None, None) => PartyColumns::DEFAULT,
        (f, l) => {
            let f = f.unwrap_or(PartyColumns::DEFAULT.start + 1);
            if f == 0 {
                return ParsingColumnIndexSnafu { value: "0" }.fail();
            }
            PartyColumns::from_one_based(f, l.or(PartyColumns::DEFAULT.end))
        }
    };

    let fallback_name = args.fallback.clone().or(output_settings.fallback.clone());
    let fallback: FallbackPolicy = match fallback_name {
        Some(s) => s
            .parse()
            .map_err(|message: String| DashError::InvalidFallback { message })?,
        None => FallbackPolicy::default(),
    };

    Ok(DashboardSettings {
        title: output_settings.title.clone(),
        source,
        provider,
        party_columns,
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or_else(|| file_source.and_then(|src| src.excel_worksheet_name.clone())),
        topic: args.topic.clone().or(output_settings.default_topic.clone()),
        fallback,
        out: args.out.clone().or(output_settings.output_path.clone()),
    })
}

// URLs and absolute paths are kept as they are.
fn relative_to(root_p: &Path, file_path: &str) -> String {
    if is_remote(file_path) || Path::new(file_path).is_absolute() {
        return file_path.to_string();
    }
    let p: PathBuf = [root_p, Path::new(file_path)].iter().collect();
    p.as_path().display().to_string()
}

/// Reads a column index, starting at 1. Spreadsheet-style letters are accepted ("A" is 1, "AA" is 27).
fn read_js_int(x: &Option<JSValue>) -> DashResult<Option<usize>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| Some(x as usize))
            .context(ParsingColumnIndexSnafu {
                value: n.to_string(),
            }),
        Some(JSValue::String(s))
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            s.to_ascii_uppercase()
                .chars()
                .try_fold(0usize, |acc, c| {
                    acc.checked_mul(26)?
                        .checked_add(c as usize - 'A' as usize + 1)
                })
                .map(Some)
                .context(ParsingColumnIndexSnafu { value: s.clone() })
        }
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<usize>()
            .ok()
            .map(Some)
            .context(ParsingColumnIndexSnafu { value: s.clone() }),
        Some(other) => ParsingColumnIndexSnafu {
            value: other.to_string(),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(first: JSValue, last: JSValue) -> FileSource {
        serde_json::from_value(serde_json::json!({
            "filePath": "votings.csv",
            "firstPartyColumnIndex": first,
            "lastPartyColumnIndex": last,
        }))
        .unwrap()
    }

    #[test]
    fn column_indexes() {
        let fs = source(serde_json::json!(6), serde_json::json!("20"));
        assert_eq!(fs.first_party_column_index().unwrap(), Some(6));
        assert_eq!(fs.last_party_column_index().unwrap(), Some(20));

        let fs = source(serde_json::json!("F"), serde_json::json!("t"));
        assert_eq!(fs.first_party_column_index().unwrap(), Some(6));
        assert_eq!(fs.last_party_column_index().unwrap(), Some(20));

        let fs = source(serde_json::json!("AA"), JSValue::Null);
        assert_eq!(fs.first_party_column_index().unwrap(), Some(27));
        assert_eq!(fs.last_party_column_index().unwrap(), None);

        let fs = source(serde_json::json!("ZZZZZZZZZZZZZZZZ"), JSValue::Null);
        assert!(matches!(
            fs.first_party_column_index(),
            Err(DashError::ParsingColumnIndex { .. })
        ));

        let fs = source(serde_json::json!("6th"), serde_json::json!(-1));
        assert!(matches!(
            fs.first_party_column_index(),
            Err(DashError::ParsingColumnIndex { .. })
        ));
        assert!(fs.last_party_column_index().is_err());
    }

    #[test]
    fn minimal_config() {
        let config: DashConfig =
            serde_json::from_str(r#"{"source": {"filePath": "votings.csv"}}"#).unwrap();
        assert_eq!(config.output_settings, OutputSettings::default());
        let fs = config.source.unwrap();
        assert_eq!(fs.provider, None);
        assert_eq!(fs.first_party_column_index().unwrap(), None);
    }

    #[test]
    fn providers() {
        assert_eq!("csv".parse::<Provider>().unwrap(), Provider::Csv);
        assert_eq!("xlsx".parse::<Provider>().unwrap(), Provider::Xlsx);
        assert!(matches!(
            "ods".parse::<Provider>(),
            Err(DashError::UnknownInputType { .. })
        ));
    }

    #[test]
    fn paths_relative_to_config() {
        assert_eq!(
            relative_to(Path::new("/data"), "votings.csv"),
            "/data/votings.csv"
        );
        assert_eq!(
            relative_to(Path::new("/data"), "/tmp/votings.csv"),
            "/tmp/votings.csv"
        );
        assert_eq!(
            relative_to(Path::new("/data"), "https://example.org/votings.csv"),
            "https://example.org/votings.csv"
        );
    }

    #[test]
    fn command_line_overrides() {
        let args = Args {
            config: None,
            reference: None,
            out: Some("stdout".to_string()),
            input: Some("votings.xlsx".to_string()),
            input_type: Some("xlsx".to_string()),
            first_party_column: Some(4),
            last_party_column: None,
            topic: Some("Health".to_string()),
            fallback: Some("first_topic".to_string()),
            excel_worksheet_name: Some("Votes".to_string()),
            verbose: false,
        };
        let s = resolve_settings(&args).unwrap();
        assert_eq!(s.provider, Provider::Xlsx);
        assert_eq!(
            s.party_columns,
            PartyColumns {
                start: 3,
                end: Some(20)
            }
        );
        assert_eq!(s.fallback, FallbackPolicy::FirstTopic);
        assert_eq!(s.excel_worksheet_name, Some("Votes".to_string()));

        let mut bad = args.clone();
        bad.fallback = Some("random".to_string());
        assert!(matches!(
            resolve_settings(&bad),
            Err(DashError::InvalidFallback { .. })
        ));
    }
}
