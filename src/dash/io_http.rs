// Reading the votes from a remote location.

use crate::dash::{io_csv::read_csv_from_reader, *};

/// Downloads a CSV file and reads it. There is no retry: a failure stops the program.
pub fn read_remote_csv(url: &str, party_columns: &PartyColumns) -> DashResult<VoteTable> {
    info!("Fetching votes from {}", url);
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .context(FetchingUrlSnafu { url })?;
    let body = response.bytes().context(FetchingUrlSnafu { url })?;
    debug!("read_remote_csv: received {} bytes", body.len());
    read_csv_from_reader(&body[..], url, party_columns)
}
