// Primitives for reading CSV files.

use std::io::Read;

use crate::dash::{
    io_common::{is_blank, normalize_header},
    *,
};

/// Reads a local CSV file.
pub fn read_csv_votes(path: &str, party_columns: &PartyColumns) -> DashResult<VoteTable> {
    let rdr = reader_builder()
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_records(rdr, path, party_columns)
}

/// Reads CSV content from any source. `origin` is only used in messages.
pub fn read_csv_from_reader<R: Read>(
    reader: R,
    origin: &str,
    party_columns: &PartyColumns,
) -> DashResult<VoteTable> {
    let rdr = reader_builder().from_reader(reader);
    read_records(rdr, origin, party_columns)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut b = csv::ReaderBuilder::new();
    // The header is handled as a regular record. Rows of the wrong length are
    // reported by the table builder with the line number.
    b.has_headers(false).flexible(true);
    b
}

fn read_records<R: Read>(
    rdr: csv::Reader<R>,
    origin: &str,
    party_columns: &PartyColumns,
) -> DashResult<VoteTable> {
    let mut records = rdr.into_records();
    let header_line = records
        .next()
        .context(CsvEmptySnafu { path: origin })?
        .context(CsvLineParseSnafu { lineno: 1usize })?;
    let header = normalize_header(header_line.iter());
    debug!("read_csv: header: {:?}", header);

    let mut builder =
        TableBuilder::from_header(&header, party_columns).context(SchemaSnafu { path: origin })?;

    for (idx, line_r) in records.enumerate() {
        // The index starts at 1 and the header is on the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        // Blank lines are skipped by the reader: the position is more accurate.
        let lineno = line
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(lineno);
        let cells: Vec<&str> = line.iter().collect();
        if is_blank(&cells) {
            debug!("read_csv: skipping blank line {}", lineno);
            continue;
        }
        builder
            .add_row(lineno, &cells)
            .context(SchemaSnafu { path: origin })?;
    }
    Ok(builder.build())
}
