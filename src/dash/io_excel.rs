use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::dash::{io_common::normalize_header, *};

pub fn read_excel_votes(
    path: &str,
    worksheet_name: Option<&str>,
    party_columns: &PartyColumns,
) -> DashResult<VoteTable> {
    let wrange = get_range(path, worksheet_name)?;
    // The range starts at the first used cell. The party columns are positions in
    // the sheet, so the rows are padded back to column A.
    let (start_row, start_col) = wrange.start().context(EmptyExcelSnafu { path })?;
    let pad = start_col as usize;

    let mut iter = wrange.rows();
    let header_row = iter.next().context(EmptyExcelSnafu { path })?;
    let header = normalize_header(padded(pad, header_row));
    debug!(
        "read_excel_votes: header at row {}: {:?}",
        start_row + 1,
        header
    );

    let rows: Vec<Vec<String>> = iter.map(|row| padded(pad, row)).collect();
    table_from_rows(path, &header, start_row as usize + 1, &rows[..], party_columns)
}

fn padded(pad: usize, row: &[DataType]) -> Vec<String> {
    let mut cells: Vec<String> = vec![String::new(); pad];
    cells.extend(row.iter().map(read_cell));
    cells
}

// The table builder works on text: numbers are written as in a CSV export.
fn read_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(true) => "1".to_string(),
        DataType::Bool(false) => "0".to_string(),
        DataType::Empty => String::new(),
        other => format!("{:?}", other),
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> DashResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_file: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it. Otherwise the first one.
    let wrange = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };
    Ok(wrange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_as_text() {
        assert_eq!(read_cell(&DataType::Int(1)), "1");
        assert_eq!(read_cell(&DataType::Float(0.0)), "0");
        assert_eq!(read_cell(&DataType::Float(0.5)), "0.5");
        assert_eq!(read_cell(&DataType::Bool(true)), "1");
        assert_eq!(read_cell(&DataType::String("Health".to_string())), "Health");
        assert_eq!(read_cell(&DataType::Empty), "");
    }

    const SAMPLE_XLSX: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/votings_sample.xlsx");

    #[test]
    fn read_first_worksheet() {
        // The sheet starts at B2: the party columns are still counted from column A.
        let t = read_excel_votes(SAMPLE_XLSX, None, &PartyColumns::DEFAULT).unwrap();
        assert_eq!(
            t.parties(),
            &["Greens", "Liberals", "Socialists", "Conservatives"].map(|s| s.to_string())
        );
        assert_eq!(t.len(), 8);
        let r = &t.records()[0];
        assert_eq!(r.proposer, "Greens");
        assert_eq!(r.topic, "Health");
        assert_eq!(r.decision, Decision::Adopted);
        assert_eq!(
            r.votes(),
            &[
                Attitude::Support,
                Attitude::Against,
                Attitude::Support,
                Attitude::Support
            ]
        );
        assert_eq!(t.records()[7].proposer, "Conservatives");
    }

    #[test]
    fn read_named_worksheet() {
        let t = read_excel_votes(SAMPLE_XLSX, Some("Votes"), &PartyColumns::DEFAULT).unwrap();
        assert_eq!(t.len(), 8);
        let d = compute_topic_distribution(&t);
        let health = d.get("Health").unwrap();
        assert_eq!((health.total, health.adopted, health.rejected), (3, 2, 1));
    }

    #[test]
    fn missing_worksheet() {
        let res = read_excel_votes(SAMPLE_XLSX, Some("Ballots"), &PartyColumns::DEFAULT);
        assert!(matches!(res, Err(DashError::MissingWorksheet { .. })));
    }

    #[test]
    fn worksheet_without_votes() {
        let res = read_excel_votes(SAMPLE_XLSX, Some("Notes"), &PartyColumns::DEFAULT);
        match res {
            Err(DashError::Schema { source, .. }) => {
                assert_eq!(source, TableErrors::MissingColumn("proposer".to_string()))
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn missing_workbook() {
        let res = read_excel_votes("/nonexistent/votings.xlsx", None, &PartyColumns::DEFAULT);
        assert!(matches!(res, Err(DashError::OpeningExcel { .. })));
    }
}
