use log::debug;

pub use crate::config::*;

/// A builder for assembling a table of motions.
///
/// The builder is the only way to construct a [`VoteTable`]. It checks that
/// each record has one vote per party and that all the binary fields hold 0 or 1.
///
/// Records can be added directly:
///
/// ```
/// use vote_aggregates::builder::TableBuilder;
/// use vote_aggregates::{Attitude, Decision};
/// # use vote_aggregates::TableErrors;
///
/// let mut builder = TableBuilder::new(&["Greens".to_string(), "Liberals".to_string()]);
/// builder.add_record("Greens", "Health", Decision::Adopted, &[Attitude::Support, Attitude::Against])?;
/// let table = builder.build();
/// assert_eq!(table.len(), 1);
///
/// # Ok::<(), TableErrors>(())
/// ```
///
/// or from the raw cells of a file, once the header has been read with
/// [`TableBuilder::from_header`].
pub struct TableBuilder {
    pub(crate) _parties: Vec<String>,
    pub(crate) _layout: Option<ColumnLayout>,
    pub(crate) _records: Vec<VoteRecord>,
}

/// Where each field lives in a row of the source.
#[derive(Eq, PartialEq, Debug, Clone)]
pub(crate) struct ColumnLayout {
    proposer: usize,
    topic: usize,
    decision: usize,
    parties: Vec<usize>,
    width: usize,
}

impl TableBuilder {
    pub fn new(parties: &[String]) -> TableBuilder {
        TableBuilder {
            _parties: parties.to_vec(),
            _layout: None,
            _records: Vec::new(),
        }
    }

    /// Prepares a builder for the rows of a file, given its header.
    ///
    /// The required columns are found by name anywhere in the header. The party
    /// columns are taken by position.
    pub fn from_header<S: AsRef<str>>(
        header: &[S],
        party_columns: &PartyColumns,
    ) -> Result<TableBuilder, TableErrors> {
        let names: Vec<&str> = header.iter().map(|s| s.as_ref().trim()).collect();
        let find = |name: &str| -> Result<usize, TableErrors> {
            names
                .iter()
                .position(|n| *n == name)
                .ok_or_else(|| TableErrors::MissingColumn(name.to_string()))
        };
        let proposer = find(PROPOSER_COLUMN)?;
        let topic = find(TOPIC_COLUMN)?;
        let decision = find(DECISION_COLUMN)?;

        let range = party_columns.resolve(names.len());
        if range.is_empty() {
            return Err(TableErrors::EmptyPartyRange {
                start: range.start,
                end: range.end,
                width: names.len(),
            });
        }
        for idx in [proposer, topic, decision] {
            if range.contains(&idx) {
                return Err(TableErrors::PartyColumnOverlap(names[idx].to_string()));
            }
        }
        let parties: Vec<String> = names[range.clone()].iter().map(|s| s.to_string()).collect();
        debug!("from_header: header: {:?} parties: {:?}", names, parties);

        Ok(TableBuilder {
            _parties: parties,
            _layout: Some(ColumnLayout {
                proposer,
                topic,
                decision,
                parties: range.collect(),
                width: names.len(),
            }),
            _records: Vec::new(),
        })
    }

    pub fn parties(&self) -> &[String] {
        &self._parties
    }

    /// Adds a motion.
    pub fn add_record(
        &mut self,
        proposer: &str,
        topic: &str,
        decision: Decision,
        votes: &[Attitude],
    ) -> Result<(), TableErrors> {
        if votes.len() != self._parties.len() {
            return Err(TableErrors::WrongVoteCount {
                expected: self._parties.len(),
                found: votes.len(),
            });
        }
        self._records.push(VoteRecord {
            proposer: proposer.to_string(),
            topic: topic.to_string(),
            decision,
            votes: votes.to_vec(),
        });
        Ok(())
    }

    /// Adds a row of raw cells, laid out as the header given to
    /// [`TableBuilder::from_header`].
    ///
    /// `lineno` is only used for error messages. The proposer and the topic cannot be blank.
    /// Trailing cells past the header are ignored.
    pub fn add_row<S: AsRef<str>>(&mut self, lineno: usize, cells: &[S]) -> Result<(), TableErrors> {
        let layout = match &self._layout {
            Some(l) => l,
            // A builder without header has no positional layout: every column is missing.
            None => return Err(TableErrors::MissingColumn(PROPOSER_COLUMN.to_string())),
        };
        if cells.len() < layout.width {
            return Err(TableErrors::ShortRow {
                lineno,
                expected: layout.width,
                found: cells.len(),
            });
        }
        if cells.len() > layout.width {
            debug!(
                "add_row: line {}: ignoring {} cells past the header",
                lineno,
                cells.len() - layout.width
            );
        }
        let cell = |idx: usize| cells[idx].as_ref().trim();
        let label = |idx: usize, column: &str| -> Result<String, TableErrors> {
            match cell(idx) {
                "" => Err(TableErrors::EmptyLabel {
                    lineno,
                    column: column.to_string(),
                }),
                s => Ok(s.to_string()),
            }
        };
        let proposer = label(layout.proposer, PROPOSER_COLUMN)?;
        let topic = label(layout.topic, TOPIC_COLUMN)?;

        let decision = parse_binary(cell(layout.decision))
            .map(Decision::from_flag)
            .ok_or_else(|| TableErrors::NotBinary {
                lineno,
                column: DECISION_COLUMN.to_string(),
                value: cell(layout.decision).to_string(),
            })?;

        let mut votes: Vec<Attitude> = Vec::with_capacity(layout.parties.len());
        for (col_idx, party) in layout.parties.iter().zip(self._parties.iter()) {
            let vote = parse_binary(cell(*col_idx))
                .map(Attitude::from_flag)
                .ok_or_else(|| TableErrors::NotBinary {
                    lineno,
                    column: party.clone(),
                    value: cell(*col_idx).to_string(),
                })?;
            votes.push(vote);
        }

        self._records.push(VoteRecord {
            proposer,
            topic,
            decision,
            votes,
        });
        Ok(())
    }

    pub fn build(self) -> VoteTable {
        VoteTable {
            parties: self._parties,
            records: self._records,
        }
    }
}

/// Reads a 0/1 cell. Integral floats (`1.0`) are accepted since spreadsheet
/// exports often write them that way.
pub fn parse_binary(s: &str) -> Option<bool> {
    match s.trim() {
        "1" => Some(true),
        "0" => Some(false),
        other => match other.parse::<f64>() {
            Ok(x) if x == 1.0 => Some(true),
            Ok(x) if x == 0.0 => Some(false),
            _ => None,
        },
    }
}
