// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Name of the column holding the party that introduced the motion.
pub const PROPOSER_COLUMN: &str = "proposer";
/// Name of the column holding the topic label of the motion.
pub const TOPIC_COLUMN: &str = "topic";
/// Name of the column holding the outcome of the motion (1 = adopted, 0 = rejected).
pub const DECISION_COLUMN: &str = "decision";

/// The outcome of a motion.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Decision {
    Adopted,
    Rejected,
}

impl Decision {
    pub fn from_flag(adopted: bool) -> Decision {
        if adopted {
            Decision::Adopted
        } else {
            Decision::Rejected
        }
    }

    pub fn is_adopted(&self) -> bool {
        matches!(self, Decision::Adopted)
    }
}

/// The vote cast by a party on a motion.
///
/// Every party votes on every motion, there is no abstention in the source data.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Attitude {
    Support,
    Against,
}

impl Attitude {
    pub fn from_flag(support: bool) -> Attitude {
        if support {
            Attitude::Support
        } else {
            Attitude::Against
        }
    }

    /// The numeric encoding used in the source table (1 = support, 0 = against).
    pub fn as_f64(&self) -> f64 {
        match self {
            Attitude::Support => 1.0,
            Attitude::Against => 0.0,
        }
    }
}

/// One motion (one row of the source table).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteRecord {
    pub proposer: String,
    pub topic: String,
    pub decision: Decision,
    // Invariant: one entry per party of the enclosing table, in the same order.
    pub(crate) votes: Vec<Attitude>,
}

impl VoteRecord {
    /// The votes of each party, in the order of [`VoteTable::parties`].
    pub fn votes(&self) -> &[Attitude] {
        &self.votes
    }
}

/// The loaded table of motions.
///
/// It can only be assembled through the [`crate::builder::TableBuilder`], which
/// guarantees that every record carries exactly one vote per party.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteTable {
    pub(crate) parties: Vec<String>,
    pub(crate) records: Vec<VoteRecord>,
}

impl VoteTable {
    /// The party columns, in source order.
    pub fn parties(&self) -> &[String] {
        &self.parties
    }

    /// The motions, in source order.
    pub fn records(&self) -> &[VoteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ******** Output data structures *********

/// Number of adopted and rejected motions for one topic.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TopicTally {
    pub topic: String,
    pub total: u64,
    pub adopted: u64,
    pub rejected: u64,
}

/// For each topic (in lexicographic order), the outcome of its motions.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TopicDistribution {
    pub tallies: Vec<TopicTally>,
}

impl TopicDistribution {
    pub fn get(&self, topic: &str) -> Option<&TopicTally> {
        self.tallies.iter().find(|t| t.topic == topic)
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct AttitudeCount {
    pub support: u64,
    pub against: u64,
}

impl AttitudeCount {
    pub const EMPTY: AttitudeCount = AttitudeCount {
        support: 0,
        against: 0,
    };

    pub fn total(&self) -> u64 {
        self.support + self.against
    }
}

/// The votes of every party on the motions of a single topic.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TopicBreakdown {
    pub topic: String,
    /// One entry per party, in the order of the party columns.
    pub counts: Vec<(String, AttitudeCount)>,
}

impl TopicBreakdown {
    pub fn get(&self, party: &str) -> Option<AttitudeCount> {
        self.counts
            .iter()
            .find(|(name, _)| name == party)
            .map(|(_, c)| *c)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PartyVoteBreakdown {
    pub topics: Vec<TopicBreakdown>,
}

impl PartyVoteBreakdown {
    pub fn get(&self, topic: &str) -> Option<&TopicBreakdown> {
        self.topics.iter().find(|t| t.topic == topic)
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Number of motions introduced by each proposer for each topic.
///
/// Dense: `counts[i][j]` is the count for `proposers[i]` and `topics[j]`,
/// zero when that proposer never introduced a motion on that topic.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ProposalMatrix {
    pub proposers: Vec<String>,
    pub topics: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl ProposalMatrix {
    pub fn get(&self, proposer: &str, topic: &str) -> Option<u64> {
        let i = self.proposers.iter().position(|p| p == proposer)?;
        let j = self.topics.iter().position(|t| t == topic)?;
        Some(self.counts[i][j])
    }

    pub fn row(&self, proposer: &str) -> Option<&[u64]> {
        let i = self.proposers.iter().position(|p| p == proposer)?;
        Some(self.counts[i].as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.proposers.is_empty()
    }
}

/// Symmetric matrix of the Pearson correlations between the votes of the parties.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct PartyCorrelation {
    pub parties: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl PartyCorrelation {
    pub fn get(&self, party_a: &str, party_b: &str) -> Option<f64> {
        let i = self.parties.iter().position(|p| p == party_a)?;
        let j = self.parties.iter().position(|p| p == party_b)?;
        Some(self.values[i][j])
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }
}

/// All the aggregates derived from a table, computed once at startup.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Aggregates {
    /// Sorted unique topic labels.
    pub topics: Vec<String>,
    /// The party columns. Empty if the table has no motion.
    pub parties: Vec<String>,
    pub topic_distribution: TopicDistribution,
    pub party_vote_breakdown: PartyVoteBreakdown,
    pub proposal_matrix: ProposalMatrix,
    pub party_correlation: PartyCorrelation,
}

/// Errors raised while assembling a table. They all mean that the source does not
/// follow the expected schema.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TableErrors {
    MissingColumn(String),
    EmptyPartyRange {
        start: usize,
        end: usize,
        width: usize,
    },
    PartyColumnOverlap(String),
    ShortRow {
        lineno: usize,
        expected: usize,
        found: usize,
    },
    NotBinary {
        lineno: usize,
        column: String,
        value: String,
    },
    EmptyLabel {
        lineno: usize,
        column: String,
    },
    WrongVoteCount {
        expected: usize,
        found: usize,
    },
}

impl Error for TableErrors {}

impl Display for TableErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableErrors::MissingColumn(name) => write!(f, "missing required column {:?}", name),
            TableErrors::EmptyPartyRange { start, end, width } => write!(
                f,
                "party columns {}..{} select no column in a header of {} columns",
                start, end, width
            ),
            TableErrors::PartyColumnOverlap(name) => {
                write!(f, "column {:?} cannot be used as a party column", name)
            }
            TableErrors::ShortRow {
                lineno,
                expected,
                found,
            } => write!(
                f,
                "line {}: expected {} fields, found {}",
                lineno, expected, found
            ),
            TableErrors::NotBinary {
                lineno,
                column,
                value,
            } => write!(
                f,
                "line {}: column {:?} must hold 0 or 1, found {:?}",
                lineno, column, value
            ),
            TableErrors::EmptyLabel { lineno, column } => {
                write!(f, "line {}: column {:?} is empty", lineno, column)
            }
            TableErrors::WrongVoteCount { expected, found } => write!(
                f,
                "a motion needs one vote per party: expected {}, found {}",
                expected, found
            ),
        }
    }
}

// ********* Configuration **********

/// The columns of the source header that hold the party votes.
///
/// Indexes are 0-based and the range is half-open. An `end` past the header
/// width is clipped, `None` means "up to the last column".
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct PartyColumns {
    pub start: usize,
    pub end: Option<usize>,
}

impl PartyColumns {
    /// The layout of the published roll-call dataset: the parties are the 6th to
    /// the 20th columns.
    pub const DEFAULT: PartyColumns = PartyColumns {
        start: 5,
        end: Some(20),
    };

    /// Builds the range from 1-based inclusive column indexes, as written in
    /// configuration files.
    pub fn from_one_based(first: usize, last: Option<usize>) -> PartyColumns {
        PartyColumns {
            start: first.saturating_sub(1),
            end: last,
        }
    }

    /// The concrete range for a header of `width` columns.
    pub fn resolve(&self, width: usize) -> std::ops::Range<usize> {
        let end = self.end.unwrap_or(width).min(width);
        let start = self.start.min(end);
        start..end
    }
}

impl Default for PartyColumns {
    fn default() -> Self {
        PartyColumns::DEFAULT
    }
}
