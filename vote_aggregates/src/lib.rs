mod config;
pub mod binding;
pub mod builder;
pub mod manual;

use log::{debug, info};

use std::collections::{BTreeMap, BTreeSet, HashMap};

pub use crate::config::*;

/// The value used for a correlation that is not defined, which happens when
/// a party voted the same way on every motion.
pub const UNDEFINED_CORRELATION: f64 = 1.0;

/// The sorted set of unique topic labels.
pub fn topics(table: &VoteTable) -> Vec<String> {
    let labels: BTreeSet<&str> = table.records().iter().map(|r| r.topic.as_str()).collect();
    labels.into_iter().map(|s| s.to_string()).collect()
}

/// Counts the adopted and rejected motions of each topic.
///
/// Topics are ordered lexicographically, not by their first appearance in the table.
pub fn compute_topic_distribution(table: &VoteTable) -> TopicDistribution {
    // topic -> (total, adopted)
    let mut by_topic: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for r in table.records() {
        let e = by_topic.entry(r.topic.as_str()).or_insert((0, 0));
        e.0 += 1;
        if r.decision.is_adopted() {
            e.1 += 1;
        }
    }
    let tallies = by_topic
        .into_iter()
        .map(|(topic, (total, adopted))| TopicTally {
            topic: topic.to_string(),
            total,
            adopted,
            rejected: total - adopted,
        })
        .collect();
    TopicDistribution { tallies }
}

/// Counts, for each topic and each party, the motions supported and opposed.
///
/// All the parties appear under every topic, with zero counts where needed: a party
/// that supported every motion of a topic still has an `against` entry of 0.
pub fn compute_party_vote_breakdown(table: &VoteTable) -> PartyVoteBreakdown {
    let num_parties = table.parties().len();
    let mut by_topic: BTreeMap<&str, Vec<AttitudeCount>> = BTreeMap::new();
    for r in table.records() {
        let counts = by_topic
            .entry(r.topic.as_str())
            .or_insert_with(|| vec![AttitudeCount::EMPTY; num_parties]);
        for (c, vote) in counts.iter_mut().zip(r.votes().iter()) {
            match vote {
                Attitude::Support => c.support += 1,
                Attitude::Against => c.against += 1,
            }
        }
    }
    let topics = by_topic
        .into_iter()
        .map(|(topic, counts)| TopicBreakdown {
            topic: topic.to_string(),
            counts: table.parties().iter().cloned().zip(counts).collect(),
        })
        .collect();
    PartyVoteBreakdown { topics }
}

/// Counts the motions introduced by each proposer on each topic.
///
/// The result is dense over the proposers and topics seen in the table.
pub fn compute_proposal_matrix(table: &VoteTable) -> ProposalMatrix {
    let topics = topics(table);
    let topic_idx: HashMap<&str, usize> = topics
        .iter()
        .enumerate()
        .map(|(idx, t)| (t.as_str(), idx))
        .collect();

    let mut rows: BTreeMap<&str, Vec<u64>> = BTreeMap::new();
    for r in table.records() {
        let row = rows
            .entry(r.proposer.as_str())
            .or_insert_with(|| vec![0; topics.len()]);
        // All the topics of the table are indexed.
        if let Some(idx) = topic_idx.get(r.topic.as_str()) {
            row[*idx] += 1;
        }
    }

    let mut proposers: Vec<String> = Vec::with_capacity(rows.len());
    let mut counts: Vec<Vec<u64>> = Vec::with_capacity(rows.len());
    for (proposer, row) in rows {
        proposers.push(proposer.to_string());
        counts.push(row);
    }
    ProposalMatrix {
        proposers,
        topics,
        counts,
    }
}

/// Computes the pairwise Pearson correlation between the votes of the parties.
///
/// The matrix is symmetric with a diagonal of 1. Undefined correlations are
/// replaced by [`UNDEFINED_CORRELATION`].
pub fn compute_party_correlation(table: &VoteTable) -> PartyCorrelation {
    if table.is_empty() {
        return PartyCorrelation::default();
    }
    let parties = table.parties().to_vec();
    let columns: Vec<Vec<f64>> = (0..parties.len())
        .map(|p| table.records().iter().map(|r| r.votes()[p].as_f64()).collect())
        .collect();

    let mut values = vec![vec![1.0; parties.len()]; parties.len()];
    for i in 0..parties.len() {
        for j in (i + 1)..parties.len() {
            let c = pearson(&columns[i], &columns[j]).unwrap_or(UNDEFINED_CORRELATION);
            values[i][j] = c;
            values[j][i] = c;
        }
    }
    debug!("compute_party_correlation: {:?} {:?}", parties, values);
    PartyCorrelation { parties, values }
}

/// Computes all the aggregates of a table.
pub fn compute_aggregates(table: &VoteTable) -> Aggregates {
    info!(
        "Processing {:?} motions, parties: {:?}",
        table.len(),
        table.parties()
    );
    let res = Aggregates {
        topics: topics(table),
        parties: if table.is_empty() {
            Vec::new()
        } else {
            table.parties().to_vec()
        },
        topic_distribution: compute_topic_distribution(table),
        party_vote_breakdown: compute_party_vote_breakdown(table),
        proposal_matrix: compute_proposal_matrix(table),
        party_correlation: compute_party_correlation(table),
    };
    info!(
        "Computed aggregates: {} topics, {} proposers",
        res.topics.len(),
        res.proposal_matrix.proposers.len()
    );
    res
}

// Sample correlation of two columns of the same length. None if one of the columns
// has no variance.
fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len() as f64;
    if xs.is_empty() {
        return None;
    }
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::builder::TableBuilder;
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn parties(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn vote(v: u8) -> Attitude {
        Attitude::from_flag(v == 1)
    }

    // (proposer, topic, decision, votes)
    fn table(party_names: &[&str], rows: &[(&str, &str, u8, &[u8])]) -> VoteTable {
        let mut b = TableBuilder::new(&parties(party_names));
        for (proposer, topic, decision, votes) in rows {
            let votes: Vec<Attitude> = votes.iter().map(|v| vote(*v)).collect();
            b.add_record(proposer, topic, Decision::from_flag(*decision == 1), &votes)
                .unwrap();
        }
        b.build()
    }

    fn sample() -> VoteTable {
        table(
            &["Greens", "Liberals", "Socialists"],
            &[
                ("Greens", "Health", 1, &[1, 0, 1]),
                ("Liberals", "Health", 0, &[0, 1, 0]),
                ("Greens", "Housing", 1, &[1, 1, 1]),
                ("Socialists", "Economy", 1, &[1, 1, 0]),
                ("Greens", "Economy", 0, &[1, 0, 0]),
                ("Socialists", "Health", 1, &[1, 0, 1]),
            ],
        )
    }

    #[test]
    fn topic_distribution_example() {
        init();
        let t = table(
            &["A"],
            &[
                ("A", "Health", 1, &[1]),
                ("A", "Health", 0, &[1]),
                ("A", "Housing", 1, &[0]),
            ],
        );
        let d = compute_topic_distribution(&t);
        assert_eq!(
            d.tallies,
            vec![
                TopicTally {
                    topic: "Health".to_string(),
                    total: 2,
                    adopted: 1,
                    rejected: 1
                },
                TopicTally {
                    topic: "Housing".to_string(),
                    total: 1,
                    adopted: 1,
                    rejected: 0
                },
            ]
        );
    }

    #[test]
    fn topics_are_sorted() {
        let t = sample();
        assert_eq!(topics(&t), parties(&["Economy", "Health", "Housing"]));
        let d = compute_topic_distribution(&t);
        let labels: Vec<&str> = d.tallies.iter().map(|x| x.topic.as_str()).collect();
        assert_eq!(labels, vec!["Economy", "Health", "Housing"]);
    }

    #[test]
    fn topic_distribution_sums_to_count() {
        let t = sample();
        let d = compute_topic_distribution(&t);
        for tally in d.tallies.iter() {
            let n = t.records().iter().filter(|r| r.topic == tally.topic).count() as u64;
            assert_eq!(tally.adopted + tally.rejected, n);
            assert_eq!(tally.total, n);
        }
    }

    #[test]
    fn breakdown_sums_to_count() {
        let t = sample();
        let b = compute_party_vote_breakdown(&t);
        assert_eq!(b.topics.len(), 3);
        for tb in b.topics.iter() {
            let n = t.records().iter().filter(|r| r.topic == tb.topic).count() as u64;
            assert_eq!(tb.counts.len(), 3);
            for (_, c) in tb.counts.iter() {
                assert_eq!(c.total(), n);
            }
        }
    }

    #[test]
    fn breakdown_keeps_unanimous_topic() {
        // Everyone supported the only housing motion: the against side must still be there.
        let t = sample();
        let b = compute_party_vote_breakdown(&t);
        let housing = b.get("Housing").unwrap();
        for party in ["Greens", "Liberals", "Socialists"] {
            assert_eq!(
                housing.get(party),
                Some(AttitudeCount {
                    support: 1,
                    against: 0
                })
            );
        }
        let health = b.get("Health").unwrap();
        assert_eq!(
            health.get("Liberals"),
            Some(AttitudeCount {
                support: 1,
                against: 2
            })
        );
        // Party order follows the columns.
        let names: Vec<&str> = health.counts.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(names, vec!["Greens", "Liberals", "Socialists"]);
    }

    #[test]
    fn proposal_matrix_is_dense() {
        let t = sample();
        let m = compute_proposal_matrix(&t);
        assert_eq!(m.proposers, parties(&["Greens", "Liberals", "Socialists"]));
        assert_eq!(m.topics, parties(&["Economy", "Health", "Housing"]));
        assert_eq!(m.counts.len(), m.proposers.len());
        for row in m.counts.iter() {
            assert_eq!(row.len(), m.topics.len());
        }
        assert_eq!(m.row("Greens"), Some(&[1u64, 1, 1][..]));
        assert_eq!(m.get("Liberals", "Health"), Some(1));
        assert_eq!(m.get("Liberals", "Housing"), Some(0));
        assert_eq!(m.get("Socialists", "Economy"), Some(1));
        assert_eq!(m.get("Nobody", "Economy"), None);
        let total: u64 = m.counts.iter().flatten().sum();
        assert_eq!(total, t.len() as u64);
    }

    #[test]
    fn correlation_is_symmetric() {
        let t = sample();
        let c = compute_party_correlation(&t);
        let n = c.parties.len();
        assert_eq!(n, 3);
        for i in 0..n {
            assert_eq!(c.values[i][i], 1.0);
            for j in 0..n {
                assert_eq!(c.values[i][j], c.values[j][i]);
                assert!(c.values[i][j].is_finite());
                assert!(c.values[i][j] >= -1.0 && c.values[i][j] <= 1.0);
            }
        }
    }

    #[test]
    fn correlation_known_values() {
        let t = table(
            &["A", "B", "C"],
            &[
                ("A", "Health", 1, &[1, 1, 0]),
                ("A", "Health", 1, &[0, 0, 1]),
                ("A", "Health", 1, &[1, 1, 0]),
                ("A", "Health", 1, &[0, 0, 1]),
            ],
        );
        let c = compute_party_correlation(&t);
        assert!((c.get("A", "B").unwrap() - 1.0).abs() < 1e-12);
        assert!((c.get("A", "C").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_with_constant_party() {
        let t = table(
            &["A", "B", "C"],
            &[
                ("A", "Health", 1, &[1, 1, 0]),
                ("B", "Health", 0, &[1, 0, 1]),
                ("C", "Housing", 1, &[1, 1, 1]),
            ],
        );
        let c = compute_party_correlation(&t);
        assert_eq!(c.get("A", "A"), Some(1.0));
        assert_eq!(c.get("A", "B"), Some(UNDEFINED_CORRELATION));
        assert_eq!(c.get("C", "A"), Some(UNDEFINED_CORRELATION));
        assert!(c.get("B", "C").unwrap().is_finite());
    }

    #[test]
    fn empty_table() {
        init();
        let t = table(&["A", "B"], &[]);
        let a = compute_aggregates(&t);
        assert!(a.topics.is_empty());
        assert!(a.parties.is_empty());
        assert!(a.topic_distribution.is_empty());
        assert!(a.party_vote_breakdown.is_empty());
        assert!(a.proposal_matrix.is_empty());
        assert!(a.proposal_matrix.topics.is_empty());
        assert!(a.party_correlation.is_empty());
    }

    #[test]
    fn aggregates_together() {
        let t = sample();
        let a = compute_aggregates(&t);
        assert_eq!(a.topics, topics(&t));
        assert_eq!(a.parties, parties(&["Greens", "Liberals", "Socialists"]));
        assert_eq!(a.topic_distribution, compute_topic_distribution(&t));
        assert_eq!(a.party_correlation.parties, a.parties);
    }
}
