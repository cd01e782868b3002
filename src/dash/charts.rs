//! Plotly figures for the dashboard.
//!
//! Every figure is a `{"data": [...], "layout": {...}}` document that can be handed
//! to `Plotly.newPlot` as is. An empty aggregate gives a figure without traces.

use serde_json::json;
use serde_json::Value as JSValue;

use vote_aggregates::binding::{FallbackPolicy, TopicBinding};
use vote_aggregates::*;

const ADOPTED_COLOR: &str = "#87CE70";
const REJECTED_COLOR: &str = "#FFCC80";
const SUPPORT_COLOR: &str = "#A6C4FE";
const AGAINST_COLOR: &str = "#DDDDDD";
const GRID_COLOR: &str = "#EEEEEE";
const BACKGROUND_COLOR: &str = "#FFFFFF";

/// The charts of the dashboard, built once at startup.
pub struct ChartSet {
    pub topic_distribution: JSValue,
    /// One chart per topic, picked by the topic selector.
    pub party_breakdown: TopicBinding<JSValue>,
    pub proposals: JSValue,
    pub party_correlation: JSValue,
}

impl ChartSet {
    pub fn build(aggregates: &Aggregates, policy: FallbackPolicy) -> ChartSet {
        let breakdowns = aggregates
            .party_vote_breakdown
            .topics
            .iter()
            .map(|tb| (tb.topic.clone(), party_breakdown_figure(tb)));
        ChartSet {
            topic_distribution: topic_distribution_figure(&aggregates.topic_distribution),
            party_breakdown: TopicBinding::new(
                breakdowns,
                empty_figure("voting result"),
                policy,
            ),
            proposals: proposals_figure(&aggregates.proposal_matrix),
            party_correlation: correlation_figure(&aggregates.party_correlation),
        }
    }

    /// The party breakdown for the selected topic. Unknown topics never fail.
    pub fn breakdown_for(&self, topic: &str) -> &JSValue {
        self.party_breakdown.resolve(topic)
    }
}

fn title(text: &str) -> JSValue {
    json!({"text": text, "x": 0.5})
}

pub fn empty_figure(text: &str) -> JSValue {
    json!({
        "data": [],
        "layout": {"title": title(text), "plot_bgcolor": BACKGROUND_COLOR}
    })
}

/// Stacked bars: adopted motions above the axis, rejected ones below.
pub fn topic_distribution_figure(d: &TopicDistribution) -> JSValue {
    let text = "topic distribution";
    if d.is_empty() {
        return empty_figure(text);
    }
    let x: Vec<&str> = d.tallies.iter().map(|t| t.topic.as_str()).collect();
    let adopted: Vec<i64> = d.tallies.iter().map(|t| t.adopted as i64).collect();
    let rejected: Vec<i64> = d.tallies.iter().map(|t| -(t.rejected as i64)).collect();
    json!({
        "data": [
            {"type": "bar", "name": "adopted", "x": x, "y": adopted, "marker": {"color": ADOPTED_COLOR}},
            {"type": "bar", "name": "rejected", "x": x, "y": rejected, "marker": {"color": REJECTED_COLOR}},
        ],
        "layout": {
            "title": title(text),
            "yaxis": {
                "title": "number of motions",
                "gridcolor": GRID_COLOR,
                "zerolinecolor": GRID_COLOR,
                "tickformat": "d",
            },
            "bargap": 0.5,
            "barmode": "stack",
            "plot_bgcolor": BACKGROUND_COLOR,
        }
    })
}

/// Horizontal stacked bars, one per party.
pub fn party_breakdown_figure(tb: &TopicBreakdown) -> JSValue {
    let parties: Vec<&str> = tb.counts.iter().map(|(p, _)| p.as_str()).collect();
    let support: Vec<u64> = tb.counts.iter().map(|(_, c)| c.support).collect();
    let against: Vec<u64> = tb.counts.iter().map(|(_, c)| c.against).collect();
    json!({
        "data": [
            {"type": "bar", "name": "in favour", "orientation": "h", "y": parties, "x": support, "marker": {"color": SUPPORT_COLOR}},
            {"type": "bar", "name": "against", "orientation": "h", "y": parties, "x": against, "marker": {"color": AGAINST_COLOR}},
        ],
        "layout": {
            "title": title(&format!("voting result regarding {} topic", tb.topic)),
            "xaxis": {"title": "number of motions", "tickformat": "d"},
            "bargap": 0.5,
            "barmode": "stack",
            "plot_bgcolor": BACKGROUND_COLOR,
        }
    })
}

/// One closed polar trace per proposer, over all the topics.
pub fn proposals_figure(m: &ProposalMatrix) -> JSValue {
    let text = "topic distribution of motions proposed by different parties";
    if m.is_empty() {
        return empty_figure(text);
    }
    let data: Vec<JSValue> = m
        .proposers
        .iter()
        .zip(m.counts.iter())
        .map(|(proposer, row)| {
            json!({
                "type": "scatterpolar",
                "name": proposer,
                "r": row,
                "theta": m.topics,
                "fill": "toself",
            })
        })
        .collect();
    json!({
        "data": data,
        "layout": {
            "title": title(text),
            "polar": {
                "radialaxis": {"gridcolor": GRID_COLOR, "tickformat": "d"},
                "bgcolor": BACKGROUND_COLOR,
            }
        }
    })
}

pub fn correlation_figure(c: &PartyCorrelation) -> JSValue {
    let text = "correlation between the votes of the parties";
    if c.is_empty() {
        return empty_figure(text);
    }
    json!({
        "data": [{
            "type": "heatmap",
            "x": c.parties,
            "y": c.parties,
            "z": c.values,
            "zmin": -1.0,
            "zmax": 1.0,
            "colorscale": "RdBu",
        }],
        "layout": {
            "title": title(text),
            "yaxis": {"autorange": "reversed"},
            "plot_bgcolor": BACKGROUND_COLOR,
        }
    })
}
