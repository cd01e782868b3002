//! Maps a topic selected by the user to a value computed in advance (typically a chart).

use log::{debug, warn};

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// The topic that was asked for has no precomputed value.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LookupMiss {
    pub topic: String,
}

impl Error for LookupMiss {}

impl Display for LookupMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no value for topic {:?}", self.topic)
    }
}

/// What to show when the selected topic is unknown.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub enum FallbackPolicy {
    /// Show the placeholder (an empty chart).
    #[default]
    Placeholder,
    /// Show the first topic in lexicographic order, or the placeholder if there is none.
    FirstTopic,
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "placeholder" => Ok(FallbackPolicy::Placeholder),
            "first_topic" | "firstTopic" => Ok(FallbackPolicy::FirstTopic),
            x => Err(format!("unknown fallback policy: {}", x)),
        }
    }
}

// Same names as the ones accepted by `from_str`.
impl Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackPolicy::Placeholder => write!(f, "placeholder"),
            FallbackPolicy::FirstTopic => write!(f, "first_topic"),
        }
    }
}

/// An immutable mapping from topic labels to values, built once at startup.
#[derive(Debug, Clone)]
pub struct TopicBinding<T> {
    entries: BTreeMap<String, T>,
    placeholder: T,
    policy: FallbackPolicy,
}

impl<T> TopicBinding<T> {
    pub fn new<I>(entries: I, placeholder: T, policy: FallbackPolicy) -> TopicBinding<T>
    where
        I: IntoIterator<Item = (String, T)>,
    {
        let entries: BTreeMap<String, T> = entries.into_iter().collect();
        debug!(
            "TopicBinding::new: {} topics, policy: {:?}",
            entries.len(),
            policy
        );
        TopicBinding {
            entries,
            placeholder,
            policy,
        }
    }

    /// The topics, in lexicographic order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn placeholder(&self) -> &T {
        &self.placeholder
    }

    pub fn get(&self, topic: &str) -> Result<&T, LookupMiss> {
        self.entries.get(topic).ok_or_else(|| LookupMiss {
            topic: topic.to_string(),
        })
    }

    /// Like [`TopicBinding::get`], but never fails: a miss is resolved with the policy.
    pub fn resolve(&self, topic: &str) -> &T {
        match self.get(topic) {
            Ok(x) => x,
            Err(miss) => {
                warn!("{}, falling back to {:?}", miss, self.policy);
                match self.policy {
                    FallbackPolicy::Placeholder => &self.placeholder,
                    FallbackPolicy::FirstTopic => self
                        .entries
                        .values()
                        .next()
                        .unwrap_or(&self.placeholder),
                }
            }
        }
    }
}
