//! External artifact schema.
//!
//! The exploration collaborator hands over two JSON documents: a label
//! listing (which atomic propositions hold in which states) and a
//! transition listing (the recorded successor relation plus an optional
//! truncation marker). [`build_system`] joins and validates them into a
//! [`TransitionSystem`].

use crate::system::{StateId, SystemBuilder, SystemError, TransitionSystem};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Label listing artifact.
///
/// Entries for the same state id are merged. Propositions are free-form
/// names; the checker accepts any string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelListing {
    /// When set, the labelling is complete even for truncated states: a
    /// state without a proposition refutes the matching atom instead of
    /// leaving it undetermined.
    #[serde(default)]
    pub total: bool,
    pub states: Vec<LabelEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelEntry {
    pub id: StateId,
    pub propositions: Vec<String>,
}

/// Transition listing artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransitionListing {
    pub states: Vec<TransitionEntry>,
    /// States whose successor list was cut off by the exploration bound.
    /// When present, every unlisted state is explored. When absent, the
    /// producer made no completeness claim and the configured
    /// [`ExplorationDefault`] decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<Vec<StateId>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransitionEntry {
    pub id: StateId,
    pub successors: Vec<StateId>,
}

/// How to treat states when the transition listing carries no truncation
/// marker at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExplorationDefault {
    /// No completeness claim was made: treat every state as truncated.
    #[default]
    Truncated,
    /// The producer's contract guarantees exhaustive exploration.
    Explored,
}

/// Artifact loading error.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed label listing: {0}")]
    Labels(#[source] serde_json::Error),

    #[error("malformed transition listing: {0}")]
    Transitions(#[source] serde_json::Error),

    #[error(transparent)]
    System(#[from] SystemError),
}

/// Join the two listings into a validated [`TransitionSystem`].
pub fn build_system(
    labels: &LabelListing,
    transitions: &TransitionListing,
    default: ExplorationDefault,
) -> Result<TransitionSystem, SystemError> {
    let declared: HashSet<StateId> = transitions.states.iter().map(|s| s.id).collect();

    let truncated: HashSet<StateId> = match &transitions.truncated {
        Some(marked) => {
            for &id in marked {
                if !declared.contains(&id) {
                    return Err(SystemError::UnknownTruncatedState(id));
                }
            }
            marked.iter().copied().collect()
        }
        None => match default {
            ExplorationDefault::Truncated => declared.iter().copied().collect(),
            ExplorationDefault::Explored => HashSet::new(),
        },
    };

    let mut labelling: HashMap<StateId, Vec<String>> = HashMap::new();
    for entry in &labels.states {
        if !declared.contains(&entry.id) {
            return Err(SystemError::UnknownLabelledState(entry.id));
        }
        labelling
            .entry(entry.id)
            .or_default()
            .extend(entry.propositions.iter().cloned());
    }

    let mut builder = SystemBuilder::new().total_labeling(labels.total);
    for entry in &transitions.states {
        let props = labelling.remove(&entry.id).unwrap_or_default();
        let successors = entry.successors.clone();
        builder = if truncated.contains(&entry.id) {
            builder.truncated(entry.id, props, successors)
        } else {
            builder.explored(entry.id, props, successors)
        };
    }
    builder.build()
}

/// Decode both artifacts from JSON text and build the system.
pub fn load_system(
    labels_json: &str,
    transitions_json: &str,
    default: ExplorationDefault,
) -> Result<TransitionSystem, LoadError> {
    let labels: LabelListing = serde_json::from_str(labels_json).map_err(LoadError::Labels)?;
    let transitions: TransitionListing =
        serde_json::from_str(transitions_json).map_err(LoadError::Transitions)?;
    Ok(build_system(&labels, &transitions, default)?)
}
