//! Verdicts and state-level queries over a completed check.

use crate::checker::{Model, StateSets};
use crate::sets::StateSet;
use ctlmc_syntax::Formula;
use ctlmc_ts::{StateId, TransitionSystem};
use std::fmt;
use tracing::debug;

/// Three-valued outcome for a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Satisfied,
    Refuted,
    /// Neither confirmed nor refuted: the deciding paths run through
    /// unexplored continuations. Distinct from [`Verdict::Refuted`].
    Undetermined,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Satisfied => write!(f, "satisfied"),
            Verdict::Refuted => write!(f, "refuted"),
            Verdict::Undetermined => write!(f, "undetermined"),
        }
    }
}

/// Result of checking one formula against one system.
///
/// Read-only: wraps the top-level satisfaction record and answers
/// membership queries by state id plus the initial-state verdict.
pub struct Analysis<'s> {
    system: &'s TransitionSystem,
    formula: Formula,
    record: StateSets,
}

/// Check a formula against a system and wrap the result.
pub fn check<'s>(system: &'s TransitionSystem, formula: &Formula) -> Analysis<'s> {
    debug!(
        states = system.len(),
        edges = system.edge_count(),
        formula = %formula,
        "checking formula"
    );
    let mut model = Model::new(system);
    let record = model.check(formula);
    debug!(
        sat = record.sat.len(),
        refuted = record.refuted.len(),
        unknown = record.unknown().len(),
        cache_hits = model.cache_hits(),
        "check complete"
    );
    Analysis {
        system,
        formula: formula.clone(),
        record,
    }
}

impl<'s> Analysis<'s> {
    pub fn system(&self) -> &'s TransitionSystem {
        self.system
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// The top-level satisfaction record.
    pub fn record(&self) -> &StateSets {
        &self.record
    }

    /// Verdict for the distinguished initial state.
    pub fn verdict(&self) -> Verdict {
        self.verdict_at(self.system.initial_index())
    }

    /// Verdict for an arbitrary state id, or `None` for an undeclared id.
    pub fn verdict_of(&self, id: StateId) -> Option<Verdict> {
        self.system.index_of(id).map(|index| self.verdict_at(index))
    }

    fn verdict_at(&self, index: usize) -> Verdict {
        if self.record.sat.contains(index) {
            Verdict::Satisfied
        } else if self.record.refuted.contains(index) {
            Verdict::Refuted
        } else {
            Verdict::Undetermined
        }
    }

    /// Ids of the states known to satisfy the formula, ascending.
    pub fn satisfying(&self) -> Vec<StateId> {
        self.ids_of(&self.record.sat)
    }

    /// Ids of the states known to refute the formula, ascending.
    pub fn refuting(&self) -> Vec<StateId> {
        self.ids_of(&self.record.refuted)
    }

    /// Ids of the states left undetermined, ascending.
    pub fn undetermined(&self) -> Vec<StateId> {
        self.ids_of(&self.record.unknown())
    }

    fn ids_of(&self, set: &StateSet) -> Vec<StateId> {
        set.iter().map(|index| self.system.id_of(index)).collect()
    }
}
