//! Labelled partial transition system.
//!
//! States carry an explored/truncated flag: a state with no recorded
//! successors is a genuine terminal only when explored. Truncated states
//! have unknown continuations and the checker treats them conservatively.

use smallvec::SmallVec;
use std::collections::HashMap;
use thiserror::Error;

/// State identifier assigned by the exploration collaborator.
///
/// Identifiers are dense-ish but not necessarily contiguous.
pub type StateId = u32;

/// The distinguished initial state, by producer convention.
pub const INITIAL_STATE: StateId = 0;

/// Transition system construction error.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("duplicate state id {0}")]
    DuplicateState(StateId),

    #[error("state {from} has undeclared successor {to}")]
    DanglingSuccessor { from: StateId, to: StateId },

    #[error("label listing references undeclared state {0}")]
    UnknownLabelledState(StateId),

    #[error("truncation marker references undeclared state {0}")]
    UnknownTruncatedState(StateId),

    #[error("initial state {0} is not declared")]
    MissingInitialState(StateId),
}

pub type SystemResult<T> = Result<T, SystemError>;

/// An immutable labelled transition system over a fixed state universe.
///
/// States are stored densely: public queries take a dense index in
/// `0..len()`, obtained from a [`StateId`] via [`index_of`]. Successor
/// lists hold dense indices too, so fixpoint loops never touch the id map.
///
/// [`index_of`]: TransitionSystem::index_of
#[derive(Debug, Clone)]
pub struct TransitionSystem {
    /// State ids in ascending order; position = dense index.
    ids: Vec<StateId>,
    index: HashMap<StateId, u32>,
    /// Recorded successors per state, as dense indices.
    successors: Vec<SmallVec<[u32; 4]>>,
    explored: Vec<bool>,
    /// Proposition name to the sorted dense indices of states labelled with it.
    labels: HashMap<String, Vec<u32>>,
    total_labeling: bool,
}

impl TransitionSystem {
    /// Number of states.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of recorded transitions.
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(|s| s.len()).sum()
    }

    /// State ids in ascending order, position matching the dense index.
    pub fn ids(&self) -> &[StateId] {
        &self.ids
    }

    /// Dense index of a state id, if the state is declared.
    pub fn index_of(&self, id: StateId) -> Option<usize> {
        self.index.get(&id).map(|&i| i as usize)
    }

    /// State id at a dense index.
    pub fn id_of(&self, index: usize) -> StateId {
        self.ids[index]
    }

    /// Dense index of the initial state. The builder guarantees it exists.
    pub fn initial_index(&self) -> usize {
        self.index[&INITIAL_STATE] as usize
    }

    /// Recorded successors of the state at `index`, as dense indices.
    pub fn successors(&self, index: usize) -> &[u32] {
        &self.successors[index]
    }

    /// Whether the successor list at `index` is complete.
    pub fn is_explored(&self, index: usize) -> bool {
        self.explored[index]
    }

    /// Whether the state at `index` is a genuine terminal: explored with
    /// no successors. A truncated state with no recorded successors is not
    /// terminal, its continuations are merely unknown.
    pub fn is_terminal(&self, index: usize) -> bool {
        self.explored[index] && self.successors[index].is_empty()
    }

    /// Sorted dense indices of the states labelled with `proposition`.
    /// Unknown propositions yield an empty slice.
    pub fn labelled(&self, proposition: &str) -> &[u32] {
        self.labels.get(proposition).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the state at `index` is labelled with `proposition`.
    pub fn has_label(&self, index: usize, proposition: &str) -> bool {
        self.labelled(proposition).binary_search(&(index as u32)).is_ok()
    }

    /// Distinct proposition names appearing in the labelling, sorted.
    pub fn propositions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.labels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Whether the labelling is declared complete even for truncated
    /// states, so an absent proposition refutes the atom instead of
    /// leaving it undetermined.
    pub fn total_labeling(&self) -> bool {
        self.total_labeling
    }
}

/// Builder assembling a validated [`TransitionSystem`].
///
/// Validation happens in [`build`]: duplicate ids, successors referencing
/// undeclared states, and a missing initial state are all rejected, so a
/// system is never partially loaded.
///
/// [`build`]: SystemBuilder::build
#[derive(Debug, Default)]
pub struct SystemBuilder {
    states: Vec<PendingState>,
    total_labeling: bool,
}

#[derive(Debug)]
struct PendingState {
    id: StateId,
    labels: Vec<String>,
    successors: Vec<StateId>,
    explored: bool,
}

impl SystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a state whose successor list is complete.
    pub fn explored(mut self, id: StateId, labels: Vec<String>, successors: Vec<StateId>) -> Self {
        self.states.push(PendingState {
            id,
            labels,
            successors,
            explored: true,
        });
        self
    }

    /// Declare a state whose exploration was cut off: the recorded
    /// successors are real but possibly incomplete.
    pub fn truncated(mut self, id: StateId, labels: Vec<String>, successors: Vec<StateId>) -> Self {
        self.states.push(PendingState {
            id,
            labels,
            successors,
            explored: false,
        });
        self
    }

    /// Declare the labelling total (see [`TransitionSystem::total_labeling`]).
    pub fn total_labeling(mut self, total: bool) -> Self {
        self.total_labeling = total;
        self
    }

    pub fn build(self) -> SystemResult<TransitionSystem> {
        let mut ids: Vec<StateId> = self.states.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        if let Some(w) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(SystemError::DuplicateState(w[0]));
        }

        let index: HashMap<StateId, u32> = ids
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos as u32))
            .collect();
        if !index.contains_key(&INITIAL_STATE) {
            return Err(SystemError::MissingInitialState(INITIAL_STATE));
        }

        let mut successors: Vec<SmallVec<[u32; 4]>> = vec![SmallVec::new(); ids.len()];
        let mut explored = vec![false; ids.len()];
        let mut labels: HashMap<String, Vec<u32>> = HashMap::new();

        for state in self.states {
            let pos = index[&state.id] as usize;
            explored[pos] = state.explored;

            let mut succ = SmallVec::with_capacity(state.successors.len());
            for target in state.successors {
                match index.get(&target) {
                    Some(&t) => succ.push(t),
                    None => {
                        return Err(SystemError::DanglingSuccessor {
                            from: state.id,
                            to: target,
                        })
                    }
                }
            }
            successors[pos] = succ;

            for label in state.labels {
                labels.entry(label).or_default().push(pos as u32);
            }
        }

        for indices in labels.values_mut() {
            indices.sort_unstable();
            indices.dedup();
        }

        Ok(TransitionSystem {
            ids,
            index,
            successors,
            explored,
            labels,
            total_labeling: self.total_labeling,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_system() -> TransitionSystem {
        // 0 -> 1, 1 -> 1, label(1) = {p}
        SystemBuilder::new()
            .explored(0, vec![], vec![1])
            .explored(1, vec!["p".to_string()], vec![1])
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_and_query() {
        let sys = two_state_system();
        assert_eq!(sys.len(), 2);
        assert_eq!(sys.edge_count(), 2);
        assert_eq!(sys.ids(), &[0, 1]);
        assert_eq!(sys.index_of(0), Some(0));
        assert_eq!(sys.index_of(1), Some(1));
        assert_eq!(sys.index_of(7), None);
        assert_eq!(sys.id_of(1), 1);
        assert_eq!(sys.initial_index(), 0);
        assert_eq!(sys.successors(0), &[1]);
        assert_eq!(sys.successors(1), &[1]);
        assert!(sys.is_explored(0));
        assert!(!sys.is_terminal(1)); // has a self-loop
        assert!(sys.has_label(1, "p"));
        assert!(!sys.has_label(0, "p"));
        assert_eq!(sys.labelled("p"), &[1]);
        assert!(sys.labelled("q").is_empty());
        assert_eq!(sys.propositions(), vec!["p"]);
        assert!(!sys.total_labeling());
    }

    #[test]
    fn test_sparse_ids_get_dense_indices() {
        let sys = SystemBuilder::new()
            .explored(0, vec![], vec![17])
            .explored(17, vec!["p".to_string()], vec![5])
            .explored(5, vec![], vec![])
            .build()
            .unwrap();
        assert_eq!(sys.ids(), &[0, 5, 17]);
        assert_eq!(sys.index_of(17), Some(2));
        assert_eq!(sys.successors(0), &[2]); // dense index of 17
        assert_eq!(sys.successors(2), &[1]); // dense index of 5
        assert_eq!(sys.labelled("p"), &[2]);
        assert!(sys.is_terminal(1));
    }

    #[test]
    fn test_terminal_requires_explored() {
        let sys = SystemBuilder::new()
            .explored(0, vec![], vec![1, 2])
            .explored(1, vec![], vec![])
            .truncated(2, vec![], vec![])
            .build()
            .unwrap();
        assert!(sys.is_terminal(1));
        assert!(!sys.is_terminal(2));
        assert!(!sys.is_explored(2));
    }

    #[test]
    fn test_duplicate_state_rejected() {
        let err = SystemBuilder::new()
            .explored(0, vec![], vec![])
            .truncated(0, vec![], vec![])
            .build()
            .unwrap_err();
        assert!(matches!(err, SystemError::DuplicateState(0)));
    }

    #[test]
    fn test_dangling_successor_rejected() {
        let err = SystemBuilder::new()
            .explored(0, vec![], vec![3])
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SystemError::DanglingSuccessor { from: 0, to: 3 }
        ));
    }

    #[test]
    fn test_missing_initial_state_rejected() {
        let err = SystemBuilder::new()
            .explored(1, vec![], vec![1])
            .build()
            .unwrap_err();
        assert!(matches!(err, SystemError::MissingInitialState(0)));
        assert!(matches!(
            SystemBuilder::new().build().unwrap_err(),
            SystemError::MissingInitialState(0)
        ));
    }

    #[test]
    fn test_repeated_label_deduplicated() {
        let sys = SystemBuilder::new()
            .explored(0, vec!["p".to_string(), "p".to_string()], vec![])
            .build()
            .unwrap();
        assert_eq!(sys.labelled("p"), &[0]);
    }

    #[test]
    fn test_total_labeling_flag() {
        let sys = SystemBuilder::new()
            .explored(0, vec![], vec![])
            .total_labeling(true)
            .build()
            .unwrap();
        assert!(sys.total_labeling());
    }

    #[test]
    fn test_system_is_shareable_across_threads() {
        // Checks run in parallel over a shared read-only system.
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransitionSystem>();
    }
}
