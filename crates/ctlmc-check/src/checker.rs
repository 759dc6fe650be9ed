//! Three-valued bottom-up CTL evaluation.
//!
//! Every subformula gets a satisfaction record: the states known to satisfy
//! it and the states known to refute it. On a fully explored system the two
//! sets partition the universe and the evaluation is classical; truncation
//! leaves the states whose deciding paths run through unexplored
//! continuations in neither set.
//!
//! A recorded edge is a real edge, so an existential witness found among
//! recorded successors counts even at a truncated state. Universal claims
//! about successors need the `explored` flag. A finite maximal path ending
//! in a genuine terminal counts for EG/AF, which keeps `EG true` equivalent
//! to `true` on explored systems.

use crate::sets::{greatest_fixpoint, least_fixpoint, StateSet};
use ctlmc_syntax::Formula;
use ctlmc_ts::TransitionSystem;
use std::collections::HashMap;

/// Satisfaction record for one formula over one system.
///
/// `sat` and `refuted` are disjoint; every other state is undetermined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateSets {
    pub sat: StateSet,
    pub refuted: StateSet,
}

impl StateSets {
    fn new(sat: StateSet, refuted: StateSet) -> Self {
        debug_assert!(sat.is_disjoint(&refuted));
        Self { sat, refuted }
    }

    /// States in neither set.
    pub fn unknown(&self) -> StateSet {
        self.sat.union(&self.refuted).complement()
    }
}

/// Memoizing bottom-up evaluator for one transition system.
///
/// Records are cached per distinct subformula (structural equality), so a
/// subformula shared between branches is evaluated once.
pub struct Model<'s> {
    system: &'s TransitionSystem,
    explored: StateSet,
    cache: HashMap<Formula, StateSets>,
    cache_hits: usize,
}

impl<'s> Model<'s> {
    pub fn new(system: &'s TransitionSystem) -> Self {
        let mut explored = StateSet::empty(system.len());
        for s in 0..system.len() {
            if system.is_explored(s) {
                explored.insert(s);
            }
        }
        Self {
            system,
            explored,
            cache: HashMap::new(),
            cache_hits: 0,
        }
    }

    pub fn system(&self) -> &'s TransitionSystem {
        self.system
    }

    /// Number of times a subformula record was served from the cache.
    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    /// Evaluate a formula, reusing any cached subformula records.
    pub fn check(&mut self, formula: &Formula) -> StateSets {
        if let Some(record) = self.cache.get(formula) {
            self.cache_hits += 1;
            return record.clone();
        }
        let record = self.evaluate(formula);
        debug_assert!(record.sat.is_disjoint(&record.refuted));
        self.cache.insert(formula.clone(), record.clone());
        record
    }

    fn evaluate(&mut self, formula: &Formula) -> StateSets {
        let n = self.system.len();
        match formula {
            Formula::True => StateSets::new(StateSet::full(n), StateSet::empty(n)),
            Formula::False => StateSets::new(StateSet::empty(n), StateSet::full(n)),
            Formula::Atom(name) => self.check_atom(name),
            Formula::Not(f) => {
                let inner = self.check(f);
                StateSets::new(inner.refuted, inner.sat)
            }
            Formula::And(l, r) => {
                let (l, r) = (self.check(l), self.check(r));
                StateSets::new(l.sat.intersection(&r.sat), l.refuted.union(&r.refuted))
            }
            Formula::Or(l, r) => {
                let (l, r) = (self.check(l), self.check(r));
                StateSets::new(l.sat.union(&r.sat), l.refuted.intersection(&r.refuted))
            }
            Formula::Implies(l, r) => {
                let (l, r) = (self.check(l), self.check(r));
                StateSets::new(l.refuted.union(&r.sat), l.sat.intersection(&r.refuted))
            }
            Formula::Iff(l, r) => {
                let (l, r) = (self.check(l), self.check(r));
                StateSets::new(
                    l.sat.intersection(&r.sat).union(&l.refuted.intersection(&r.refuted)),
                    l.sat.intersection(&r.refuted).union(&l.refuted.intersection(&r.sat)),
                )
            }
            Formula::ExistsNext(f) => self.check_exists_next(f),
            Formula::ForAllNext(f) => self.check_forall_next(f),
            Formula::ExistsAlways(f) => self.check_exists_always(f),
            Formula::ForAllAlways(f) => self.check_forall_always(f),
            Formula::ExistsEventually(f) => self.check_exists_eventually(f),
            Formula::ForAllEventually(f) => self.check_forall_eventually(f),
            Formula::ExistsUntil(l, r) => self.check_exists_until(l, r),
            Formula::ForAllUntil(l, r) => self.check_forall_until(l, r),
        }
    }

    /// Labelled states satisfy the atom. Refutation needs either an
    /// explored state (its label set is final) or a labelling declared
    /// total by the producer.
    fn check_atom(&self, name: &str) -> StateSets {
        let n = self.system.len();
        let mut sat = StateSet::empty(n);
        for &i in self.system.labelled(name) {
            sat.insert(i as usize);
        }
        let refuted = if self.system.total_labeling() {
            sat.complement()
        } else {
            sat.complement().intersection(&self.explored)
        };
        StateSets::new(sat, refuted)
    }

    // === One-step closures ===

    fn some_successor_in(&self, s: usize, target: &StateSet) -> bool {
        self.system
            .successors(s)
            .iter()
            .any(|&t| target.contains(t as usize))
    }

    /// Vacuously true at states with no recorded successors; callers guard
    /// with `explored`/`terminal` where the semantics require it.
    fn all_successors_in(&self, s: usize, target: &StateSet) -> bool {
        self.system
            .successors(s)
            .iter()
            .all(|&t| target.contains(t as usize))
    }

    /// EX: a recorded successor satisfying `f` is a witness regardless of
    /// truncation; refutation needs the complete successor list.
    fn check_exists_next(&mut self, f: &Formula) -> StateSets {
        let inner = self.check(f);
        let n = self.system.len();
        let mut sat = StateSet::empty(n);
        let mut refuted = StateSet::empty(n);
        for s in 0..n {
            if self.some_successor_in(s, &inner.sat) {
                sat.insert(s);
            } else if self.system.is_explored(s) && self.all_successors_in(s, &inner.refuted) {
                refuted.insert(s);
            }
        }
        StateSets::new(sat, refuted)
    }

    /// AX: dual of EX. Holds vacuously at explored terminals; a truncated
    /// state is never confirmed because an unseen successor might fail `f`.
    fn check_forall_next(&mut self, f: &Formula) -> StateSets {
        let inner = self.check(f);
        let n = self.system.len();
        let mut sat = StateSet::empty(n);
        let mut refuted = StateSet::empty(n);
        for s in 0..n {
            if self.some_successor_in(s, &inner.refuted) {
                refuted.insert(s);
            } else if self.system.is_explored(s) && self.all_successors_in(s, &inner.sat) {
                sat.insert(s);
            }
        }
        StateSets::new(sat, refuted)
    }

    /// EG: some maximal path stays in `f` forever (or until a genuine
    /// terminal). Refutation is the AF of the refutation of `f`.
    fn check_exists_always(&mut self, f: &Formula) -> StateSets {
        let inner = self.check(f);
        let sat = greatest_fixpoint(inner.sat, |s, kept| {
            self.system.is_terminal(s) || self.some_successor_in(s, kept)
        });
        let refuted = least_fixpoint(inner.refuted, |s, z| {
            self.system.is_explored(s)
                && !self.system.successors(s).is_empty()
                && self.all_successors_in(s, z)
        });
        StateSets::new(sat, refuted)
    }

    /// AG: every reachable state on every path satisfies `f`. Confirmation
    /// is restricted to explored states; a single refuting successor chain
    /// refutes.
    fn check_forall_always(&mut self, f: &Formula) -> StateSets {
        let inner = self.check(f);
        let sat = greatest_fixpoint(inner.sat.intersection(&self.explored), |s, kept| {
            self.all_successors_in(s, kept)
        });
        let refuted = least_fixpoint(inner.refuted, |s, z| self.some_successor_in(s, z));
        StateSets::new(sat, refuted)
    }

    /// EF: reachability of `f` along recorded edges. Refutation needs the
    /// whole explored region around the state to refute `f`.
    fn check_exists_eventually(&mut self, f: &Formula) -> StateSets {
        let inner = self.check(f);
        let sat = least_fixpoint(inner.sat, |s, z| self.some_successor_in(s, z));
        let refuted = greatest_fixpoint(inner.refuted.intersection(&self.explored), |s, kept| {
            self.all_successors_in(s, kept)
        });
        StateSets::new(sat, refuted)
    }

    /// AF: every maximal path eventually satisfies `f`. A truncated state
    /// is only confirmed via the base case; refutation is the EG of the
    /// refutation of `f`.
    fn check_forall_eventually(&mut self, f: &Formula) -> StateSets {
        let inner = self.check(f);
        let sat = least_fixpoint(inner.sat, |s, z| {
            self.system.is_explored(s)
                && !self.system.successors(s).is_empty()
                && self.all_successors_in(s, z)
        });
        let refuted = greatest_fixpoint(inner.refuted, |s, kept| {
            self.system.is_terminal(s) || self.some_successor_in(s, kept)
        });
        StateSets::new(sat, refuted)
    }

    /// EU: backward propagation from the `right`-satisfying frontier
    /// through `left`-satisfying states. Refuted where `right` is refuted
    /// and, along every complete continuation, stays refuted past any
    /// chance of `left` carrying the path.
    fn check_exists_until(&mut self, l: &Formula, r: &Formula) -> StateSets {
        let left = self.check(l);
        let right = self.check(r);
        let sat = least_fixpoint(right.sat, |s, z| {
            left.sat.contains(s) && self.some_successor_in(s, z)
        });
        let refuted = greatest_fixpoint(right.refuted, |s, kept| {
            left.refuted.contains(s)
                || (self.system.is_explored(s) && self.all_successors_in(s, kept))
        });
        StateSets::new(sat, refuted)
    }

    /// AU: like EU but every successor must already carry the obligation,
    /// so truncated states and terminals never join through propagation.
    /// Refutation covers both failure modes: a `right`-refuting path
    /// reaching a state refuting both sides, and a maximal path where
    /// `right` never holds.
    fn check_forall_until(&mut self, l: &Formula, r: &Formula) -> StateSets {
        let left = self.check(l);
        let right = self.check(r);
        let sat = least_fixpoint(right.sat, |s, z| {
            left.sat.contains(s)
                && self.system.is_explored(s)
                && !self.system.successors(s).is_empty()
                && self.all_successors_in(s, z)
        });
        let never_right = greatest_fixpoint(right.refuted.clone(), |s, kept| {
            self.system.is_terminal(s) || self.some_successor_in(s, kept)
        });
        let seed = left.refuted.intersection(&right.refuted).union(&never_right);
        let refuted = least_fixpoint(seed, |s, z| {
            right.refuted.contains(s) && self.some_successor_in(s, z)
        });
        StateSets::new(sat, refuted)
    }
}
