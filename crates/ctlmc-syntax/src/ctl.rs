//! CTL formula AST: structural equality, algebraic simplification, and
//! rendering.
//!
//! Formulas are immutable trees. Equality and hashing are structural, so
//! two independently built copies of the same formula compare equal and
//! can share one slot in the checker's per-subformula cache.

use std::collections::BTreeSet;
use std::fmt;

/// A CTL state formula.
///
/// Path quantifiers pair with temporal operators: `ExistsNext` is `EX`,
/// `ForAllUntil` is `AU`, and so on. Binary variants are order-sensitive;
/// atom names are case-sensitive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Formula {
    /// `true`
    True,
    /// `false`
    False,
    /// Atomic proposition, an opaque name supplied by the labelling side.
    Atom(String),
    /// `! f`
    Not(Box<Formula>),
    /// `f && g`
    And(Box<Formula>, Box<Formula>),
    /// `f || g`
    Or(Box<Formula>, Box<Formula>),
    /// `f -> g`
    Implies(Box<Formula>, Box<Formula>),
    /// `f <-> g`
    Iff(Box<Formula>, Box<Formula>),
    /// `EX f`
    ExistsNext(Box<Formula>),
    /// `AX f`
    ForAllNext(Box<Formula>),
    /// `EG f`
    ExistsAlways(Box<Formula>),
    /// `AG f`
    ForAllAlways(Box<Formula>),
    /// `EF f`
    ExistsEventually(Box<Formula>),
    /// `AF f`
    ForAllEventually(Box<Formula>),
    /// `f EU g`
    ExistsUntil(Box<Formula>, Box<Formula>),
    /// `f AU g`
    ForAllUntil(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// Atomic proposition.
    pub fn atom(name: impl Into<String>) -> Self {
        Formula::Atom(name.into())
    }

    /// `! self`
    pub fn not(self) -> Self {
        Formula::Not(Box::new(self))
    }

    /// `self && rhs`
    pub fn and(self, rhs: Self) -> Self {
        Formula::And(Box::new(self), Box::new(rhs))
    }

    /// `self || rhs`
    pub fn or(self, rhs: Self) -> Self {
        Formula::Or(Box::new(self), Box::new(rhs))
    }

    /// `self -> rhs`
    pub fn implies(self, rhs: Self) -> Self {
        Formula::Implies(Box::new(self), Box::new(rhs))
    }

    /// `self <-> rhs`
    pub fn iff(self, rhs: Self) -> Self {
        Formula::Iff(Box::new(self), Box::new(rhs))
    }

    /// `EX self`
    pub fn ex(self) -> Self {
        Formula::ExistsNext(Box::new(self))
    }

    /// `AX self`
    pub fn ax(self) -> Self {
        Formula::ForAllNext(Box::new(self))
    }

    /// `EG self`
    pub fn eg(self) -> Self {
        Formula::ExistsAlways(Box::new(self))
    }

    /// `AG self`
    pub fn ag(self) -> Self {
        Formula::ForAllAlways(Box::new(self))
    }

    /// `EF self`
    pub fn ef(self) -> Self {
        Formula::ExistsEventually(Box::new(self))
    }

    /// `AF self`
    pub fn af(self) -> Self {
        Formula::ForAllEventually(Box::new(self))
    }

    /// `self EU rhs`
    pub fn eu(self, rhs: Self) -> Self {
        Formula::ExistsUntil(Box::new(self), Box::new(rhs))
    }

    /// `self AU rhs`
    pub fn au(self, rhs: Self) -> Self {
        Formula::ForAllUntil(Box::new(self), Box::new(rhs))
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Formula::True | Formula::False | Formula::Atom(_) => 1,
            Formula::Not(f)
            | Formula::ExistsNext(f)
            | Formula::ForAllNext(f)
            | Formula::ExistsAlways(f)
            | Formula::ForAllAlways(f)
            | Formula::ExistsEventually(f)
            | Formula::ForAllEventually(f) => 1 + f.size(),
            Formula::And(l, r)
            | Formula::Or(l, r)
            | Formula::Implies(l, r)
            | Formula::Iff(l, r)
            | Formula::ExistsUntil(l, r)
            | Formula::ForAllUntil(l, r) => 1 + l.size() + r.size(),
        }
    }

    /// Collect the distinct atomic propositions referenced by the formula,
    /// in deterministic order. The labelling side uses this set to validate
    /// that every proposition maps to something it can observe.
    pub fn atoms(&self) -> BTreeSet<&str> {
        let mut acc = BTreeSet::new();
        self.collect_atoms(&mut acc);
        acc
    }

    fn collect_atoms<'a>(&'a self, acc: &mut BTreeSet<&'a str>) {
        match self {
            Formula::True | Formula::False => {}
            Formula::Atom(name) => {
                acc.insert(name.as_str());
            }
            Formula::Not(f)
            | Formula::ExistsNext(f)
            | Formula::ForAllNext(f)
            | Formula::ExistsAlways(f)
            | Formula::ForAllAlways(f)
            | Formula::ExistsEventually(f)
            | Formula::ForAllEventually(f) => f.collect_atoms(acc),
            Formula::And(l, r)
            | Formula::Or(l, r)
            | Formula::Implies(l, r)
            | Formula::Iff(l, r)
            | Formula::ExistsUntil(l, r)
            | Formula::ForAllUntil(l, r) => {
                l.collect_atoms(acc);
                r.collect_atoms(acc);
            }
        }
    }

    /// Simplify the formula bottom-up with the constant identities of
    /// propositional logic and their temporal counterparts. Returns a new,
    /// semantically equivalent tree that is never larger than the input.
    ///
    /// `EX`/`AX` never constant-collapse: `EX true` is false at a terminal
    /// state and unknown at a truncated one, and `AX false` is true at a
    /// terminal, so the Next operators have no constant identities. The
    /// until collapses are one-sided for the same reason: only a constantly
    /// false side forces the outcome on every path.
    pub fn simplify(&self) -> Formula {
        match self {
            Formula::True | Formula::False | Formula::Atom(_) => self.clone(),

            Formula::Not(f) => match f.simplify() {
                Formula::True => Formula::False,
                Formula::False => Formula::True,
                f => f.not(),
            },

            Formula::And(l, r) => match (l.simplify(), r.simplify()) {
                (Formula::False, _) | (_, Formula::False) => Formula::False,
                (Formula::True, r) => r,
                (l, Formula::True) => l,
                (l, r) => l.and(r),
            },

            Formula::Or(l, r) => match (l.simplify(), r.simplify()) {
                (Formula::True, _) | (_, Formula::True) => Formula::True,
                (Formula::False, r) => r,
                (l, Formula::False) => l,
                (l, r) => l.or(r),
            },

            Formula::Implies(l, r) => match (l.simplify(), r.simplify()) {
                (Formula::False, _) | (_, Formula::True) => Formula::True,
                (Formula::True, r) => r,
                // Re-simplify so `a -> false` normalizes through the Not rules.
                (l, Formula::False) => l.not().simplify(),
                (l, r) => l.implies(r),
            },

            Formula::Iff(l, r) => match (l.simplify(), r.simplify()) {
                (Formula::True, r) => r,
                (l, Formula::True) => l,
                (Formula::False, r) => r.not().simplify(),
                (l, Formula::False) => l.not().simplify(),
                (l, r) => l.iff(r),
            },

            Formula::ExistsNext(f) => f.simplify().ex(),
            Formula::ForAllNext(f) => f.simplify().ax(),

            Formula::ExistsAlways(f) => match f.simplify() {
                Formula::True => Formula::True,
                Formula::False => Formula::False,
                f => f.eg(),
            },
            Formula::ForAllAlways(f) => match f.simplify() {
                Formula::True => Formula::True,
                Formula::False => Formula::False,
                f => f.ag(),
            },
            Formula::ExistsEventually(f) => match f.simplify() {
                Formula::True => Formula::True,
                Formula::False => Formula::False,
                f => f.ef(),
            },
            Formula::ForAllEventually(f) => match f.simplify() {
                Formula::True => Formula::True,
                Formula::False => Formula::False,
                f => f.af(),
            },

            Formula::ExistsUntil(l, r) => match (l.simplify(), r.simplify()) {
                // Right never holds: no path can discharge the until.
                (_, Formula::False) => Formula::False,
                // Left never holds: right must hold immediately.
                (Formula::False, r) => r,
                (l, r) => l.eu(r),
            },
            Formula::ForAllUntil(l, r) => match (l.simplify(), r.simplify()) {
                (_, Formula::False) => Formula::False,
                (Formula::False, r) => r,
                (l, r) => l.au(r),
            },
        }
    }
}

impl fmt::Display for Formula {
    /// Render with every binary operator fully parenthesized and unary
    /// operators space-prefixed, so parsing the rendering reconstructs an
    /// equal tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::True => write!(f, "true"),
            Formula::False => write!(f, "false"),
            Formula::Atom(name) => write!(f, "{}", name),
            Formula::Not(x) => write!(f, "! {}", x),
            Formula::And(l, r) => write!(f, "({} && {})", l, r),
            Formula::Or(l, r) => write!(f, "({} || {})", l, r),
            Formula::Implies(l, r) => write!(f, "({} -> {})", l, r),
            Formula::Iff(l, r) => write!(f, "({} <-> {})", l, r),
            Formula::ExistsNext(x) => write!(f, "EX {}", x),
            Formula::ForAllNext(x) => write!(f, "AX {}", x),
            Formula::ExistsAlways(x) => write!(f, "EG {}", x),
            Formula::ForAllAlways(x) => write!(f, "AG {}", x),
            Formula::ExistsEventually(x) => write!(f, "EF {}", x),
            Formula::ForAllEventually(x) => write!(f, "AF {}", x),
            Formula::ExistsUntil(l, r) => write!(f, "({} EU {})", l, r),
            Formula::ForAllUntil(l, r) => write!(f, "({} AU {})", l, r),
        }
    }
}
