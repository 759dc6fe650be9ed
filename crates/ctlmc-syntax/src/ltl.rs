//! LTL formula AST, a sibling data type to [`crate::Formula`].
//!
//! Linear-time properties share the propositional layer with CTL but use
//! unquantified temporal operators. This type exists for tooling that
//! wants to carry LTL formulas around; it has no parser and no shared
//! evaluation engine with the CTL checker.

use std::collections::BTreeSet;
use std::fmt;

/// An LTL formula.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LtlFormula {
    /// `true`
    True,
    /// `false`
    False,
    /// Atomic proposition.
    Atom(String),
    /// `! f`
    Not(Box<LtlFormula>),
    /// `f && g`
    And(Box<LtlFormula>, Box<LtlFormula>),
    /// `f || g`
    Or(Box<LtlFormula>, Box<LtlFormula>),
    /// `f -> g`
    Implies(Box<LtlFormula>, Box<LtlFormula>),
    /// `f <-> g`
    Iff(Box<LtlFormula>, Box<LtlFormula>),
    /// `X f`
    Next(Box<LtlFormula>),
    /// `G f`
    Always(Box<LtlFormula>),
    /// `F f`
    Eventually(Box<LtlFormula>),
    /// `f U g`
    Until(Box<LtlFormula>, Box<LtlFormula>),
    /// `f R g`
    Release(Box<LtlFormula>, Box<LtlFormula>),
}

impl LtlFormula {
    /// Atomic proposition.
    pub fn atom(name: impl Into<String>) -> Self {
        LtlFormula::Atom(name.into())
    }

    /// Collect the distinct atomic propositions, in deterministic order.
    pub fn atoms(&self) -> BTreeSet<&str> {
        let mut acc = BTreeSet::new();
        self.collect_atoms(&mut acc);
        acc
    }

    fn collect_atoms<'a>(&'a self, acc: &mut BTreeSet<&'a str>) {
        match self {
            LtlFormula::True | LtlFormula::False => {}
            LtlFormula::Atom(name) => {
                acc.insert(name.as_str());
            }
            LtlFormula::Not(f)
            | LtlFormula::Next(f)
            | LtlFormula::Always(f)
            | LtlFormula::Eventually(f) => f.collect_atoms(acc),
            LtlFormula::And(l, r)
            | LtlFormula::Or(l, r)
            | LtlFormula::Implies(l, r)
            | LtlFormula::Iff(l, r)
            | LtlFormula::Until(l, r)
            | LtlFormula::Release(l, r) => {
                l.collect_atoms(acc);
                r.collect_atoms(acc);
            }
        }
    }

    /// Simplify bottom-up with the same constant identities the CTL
    /// simplifier applies: propositional folds, `G`/`F` constant collapse,
    /// no collapse for `X`, one-sided rules for `U`/`R`.
    pub fn simplify(&self) -> LtlFormula {
        use LtlFormula::*;
        match self {
            True | False | Atom(_) => self.clone(),
            Not(f) => match f.simplify() {
                True => False,
                False => True,
                f => Not(Box::new(f)),
            },
            And(l, r) => match (l.simplify(), r.simplify()) {
                (False, _) | (_, False) => False,
                (True, r) => r,
                (l, True) => l,
                (l, r) => And(Box::new(l), Box::new(r)),
            },
            Or(l, r) => match (l.simplify(), r.simplify()) {
                (True, _) | (_, True) => True,
                (False, r) => r,
                (l, False) => l,
                (l, r) => Or(Box::new(l), Box::new(r)),
            },
            Implies(l, r) => match (l.simplify(), r.simplify()) {
                (False, _) | (_, True) => True,
                (True, r) => r,
                (l, False) => Not(Box::new(l)).simplify(),
                (l, r) => Implies(Box::new(l), Box::new(r)),
            },
            Iff(l, r) => match (l.simplify(), r.simplify()) {
                (True, r) => r,
                (l, True) => l,
                (False, r) => Not(Box::new(r)).simplify(),
                (l, False) => Not(Box::new(l)).simplify(),
                (l, r) => Iff(Box::new(l), Box::new(r)),
            },
            Next(f) => Next(Box::new(f.simplify())),
            Always(f) => match f.simplify() {
                True => True,
                False => False,
                f => Always(Box::new(f)),
            },
            Eventually(f) => match f.simplify() {
                True => True,
                False => False,
                f => Eventually(Box::new(f)),
            },
            Until(l, r) => match (l.simplify(), r.simplify()) {
                (_, False) => False,
                (False, r) => r,
                (l, r) => Until(Box::new(l), Box::new(r)),
            },
            Release(l, r) => match (l.simplify(), r.simplify()) {
                (_, True) => True,
                (True, r) => r,
                (l, r) => Release(Box::new(l), Box::new(r)),
            },
        }
    }
}

impl fmt::Display for LtlFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LtlFormula::True => write!(f, "true"),
            LtlFormula::False => write!(f, "false"),
            LtlFormula::Atom(name) => write!(f, "{}", name),
            LtlFormula::Not(x) => write!(f, "! {}", x),
            LtlFormula::And(l, r) => write!(f, "({} && {})", l, r),
            LtlFormula::Or(l, r) => write!(f, "({} || {})", l, r),
            LtlFormula::Implies(l, r) => write!(f, "({} -> {})", l, r),
            LtlFormula::Iff(l, r) => write!(f, "({} <-> {})", l, r),
            LtlFormula::Next(x) => write!(f, "X {}", x),
            LtlFormula::Always(x) => write!(f, "G {}", x),
            LtlFormula::Eventually(x) => write!(f, "F {}", x),
            LtlFormula::Until(l, r) => write!(f, "({} U {})", l, r),
            LtlFormula::Release(l, r) => write!(f, "({} R {})", l, r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> LtlFormula {
        LtlFormula::atom("p")
    }

    #[test]
    fn test_display() {
        let f = LtlFormula::Until(
            Box::new(p()),
            Box::new(LtlFormula::Always(Box::new(LtlFormula::atom("q")))),
        );
        assert_eq!(f.to_string(), "(p U G q)");
    }

    #[test]
    fn test_simplify_temporal_collapse() {
        let g_true = LtlFormula::Always(Box::new(LtlFormula::True));
        assert_eq!(g_true.simplify(), LtlFormula::True);
        let x_true = LtlFormula::Next(Box::new(LtlFormula::True));
        assert_eq!(x_true.simplify(), x_true);
    }

    #[test]
    fn test_simplify_until_release() {
        let u = LtlFormula::Until(Box::new(p()), Box::new(LtlFormula::False));
        assert_eq!(u.simplify(), LtlFormula::False);
        let r_true = LtlFormula::Release(Box::new(p()), Box::new(LtlFormula::True));
        assert_eq!(r_true.simplify(), LtlFormula::True);
        let r = LtlFormula::Release(Box::new(LtlFormula::True), Box::new(p()));
        assert_eq!(r.simplify(), p());
        // Only the duals of the until rules apply: a constantly false
        // right side does not collapse a release.
        let r_false = LtlFormula::Release(Box::new(p()), Box::new(LtlFormula::False));
        assert_eq!(r_false.simplify(), r_false);
    }

    #[test]
    fn test_atoms() {
        let f = LtlFormula::Until(Box::new(LtlFormula::atom("b")), Box::new(p()));
        let names: Vec<&str> = f.atoms().into_iter().collect();
        assert_eq!(names, vec!["b", "p"]);
    }
}
