//! Property: unparenthesized formulas group per the precedence table
//! regardless of which atom names fill the holes. Unary prefixes bind
//! tightest, then `AU`, `EU`, `&&`, `||`, `->`, `<->`; untils associate to
//! the right and the propositional connectives to the left.

use ctlmc_syntax::{parse, Formula};
use proptest::prelude::*;

/// Lowercase names of 1..=3 letters can never collide with the keywords
/// (`true`, `false`) or the uppercase temporal operators.
const NAME: &str = "[a-z]{1,3}";

fn at(name: &str) -> Formula {
    Formula::atom(name)
}

fn p(source: &str) -> Formula {
    parse(source).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn and_binds_tighter_than_or(a in NAME, b in NAME, c in NAME) {
        prop_assert_eq!(p(&format!("{a} && {b} || {c}")), at(&a).and(at(&b)).or(at(&c)));
        prop_assert_eq!(p(&format!("{a} || {b} && {c}")), at(&a).or(at(&b).and(at(&c))));
    }

    #[test]
    fn or_binds_tighter_than_implies(a in NAME, b in NAME, c in NAME) {
        prop_assert_eq!(p(&format!("{a} || {b} -> {c}")), at(&a).or(at(&b)).implies(at(&c)));
        prop_assert_eq!(p(&format!("{a} -> {b} || {c}")), at(&a).implies(at(&b).or(at(&c))));
    }

    #[test]
    fn implies_binds_tighter_than_iff(a in NAME, b in NAME, c in NAME) {
        prop_assert_eq!(p(&format!("{a} <-> {b} -> {c}")), at(&a).iff(at(&b).implies(at(&c))));
        prop_assert_eq!(p(&format!("{a} -> {b} <-> {c}")), at(&a).implies(at(&b)).iff(at(&c)));
    }

    #[test]
    fn connectives_chain_left(a in NAME, b in NAME, c in NAME) {
        prop_assert_eq!(p(&format!("{a} && {b} && {c}")), at(&a).and(at(&b)).and(at(&c)));
        prop_assert_eq!(p(&format!("{a} -> {b} -> {c}")), at(&a).implies(at(&b)).implies(at(&c)));
        prop_assert_eq!(p(&format!("{a} <-> {b} <-> {c}")), at(&a).iff(at(&b)).iff(at(&c)));
    }

    #[test]
    fn until_binds_tighter_than_and(a in NAME, b in NAME, c in NAME) {
        prop_assert_eq!(p(&format!("{a} EU {b} && {c}")), at(&a).eu(at(&b)).and(at(&c)));
        prop_assert_eq!(p(&format!("{a} && {b} EU {c}")), at(&a).and(at(&b).eu(at(&c))));
        prop_assert_eq!(p(&format!("{a} AU {b} || {c}")), at(&a).au(at(&b)).or(at(&c)));
    }

    #[test]
    fn forall_until_binds_tighter_than_exists_until(a in NAME, b in NAME, c in NAME) {
        prop_assert_eq!(p(&format!("{a} EU {b} AU {c}")), at(&a).eu(at(&b).au(at(&c))));
        prop_assert_eq!(p(&format!("{a} AU {b} EU {c}")), at(&a).au(at(&b)).eu(at(&c)));
    }

    #[test]
    fn untils_chain_right(a in NAME, b in NAME, c in NAME) {
        prop_assert_eq!(p(&format!("{a} EU {b} EU {c}")), at(&a).eu(at(&b).eu(at(&c))));
        prop_assert_eq!(p(&format!("{a} AU {b} AU {c}")), at(&a).au(at(&b).au(at(&c))));
    }

    #[test]
    fn unary_prefixes_bind_tightest(a in NAME, b in NAME) {
        prop_assert_eq!(p(&format!("! {a} && {b}")), at(&a).not().and(at(&b)));
        prop_assert_eq!(p(&format!("EX {a} && {b}")), at(&a).ex().and(at(&b)));
        prop_assert_eq!(p(&format!("AG {a} -> {b}")), at(&a).ag().implies(at(&b)));
        prop_assert_eq!(p(&format!("{a} EU EF {b}")), at(&a).eu(at(&b).ef()));
    }

    #[test]
    fn unary_prefixes_stack(a in NAME) {
        prop_assert_eq!(p(&format!("EX EG {a}")), at(&a).eg().ex());
        prop_assert_eq!(p(&format!("! EX {a}")), at(&a).ex().not());
        prop_assert_eq!(p(&format!("AF ! {a}")), at(&a).not().af());
    }

    #[test]
    fn parentheses_override_precedence(a in NAME, b in NAME, c in NAME) {
        prop_assert_eq!(p(&format!("{a} && ({b} || {c})")), at(&a).and(at(&b).or(at(&c))));
        prop_assert_eq!(p(&format!("({a} EU {b}) AU {c}")), at(&a).eu(at(&b)).au(at(&c)));
    }
}
