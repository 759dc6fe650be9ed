//! Three-valued CTL model checking over partial transition systems.

pub mod analysis;
pub mod checker;
pub mod sets;

pub use analysis::{check, Analysis, Verdict};
pub use checker::{Model, StateSets};
pub use sets::{greatest_fixpoint, least_fixpoint, StateSet};
