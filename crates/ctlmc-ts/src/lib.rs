//! Labelled partial transition systems and their input artifacts.

pub mod artifacts;
pub mod system;

pub use artifacts::{
    build_system, load_system, ExplorationDefault, LabelEntry, LabelListing, LoadError,
    TransitionEntry, TransitionListing,
};
pub use system::{
    StateId, SystemBuilder, SystemError, SystemResult, TransitionSystem, INITIAL_STATE,
};
