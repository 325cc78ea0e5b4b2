//! Reconcile regenerated test scenarios with a hand-edited collection.
//!
//! The [`merge`] engine is a pure in-memory transformation over
//! [`ScenarioCollection`]s. The remaining modules wrap it in a small
//! command-line host: file storage, reporting and layered configuration.

pub mod banners;
pub mod bool_predicates;
pub mod cli_args;
pub mod commands;
pub mod config;
pub mod customization;
pub mod diff;
pub mod environment;
pub mod error;
pub mod merge;
pub mod printer;
pub mod scenario;
pub mod store;
pub mod summary;
pub mod test_utils;

pub use cli_args::{GlobalArgs, LockArgs, MergeArgs, MergeSettings, ShowArgs};
pub use customization::CustomizationDetector;
pub use merge::{
    Conflict, ConflictResolver, MergeMode, MergeOutcome, MergeReport, MergeWarning,
    PromptResolver, RecordOutcome, Resolution, merge, merge_with, resolver_fn, union_records,
};
pub use scenario::{ScenarioCollection, ScenarioDocument, ScenarioRecord};
