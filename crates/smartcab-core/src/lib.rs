//! Smartcab Core - Driving domain types and collaborator traits
//!
//! This crate provides the vocabulary shared by the learning agent, the
//! reference simulation, and the command line runner.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod environment;
pub mod error;
pub mod state;
pub mod trial;
pub mod types;

pub use environment::{Environment, RoutePlanner, TrialRecorder};
pub use error::{Result, SmartcabError};
pub use state::StateKey;
pub use trial::{RunId, RunSummary, TrialOutcome, TrialRecord};
pub use types::*;
