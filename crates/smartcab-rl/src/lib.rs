//! Smartcab RL - Tabular reinforcement learning for the driving agent
//!
//! This crate provides the state encoder, the Q-table, the greedy policy,
//! the one-step value update, and the trial bookkeeping that ties a run
//! together.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]

pub mod agent;
pub mod controller;
pub mod encoder;
pub mod learner;
pub mod policy;
pub mod q_table;
pub mod recorder;

pub use agent::{DrivingAgent, LearningAgent, WaypointFollower};
pub use controller::{RunPhase, TrialController};
pub use encoder::StateEncoder;
pub use learner::{Learner, LearningParams, Transition};
pub use policy::{greedy_index, GreedyPolicy, Policy};
pub use q_table::{ActionValues, QEntry, QTable};
pub use recorder::{CsvTrialRecorder, InMemoryRecorder};
