//! Smartcab Sim - Reference traffic world for the driving agent
//!
//! A small grid of signalled intersections with a few dummy vehicles,
//! a route planner, and the tick loop that runs trials against any
//! [`smartcab_rl::DrivingAgent`].

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]

pub mod planner;
pub mod simulator;
pub mod world;

pub use planner::{plan_waypoint, GridPlanner};
pub use simulator::Simulator;
pub use world::{GridWorld, WorldConfig};
