//! Collaborator traits consumed by the driving agent
//!
//! The agent never sees the simulation directly; it senses, reads the
//! deadline, and acts through [`Environment`], and asks a [`RoutePlanner`]
//! for the next waypoint.

use crate::error::Result;
use crate::trial::{TrialOutcome, TrialRecord};
use crate::types::{Action, Direction, Location, Percept, Pose, Reward};

/// World the primary agent drives in
pub trait Environment {
    /// Start a new trial and return the destination for the primary agent
    fn reset(&mut self) -> Location;

    /// Advance the world by one tick before the primary agent acts
    fn step(&mut self);

    /// Sense the intersection the primary agent is at
    fn sense(&self) -> Percept;

    /// Ticks remaining before the deadline; negative once overdue
    fn deadline(&self) -> i32;

    /// Execute an action for the primary agent and return its reward
    fn act(&mut self, action: Action) -> Reward;

    /// Current pose of the primary agent
    fn pose(&self) -> Pose;

    /// Set once the current trial has ended
    fn outcome(&self) -> Option<TrialOutcome>;
}

/// Suggests which way to go next
pub trait RoutePlanner {
    /// Re-bind the planner to a new destination
    fn route_to(&mut self, destination: Location);

    /// Next waypoint direction from the given pose
    fn next_waypoint(&self, pose: Pose) -> Direction;
}

/// Sink for completed trial records
pub trait TrialRecorder {
    /// Add one completed trial
    fn append(&mut self, record: TrialRecord) -> Result<()>;

    /// Persist everything appended so far; called once per run
    fn flush(&mut self) -> Result<()>;
}
