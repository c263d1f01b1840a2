//! Driving agents

use rand::Rng;
use tracing::{debug, info};

use smartcab_core::{Action, Environment, RoutePlanner, StateKey, TrialOutcome, TrialRecord};

use crate::encoder::StateEncoder;
use crate::learner::{Learner, LearningParams, Transition};
use crate::policy::{GreedyPolicy, Policy};
use crate::q_table::QTable;

/// Capability shared by every agent the simulator can drive
pub trait DrivingAgent {
    /// Agent name
    fn name(&self) -> &str;

    /// Prepare for a new trial
    fn reset(&mut self, trial: u32);

    /// Run one tick: sense, choose, act, re-sense, and learn
    fn update(&mut self, env: &mut dyn Environment, planner: &dyn RoutePlanner) -> Transition;

    /// Hear how the trial ended
    fn report_outcome(&mut self, record: &TrialRecord);
}

/// Greedy tabular Q-learning agent
#[derive(Debug, Clone)]
pub struct LearningAgent {
    q_table: QTable,
    learner: Learner,
    policy: GreedyPolicy,
    trial: u32,
    total_reward: f64,
}

impl LearningAgent {
    /// Create an agent whose table priors are drawn from `rng`
    pub fn new<R: Rng + ?Sized>(params: LearningParams, rng: &mut R) -> Self {
        Self::with_table(params, QTable::random(rng))
    }

    /// Create an agent around an existing table
    pub fn with_table(params: LearningParams, q_table: QTable) -> Self {
        Self {
            q_table,
            learner: Learner::new(params),
            policy: GreedyPolicy,
            trial: 0,
            total_reward: 0.0,
        }
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn params(&self) -> LearningParams {
        self.learner.params()
    }

    pub fn trial(&self) -> u32 {
        self.trial
    }

    /// Reward collected in the current trial
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Action the agent would take in `state` right now
    pub fn choose(&self, state: StateKey) -> Action {
        self.policy.select(self.q_table.values(state))
    }
}

impl DrivingAgent for LearningAgent {
    fn name(&self) -> &str {
        "learning"
    }

    fn reset(&mut self, trial: u32) {
        self.trial = trial;
        self.total_reward = 0.0;
    }

    fn update(&mut self, env: &mut dyn Environment, planner: &dyn RoutePlanner) -> Transition {
        let waypoint = planner.next_waypoint(env.pose());
        let percept = env.sense();
        let deadline = env.deadline();

        let state = StateEncoder::encode(waypoint, &percept);
        let action = self.choose(state);
        let reward = env.act(action);
        self.total_reward += reward;

        // The successor state comes from a fresh percept taken after acting
        let next_state = StateEncoder::encode(planner.next_waypoint(env.pose()), &env.sense());

        let transition = Transition {
            state,
            action,
            reward,
            next_state,
        };
        let updated = self.learner.update(&mut self.q_table, &transition);

        debug!(
            trial = self.trial,
            deadline,
            %state,
            %action,
            reward,
            q = updated,
            "LearningAgent.update()"
        );

        transition
    }

    fn report_outcome(&mut self, record: &TrialRecord) {
        report(self.name(), record, self.total_reward);
    }
}

/// Fixed baseline that follows the waypoint whenever the rules allow it
#[derive(Debug, Clone, Default)]
pub struct WaypointFollower {
    trial: u32,
    total_reward: f64,
}

impl WaypointFollower {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrivingAgent for WaypointFollower {
    fn name(&self) -> &str {
        "waypoint"
    }

    fn reset(&mut self, trial: u32) {
        self.trial = trial;
        self.total_reward = 0.0;
    }

    fn update(&mut self, env: &mut dyn Environment, planner: &dyn RoutePlanner) -> Transition {
        let waypoint = planner.next_waypoint(env.pose());
        let percept = env.sense();
        let state = StateEncoder::encode(waypoint, &percept);

        let action = if percept.permits(waypoint.into()) {
            Action::from(waypoint)
        } else {
            Action::None
        };
        let reward = env.act(action);
        self.total_reward += reward;

        let next_state = StateEncoder::encode(planner.next_waypoint(env.pose()), &env.sense());
        debug!(trial = self.trial, %state, %action, reward, "WaypointFollower.update()");

        Transition {
            state,
            action,
            reward,
            next_state,
        }
    }

    fn report_outcome(&mut self, record: &TrialRecord) {
        report(self.name(), record, self.total_reward);
    }
}

fn report(agent: &str, record: &TrialRecord, total_reward: f64) {
    match record.outcome {
        TrialOutcome::Success => info!(
            agent,
            trial = record.trial,
            deadline = record.deadline,
            steps = record.steps,
            total_reward,
            "Trial {} Success!",
            record.trial
        ),
        TrialOutcome::Fail => info!(
            agent,
            trial = record.trial,
            steps = record.steps,
            total_reward,
            "Trial {} Fail",
            record.trial
        ),
        TrialOutcome::Abort => info!(
            agent,
            trial = record.trial,
            steps = record.steps,
            total_reward,
            "Trial {} Abort",
            record.trial
        ),
    }
}
