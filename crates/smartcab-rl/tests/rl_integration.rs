//! Integration tests for the learning agent
//!
//! These tests drive the agent against small scripted environments and
//! check the learning loop end to end.

#![allow(clippy::float_cmp)]

use rand::rngs::StdRng;
use rand::SeedableRng;

use smartcab_core::{
    Action, Direction, Environment, Heading, Light, Location, Percept, Pose, Reward, RoutePlanner,
    StateKey, TrialOutcome,
};
use smartcab_rl::{
    greedy_index, DrivingAgent, InMemoryRecorder, Learner, LearningAgent, LearningParams, QTable,
    TrialController, Transition,
};

/// Straight road under a permanent green light; a trial ends after
/// `length` ticks.
struct Corridor {
    length: u32,
    ticks: u32,
}

impl Corridor {
    fn new(length: u32) -> Self {
        Self { length, ticks: 0 }
    }
}

impl Environment for Corridor {
    fn reset(&mut self) -> Location {
        self.ticks = 0;
        Location::new(1, self.length as i32)
    }

    fn step(&mut self) {
        self.ticks += 1;
    }

    fn sense(&self) -> Percept {
        Percept::clear(Light::Green)
    }

    fn deadline(&self) -> i32 {
        self.length as i32 - self.ticks as i32
    }

    fn act(&mut self, action: Action) -> Reward {
        match action {
            Action::Forward => 2.0,
            Action::None => 0.0,
            Action::Left | Action::Right => -0.5,
        }
    }

    fn pose(&self) -> Pose {
        Pose::new(Location::new(1, self.ticks as i32), Heading::South)
    }

    fn outcome(&self) -> Option<TrialOutcome> {
        (self.ticks >= self.length).then_some(TrialOutcome::Success)
    }
}

struct StraightAhead;

impl RoutePlanner for StraightAhead {
    fn route_to(&mut self, _destination: Location) {}

    fn next_waypoint(&self, _pose: Pose) -> Direction {
        Direction::Forward
    }
}

fn corridor_state() -> StateKey {
    StateKey::new(Direction::Forward, Light::Green, Action::None)
}

#[test]
fn test_agent_learns_to_follow_waypoint() {
    let mut env = Corridor::new(10);
    let planner = StraightAhead;
    let mut agent = LearningAgent::new(LearningParams::default(), &mut StdRng::seed_from_u64(9));

    for trial in 1..=30 {
        env.reset();
        agent.reset(trial);
        while env.outcome().is_none() {
            env.step();
            agent.update(&mut env, &planner);
        }
    }

    assert_eq!(agent.choose(corridor_state()), Action::Forward);
    assert!(agent.q_table().is_finite());
}

#[test]
fn test_only_visited_state_changes() {
    let mut env = Corridor::new(5);
    let planner = StraightAhead;
    let mut agent = LearningAgent::new(LearningParams::default(), &mut StdRng::seed_from_u64(21));
    let before = agent.q_table().clone();

    env.reset();
    while env.outcome().is_none() {
        env.step();
        agent.update(&mut env, &planner);
    }

    for (state, values) in agent.q_table().iter() {
        if state != corridor_state() {
            assert_eq!(values, before.values(state), "{state} changed");
        }
    }
}

#[test]
fn test_controller_and_agent_full_run() {
    let mut env = Corridor::new(4);
    let mut planner = StraightAhead;
    let mut agent = LearningAgent::new(LearningParams::default(), &mut StdRng::seed_from_u64(3));
    let mut controller = TrialController::new(6, InMemoryRecorder::new());

    while !controller.is_completed() {
        let destination = env.reset();
        let trial = controller
            .begin_trial(&env, &mut planner, destination)
            .unwrap();
        agent.reset(trial);
        while env.outcome().is_none() {
            env.step();
            agent.update(&mut env, &planner);
            controller.tick();
        }
        let outcome = env.outcome().unwrap();
        let record = controller.end_trial(outcome, env.deadline()).unwrap();
        agent.report_outcome(&record);
    }

    let records = controller.records();
    assert_eq!(records.len(), 6);
    assert!(records.windows(2).all(|w| w[0].trial < w[1].trial));
    assert!(records.iter().all(|r| r.steps == 4 && r.deadline == 0));
    assert!(controller.recorder().is_flushed());
}

#[test]
fn test_reference_update_value() {
    let learner = Learner::new(LearningParams {
        alpha: 0.5,
        gamma: 0.2,
    });
    let mut table = QTable::filled(0.0);
    let s = StateKey::new(Direction::Left, Light::Red, Action::Forward);
    let s_next = StateKey::new(Direction::Right, Light::Green, Action::Right);
    table.set(s, Action::Right, 0.4);
    table.set(s_next, Action::Left, 0.6);

    let value = learner.update(
        &mut table,
        &Transition {
            state: s,
            action: Action::Right,
            reward: 1.0,
            next_state: s_next,
        },
    );

    assert!((value - 0.76).abs() < 1e-12);
}

#[test]
fn test_tie_break_lowest_index() {
    assert_eq!(greedy_index(&[0.5, 0.5, 0.2, 0.1]), 0);

    let mut table = QTable::filled(0.5);
    let state = corridor_state();
    table.set_values(state, [0.5, 0.5, 0.2, 0.1]);

    let agent = LearningAgent::with_table(LearningParams::default(), table);
    assert_eq!(agent.choose(state), Action::None);
    assert_eq!(agent.choose(StateKey::new(Direction::Left, Light::Red, Action::None)), Action::None);
}

#[test]
fn test_bounded_rewards_keep_values_finite() {
    let learner = Learner::new(LearningParams {
        alpha: 0.9,
        gamma: 0.99,
    });
    let mut table = QTable::random(&mut StdRng::seed_from_u64(77));
    let states: Vec<StateKey> = StateKey::all().collect();

    for i in 0..100_000usize {
        let state = states[i % states.len()];
        let next_state = states[(i * 7 + 3) % states.len()];
        let action = Action::ALL[i % Action::COUNT];
        let reward = if i % 3 == 0 { 12.0 } else { -1.0 };
        learner.update(
            &mut table,
            &Transition {
                state,
                action,
                reward,
                next_state,
            },
        );
    }

    assert!(table.is_finite());
}

/// Intersection that turns red, lets oncoming traffic turn left, and moves
/// the agent one block east whenever it acts.
struct Junction {
    light: Light,
    oncoming: Action,
    location: Location,
}

impl Environment for Junction {
    fn reset(&mut self) -> Location {
        Location::new(3, 1)
    }

    fn step(&mut self) {}

    fn sense(&self) -> Percept {
        Percept {
            oncoming: self.oncoming,
            ..Percept::clear(self.light)
        }
    }

    fn deadline(&self) -> i32 {
        10
    }

    fn act(&mut self, _action: Action) -> Reward {
        self.light = Light::Red;
        self.oncoming = Action::Left;
        self.location = Location::new(self.location.x + 1, self.location.y);
        2.0
    }

    fn pose(&self) -> Pose {
        Pose::new(self.location, Heading::East)
    }

    fn outcome(&self) -> Option<TrialOutcome> {
        None
    }
}

/// Forward from the first column, right turn everywhere else
struct TurnAfterFirstBlock;

impl RoutePlanner for TurnAfterFirstBlock {
    fn route_to(&mut self, _destination: Location) {}

    fn next_waypoint(&self, pose: Pose) -> Direction {
        if pose.location.x == 1 {
            Direction::Forward
        } else {
            Direction::Right
        }
    }
}

#[test]
fn test_successor_state_sensed_after_acting() {
    let state = StateKey::new(Direction::Forward, Light::Green, Action::None);
    let after = StateKey::new(Direction::Right, Light::Red, Action::Left);

    let mut table = QTable::filled(0.0);
    table.set_values(state, [0.0, 1.0, 0.0, 0.0]);
    table.set_values(after, [0.3, 0.9, 0.1, 0.2]);

    let mut agent = LearningAgent::with_table(LearningParams::default(), table);
    let mut env = Junction {
        light: Light::Green,
        oncoming: Action::None,
        location: Location::new(1, 1),
    };

    agent.reset(1);
    let transition = agent.update(&mut env, &TurnAfterFirstBlock);

    assert_eq!(transition.state, state);
    assert_eq!(transition.action, Action::Forward);
    assert_eq!(transition.next_state, after);

    // Bootstraps from max Q(after) = 0.9, not from the pre-action state's 1.0
    let expected = 0.5 * 1.0 + 0.5 * (2.0 + 0.2 * 0.9);
    let value = agent.q_table().value(state, Action::Forward);
    assert!((value - expected).abs() < 1e-12, "got {value}");
    assert_eq!(agent.q_table().values(after), &[0.3, 0.9, 0.1, 0.2]);
}
