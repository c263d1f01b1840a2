//! End-to-end runs of agents in the reference world

use rand::rngs::StdRng;
use rand::SeedableRng;

use smartcab_core::{TrialOutcome, TrialRecord};
use smartcab_rl::{
    CsvTrialRecorder, InMemoryRecorder, LearningAgent, LearningParams, TrialController,
    WaypointFollower,
};
use smartcab_sim::{GridPlanner, GridWorld, Simulator, WorldConfig};

fn learning_run(trials: u32, seed: u64) -> (Vec<TrialRecord>, LearningAgent) {
    let world = GridWorld::new(WorldConfig::default(), seed).unwrap();
    let mut simulator = Simulator::new(world, GridPlanner::new());
    let mut agent = LearningAgent::new(LearningParams::default(), &mut StdRng::seed_from_u64(seed));
    let mut controller = TrialController::new(trials, InMemoryRecorder::new());

    simulator.run(&mut agent, &mut controller).unwrap();
    (controller.records().to_vec(), agent)
}

#[test]
fn test_run_produces_one_record_per_trial() {
    let (records, _) = learning_run(25, 1);

    assert_eq!(records.len(), 25);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.trial, i as u32 + 1);
        assert!(matches!(
            record.outcome,
            TrialOutcome::Success | TrialOutcome::Fail | TrialOutcome::Abort
        ));
        assert!(record.steps > 0);
    }
}

#[test]
fn test_recorder_flushed_once_at_completion() {
    let world = GridWorld::new(WorldConfig::default(), 2).unwrap();
    let mut simulator = Simulator::new(world, GridPlanner::new());
    let mut agent = LearningAgent::new(LearningParams::default(), &mut StdRng::seed_from_u64(2));
    let mut controller = TrialController::new(5, InMemoryRecorder::new());

    simulator.run(&mut agent, &mut controller).unwrap();

    // Planner is left routed to the last trial's destination
    assert_eq!(
        simulator.planner().destination(),
        Some(simulator.env().destination())
    );

    let recorder = controller.into_recorder();
    assert!(recorder.is_flushed());
    assert_eq!(recorder.records().len(), 5);
}

#[test]
fn test_q_values_stay_finite_over_long_run() {
    let (_, agent) = learning_run(300, 3);
    assert!(agent.q_table().is_finite());
}

#[test]
fn test_same_seed_same_run() {
    let (first, agent_a) = learning_run(15, 42);
    let (second, agent_b) = learning_run(15, 42);

    assert_eq!(first, second);
    assert_eq!(agent_a.q_table(), agent_b.q_table());
}

#[test]
fn test_unenforced_deadline_never_fails() {
    let config = WorldConfig {
        enforce_deadline: false,
        ..WorldConfig::default()
    };
    let world = GridWorld::new(config, 4).unwrap();
    let mut simulator = Simulator::new(world, GridPlanner::new());
    let mut agent = LearningAgent::new(LearningParams::default(), &mut StdRng::seed_from_u64(4));
    let mut controller = TrialController::new(10, InMemoryRecorder::new());

    simulator.run(&mut agent, &mut controller).unwrap();

    assert!(controller
        .records()
        .iter()
        .all(|r| r.outcome != TrialOutcome::Fail));
}

#[test]
fn test_waypoint_follower_reaches_destinations() {
    let world = GridWorld::new(WorldConfig::default(), 5).unwrap();
    let mut simulator = Simulator::new(world, GridPlanner::new());
    let mut agent = WaypointFollower::new();
    let mut controller = TrialController::new(50, InMemoryRecorder::new());

    let summary = simulator.run(&mut agent, &mut controller).unwrap();

    assert_eq!(summary.trials, 50);
    assert_eq!(summary.agent, "waypoint");
    assert!(summary.successes > 0);
}

#[test]
fn test_zero_trials_rejected() {
    let world = GridWorld::new(WorldConfig::default(), 6).unwrap();
    let mut simulator = Simulator::new(world, GridPlanner::new());
    let mut agent = WaypointFollower::new();
    let mut controller = TrialController::new(0, InMemoryRecorder::new());

    assert!(simulator.run(&mut agent, &mut controller).is_err());
}

#[test]
fn test_csv_trial_log_written_at_end() {
    let dir = tempfile::tempdir().unwrap();
    let params = LearningParams {
        alpha: 0.3,
        gamma: 0.1,
    };
    let world = GridWorld::new(WorldConfig::default(), 7).unwrap();
    let mut simulator = Simulator::new(world, GridPlanner::new());
    let mut agent = LearningAgent::new(params, &mut StdRng::seed_from_u64(7));
    let mut controller =
        TrialController::new(8, CsvTrialRecorder::for_params(dir.path(), params));

    simulator.run(&mut agent, &mut controller).unwrap();

    let path = dir.path().join("trials_alpha0.3_gamma0.1.csv");
    let contents = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "Trial,Status,Deadline,Steps");
    assert_eq!(lines.len(), 9);
    assert!(lines[8].starts_with("8,"));
}
