//! Tick loop that runs trials for a driving agent

use chrono::Utc;
use tracing::info;

use smartcab_core::{Environment, Result, RoutePlanner, RunSummary, SmartcabError, TrialRecorder};
use smartcab_rl::{DrivingAgent, TrialController};

/// Runs trials of an environment/planner pair
pub struct Simulator<E, P> {
    env: E,
    planner: P,
}

impl<E: Environment, P: RoutePlanner> Simulator<E, P> {
    pub fn new(env: E, planner: P) -> Self {
        Self { env, planner }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// Run trials until the controller reports the run completed
    ///
    /// Each tick advances the world, lets the agent sense/act/learn, and
    /// counts the step. A trial ends as soon as the environment reports an
    /// outcome.
    pub fn run<A, R>(&mut self, agent: &mut A, controller: &mut TrialController<R>) -> Result<RunSummary>
    where
        A: DrivingAgent + ?Sized,
        R: TrialRecorder,
    {
        if controller.total_trials() == 0 {
            return Err(SmartcabError::Config(
                "number of trials must be positive".to_string(),
            ));
        }

        let started_at = Utc::now();
        info!(
            agent = agent.name(),
            trials = controller.total_trials(),
            "Simulator.run(): starting"
        );

        while !controller.is_completed() {
            let destination = self.env.reset();
            let trial = controller.begin_trial(&self.env, &mut self.planner, destination)?;
            agent.reset(trial);

            let outcome = loop {
                self.env.step();
                agent.update(&mut self.env, &self.planner);
                controller.tick();
                if let Some(outcome) = self.env.outcome() {
                    break outcome;
                }
            };

            let record = controller.end_trial(outcome, self.env.deadline())?;
            agent.report_outcome(&record);
        }

        let summary = RunSummary::from_records(agent.name(), started_at, controller.records());
        info!(
            run_id = %summary.run_id,
            agent = %summary.agent,
            successes = summary.successes,
            failures = summary.failures,
            aborts = summary.aborts,
            success_rate = summary.success_rate,
            last_ten_success_rate = summary.last_ten_success_rate,
            mean_steps = summary.mean_steps,
            "Simulator.run(): finished"
        );
        Ok(summary)
    }
}
