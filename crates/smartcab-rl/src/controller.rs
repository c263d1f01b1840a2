//! Trial controller - episode boundaries and run bookkeeping

use tracing::{debug, info};

use smartcab_core::{
    Environment, Location, Result, RoutePlanner, SmartcabError, TrialOutcome, TrialRecord,
    TrialRecorder,
};

/// Upper bound on records reserved up front; longer runs grow as they go
const RESERVED_RECORDS: u32 = 1024;

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// No trial started yet
    Idle,
    /// Trial `trial` has been started; `active` is false between its end and
    /// the start of the next one
    Running { trial: u32, active: bool },
    /// Configured number of trials done and records flushed
    Completed,
}

/// Drives `Idle -> Running(1) -> ... -> Running(N) -> Completed`
pub struct TrialController<R: TrialRecorder> {
    recorder: R,
    total_trials: u32,
    phase: RunPhase,
    steps: u32,
    start_deadline: i32,
    records: Vec<TrialRecord>,
}

impl<R: TrialRecorder> TrialController<R> {
    pub fn new(total_trials: u32, recorder: R) -> Self {
        Self {
            recorder,
            total_trials,
            phase: RunPhase::Idle,
            steps: 0,
            start_deadline: 0,
            records: Vec::with_capacity(total_trials.min(RESERVED_RECORDS) as usize),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == RunPhase::Completed
    }

    pub fn total_trials(&self) -> u32 {
        self.total_trials
    }

    /// Index of the latest started trial, 0 before the first
    pub fn current_trial(&self) -> u32 {
        match self.phase {
            RunPhase::Idle => 0,
            RunPhase::Running { trial, .. } => trial,
            RunPhase::Completed => self.total_trials,
        }
    }

    /// Steps taken in the current trial
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Deadline read from the environment when the current trial began
    pub fn start_deadline(&self) -> i32 {
        self.start_deadline
    }

    /// Completed trials so far, in trial order
    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn into_recorder(self) -> R {
        self.recorder
    }

    /// Start the next trial toward `destination`
    pub fn begin_trial(
        &mut self,
        env: &dyn Environment,
        planner: &mut dyn RoutePlanner,
        destination: Location,
    ) -> Result<u32> {
        let trial = match self.phase {
            RunPhase::Idle => 1,
            RunPhase::Running {
                trial,
                active: false,
            } => trial + 1,
            RunPhase::Running { trial, active: true } => {
                return Err(SmartcabError::Controller(format!(
                    "trial {trial} has not ended"
                )))
            }
            RunPhase::Completed => {
                return Err(SmartcabError::Controller(
                    "run already completed".to_string(),
                ))
            }
        };

        planner.route_to(destination);
        self.start_deadline = env.deadline();
        self.steps = 0;
        self.phase = RunPhase::Running {
            trial,
            active: true,
        };

        info!(
            trial,
            deadline = self.start_deadline,
            %destination,
            "Starting trial {}/{}",
            trial,
            self.total_trials
        );
        Ok(trial)
    }

    /// Count one tick of the current trial
    pub fn tick(&mut self) {
        if let RunPhase::Running { active: true, .. } = self.phase {
            self.steps += 1;
        } else {
            debug!(phase = ?self.phase, "Tick outside of a trial ignored");
        }
    }

    /// Close the current trial, flushing the recorder after the last one
    pub fn end_trial(&mut self, outcome: TrialOutcome, deadline: i32) -> Result<TrialRecord> {
        let RunPhase::Running {
            trial,
            active: true,
        } = self.phase
        else {
            return Err(SmartcabError::Controller(
                "no trial in progress".to_string(),
            ));
        };

        let record = TrialRecord::new(trial, outcome, deadline, self.steps);
        self.recorder.append(record)?;
        self.records.push(record);

        if trial >= self.total_trials {
            self.recorder.flush()?;
            self.phase = RunPhase::Completed;
            info!(trials = trial, "Run completed");
        } else {
            self.phase = RunPhase::Running {
                trial,
                active: false,
            };
        }

        Ok(record)
    }
}
