//! Trial records and run summaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a training run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a trial ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialOutcome {
    /// Destination reached
    Success,
    /// Deadline ran out while enforced
    Fail,
    /// Hard time limit hit
    Abort,
}

impl std::fmt::Display for TrialOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrialOutcome::Success => write!(f, "success"),
            TrialOutcome::Fail => write!(f, "fail"),
            TrialOutcome::Abort => write!(f, "abort"),
        }
    }
}

/// One row of the trial log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    #[serde(rename = "Trial")]
    pub trial: u32,
    #[serde(rename = "Status")]
    pub outcome: TrialOutcome,
    #[serde(rename = "Deadline")]
    pub deadline: i32,
    #[serde(rename = "Steps")]
    pub steps: u32,
}

impl TrialRecord {
    pub fn new(trial: u32, outcome: TrialOutcome, deadline: i32, steps: u32) -> Self {
        Self {
            trial,
            outcome,
            deadline,
            steps,
        }
    }
}

/// Aggregate statistics over a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub agent: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub trials: usize,
    pub successes: usize,
    pub failures: usize,
    pub aborts: usize,
    pub success_rate: f64,
    pub mean_steps: f64,
    pub last_ten_success_rate: f64,
}

impl RunSummary {
    /// Summarize trial records of a run that started at `started_at`
    pub fn from_records(
        agent: impl Into<String>,
        started_at: DateTime<Utc>,
        records: &[TrialRecord],
    ) -> Self {
        let count = |outcome: TrialOutcome| records.iter().filter(|r| r.outcome == outcome).count();
        let successes = count(TrialOutcome::Success);

        let tail = &records[records.len().saturating_sub(10)..];
        let tail_successes = tail
            .iter()
            .filter(|r| r.outcome == TrialOutcome::Success)
            .count();

        Self {
            run_id: RunId::new(),
            agent: agent.into(),
            started_at,
            finished_at: Utc::now(),
            trials: records.len(),
            successes,
            failures: count(TrialOutcome::Fail),
            aborts: count(TrialOutcome::Abort),
            success_rate: ratio(successes, records.len()),
            mean_steps: if records.is_empty() {
                0.0
            } else {
                records.iter().map(|r| f64::from(r.steps)).sum::<f64>() / records.len() as f64
            },
            last_ten_success_rate: ratio(tail_successes, tail.len()),
        }
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
