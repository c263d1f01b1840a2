//! Trial recorders
//!
//! Records are buffered until the run completes and are then written in a
//! single flush. Nothing reaches disk before that, so a run cut short
//! leaves no trial log behind.

use std::path::{Path, PathBuf};

use tracing::info;

use smartcab_core::{Result, SmartcabError, TrialRecord, TrialRecorder};

use crate::learner::LearningParams;

/// Recorder that keeps everything in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecorder {
    records: Vec<TrialRecord>,
    flushed: bool,
}

impl InMemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }
}

impl TrialRecorder for InMemoryRecorder {
    fn append(&mut self, record: TrialRecord) -> Result<()> {
        if self.flushed {
            return Err(SmartcabError::AlreadyFlushed);
        }
        self.records.push(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.flushed {
            return Err(SmartcabError::AlreadyFlushed);
        }
        self.flushed = true;
        Ok(())
    }
}

/// Recorder that writes a `Trial,Status,Deadline,Steps` CSV on flush
#[derive(Debug, Clone)]
pub struct CsvTrialRecorder {
    path: PathBuf,
    inner: InMemoryRecorder,
}

impl CsvTrialRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: InMemoryRecorder::new(),
        }
    }

    /// Recorder writing into `dir` under a name that carries α and γ
    pub fn for_params(dir: impl AsRef<Path>, params: LearningParams) -> Self {
        Self::new(dir.as_ref().join(trial_log_file_name(params)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[TrialRecord] {
        self.inner.records()
    }
}

impl TrialRecorder for CsvTrialRecorder {
    fn append(&mut self, record: TrialRecord) -> Result<()> {
        self.inner.append(record)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        for record in self.inner.records() {
            writer.serialize(record)?;
        }
        writer.flush()?;

        info!(
            "Wrote {} trial records to {}",
            self.inner.records().len(),
            self.path.display()
        );
        Ok(())
    }
}

/// File name for a trial log, e.g. `trials_alpha0.5_gamma0.2.csv`
pub fn trial_log_file_name(params: LearningParams) -> String {
    format!("trials_alpha{}_gamma{}.csv", params.alpha, params.gamma)
}
