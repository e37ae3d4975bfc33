//! # Job Model
//!
//! Unità di lavoro prodotte dal planner e consumate dall'executor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What the executor does with a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobAction {
    Transcode,
    Copy,
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobAction::Transcode => f.write_str("transcode"),
            JobAction::Copy => f.write_str("copy"),
        }
    }
}

/// One planned file operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub action: JobAction,
}

impl Job {
    pub fn new(input: PathBuf, output: PathBuf, action: JobAction) -> Self {
        Self { input, output, action }
    }

    /// Short `input -> output` label made of file names only
    pub fn label(&self) -> String {
        format!(
            "{} -> {}",
            self.input.file_name().unwrap_or_default().to_string_lossy(),
            self.output.file_name().unwrap_or_default().to_string_lossy()
        )
    }
}

/// Jobs in directory-walk discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct JobList {
    jobs: Vec<Job>,
}

impl JobList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, job: Job) {
        self.jobs.push(job);
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.jobs.iter()
    }

    /// Number of jobs with the given action
    pub fn count(&self, action: JobAction) -> usize {
        self.jobs.iter().filter(|job| job.action == action).count()
    }

    pub fn as_slice(&self) -> &[Job] {
        &self.jobs
    }
}

impl IntoIterator for JobList {
    type Item = Job;
    type IntoIter = std::vec::IntoIter<Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.into_iter()
    }
}

impl<'a> IntoIterator for &'a JobList {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}

impl FromIterator<Job> for JobList {
    fn from_iter<I: IntoIterator<Item = Job>>(iter: I) -> Self {
        Self {
            jobs: iter.into_iter().collect(),
        }
    }
}
