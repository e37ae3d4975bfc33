//! # Progress Reporting and Statistics Module
//!
//! Questo modulo definisce il confine tra la pipeline e i front end.
//!
//! ## Responsabilità:
//! - `ProgressEvent`: identità del job e percentuale di completamento del run
//! - `ProgressReporter`: sink astratto invocato dall'executor per ogni job
//! - `RunSummary`: statistiche aggregate del run (job tentati, falliti, ...)
//! - Implementazioni pronte per la CLI: righe di testo e progress bar
//!
//! ## Semantica della percentuale:
//! - Intero 0-100, calcolato come `floor(completati / totale * 100)`
//! - Non decresce mai durante un run
//! - Vale 100 sull'ultimo evento
//!
//! ## Visual feedback (`ProgressBarReporter`):
//! ```text
//! ⠋ [00:02:15] [========================================] 150/150 (100%) 🎵 track.flac -> track.opus
//! ```

use crate::error::TranscodeError;
use crate::planner::{Job, JobAction};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Notification emitted by the executor for each job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub input: PathBuf,
    pub output: PathBuf,
    pub action: JobAction,
    /// Run completion, 0-100
    pub completion: u8,
}

impl ProgressEvent {
    pub fn new(job: &Job, completion: u8) -> Self {
        Self {
            input: job.input.clone(),
            output: job.output.clone(),
            action: job.action,
            completion,
        }
    }
}

/// Completion percentage after `done` of `total` jobs
pub fn completion_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100 / total) as u8
}

/// Sink for progress events.
///
/// Called synchronously from the executor loop, so implementations must
/// return promptly. Nothing they return is consumed.
pub trait ProgressReporter: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);

    /// A job failed; the run continues with the next one
    fn on_job_failed(&self, _job: &Job, _error: &TranscodeError) {}

    /// Every job was attempted, or the run was cancelled
    fn on_finished(&self, _summary: &RunSummary) {}
}

impl<F> ProgressReporter for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_progress(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// A job that did not produce its output
#[derive(Debug, Clone, Serialize)]
pub struct JobFailure {
    pub job: Job,
    pub error: String,
}

/// Aggregate outcome of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub attempted: usize,
    pub transcoded: usize,
    pub copied: usize,
    /// Outputs that appeared between planning and execution
    pub skipped: usize,
    pub failures: Vec<JobFailure>,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn add_success(&mut self, action: JobAction) {
        self.attempted += 1;
        match action {
            JobAction::Transcode => self.transcoded += 1,
            JobAction::Copy => self.copied += 1,
        }
    }

    pub fn add_skipped(&mut self) {
        self.attempted += 1;
        self.skipped += 1;
    }

    pub fn add_failure(&mut self, job: Job, error: &TranscodeError) {
        self.attempted += 1;
        self.failures.push(JobFailure {
            job,
            error: error.to_string(),
        });
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Every job attempted and none failed
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.attempted == self.total && self.failures.is_empty()
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Jobs: {} | Transcoded: {} | Copied: {} | Skipped: {} | Failed: {}{}",
            self.total,
            self.transcoded,
            self.copied,
            self.skipped,
            self.failed(),
            if self.cancelled { " | Cancelled" } else { "" }
        )
    }
}

/// Prints one line per job, the way the command line always has
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn format_event(event: &ProgressEvent) -> String {
        let verb = match event.action {
            JobAction::Transcode => "Transcoding",
            JobAction::Copy => "Copying",
        };
        format!(
            "{}: {} -> {} ({}%)",
            verb,
            event.input.file_name().unwrap_or_default().to_string_lossy(),
            event.output.file_name().unwrap_or_default().to_string_lossy(),
            event.completion
        )
    }
}

impl ProgressReporter for ConsoleReporter {
    fn on_progress(&self, event: &ProgressEvent) {
        println!("{}", Self::format_event(event));
    }

    fn on_job_failed(&self, job: &Job, error: &TranscodeError) {
        eprintln!("Failed: {}: {}", job.label(), error);
    }
}

/// Progress bar reporting for interactive terminals
pub struct ProgressBarReporter {
    bar: ProgressBar,
}

impl ProgressBarReporter {
    pub fn new(total_jobs: u64) -> Self {
        let bar = ProgressBar::new(total_jobs);

        // Static template, cannot fail to parse
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }
}

impl ProgressReporter for ProgressBarReporter {
    fn on_progress(&self, event: &ProgressEvent) {
        let icon = match event.action {
            JobAction::Transcode => "🎵",
            JobAction::Copy => "📄",
        };
        self.bar.inc(1);
        self.bar.set_message(format!(
            "{} {} -> {}",
            icon,
            event.input.file_name().unwrap_or_default().to_string_lossy(),
            event.output.file_name().unwrap_or_default().to_string_lossy()
        ));
    }

    fn on_job_failed(&self, job: &Job, error: &TranscodeError) {
        self.bar.println(format!("❌ {}: {}", job.label(), error));
    }

    fn on_finished(&self, summary: &RunSummary) {
        self.bar.finish_with_message(summary.format_summary());
    }
}
