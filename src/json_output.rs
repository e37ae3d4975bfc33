//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per front end esterni
//! (GUI, script) che pilotano la CLI come sottoprocesso.
//!
//! ## Responsabilità:
//! - Emette un oggetto JSON per riga su stdout
//! - Implementa `ProgressReporter` traducendo gli eventi della pipeline
//! - Fornisce interfaccia standardizzata per comunicazione inter-processo
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio run (cartelle, codec, numero di job)
//! - `progress`: Un job sta per essere eseguito (o è appena terminato)
//! - `job_failed`: Un job non ha prodotto il suo output
//! - `complete`: Fine run con statistiche finali
//! - `error`: Errore fatale prima dell'esecuzione

use crate::config::ResolvedConfig;
use crate::error::TranscodeError;
use crate::planner::{Job, JobAction, JobList};
use crate::progress::{ProgressEvent, ProgressReporter, RunSummary};
use serde::Serialize;
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    /// Inizio del run
    Start {
        source: PathBuf,
        destination: PathBuf,
        source_codec: String,
        target_codec: String,
        total_jobs: usize,
        transcode_jobs: usize,
        copy_jobs: usize,
    },

    /// Avanzamento per singolo job
    Progress {
        input: PathBuf,
        output: PathBuf,
        action: JobAction,
        completion: u8,
    },

    /// Job fallito, il run prosegue
    JobFailed {
        input: PathBuf,
        output: PathBuf,
        action: JobAction,
        error: String,
    },

    /// Run terminato
    Complete {
        total: usize,
        attempted: usize,
        transcoded: usize,
        copied: usize,
        skipped: usize,
        failed: usize,
        cancelled: bool,
    },

    /// Errore generale
    Error {
        message: String,
    },
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Crea un messaggio di inizio
    pub fn start(config: &ResolvedConfig, jobs: &JobList) -> Self {
        Self::Start {
            source: config.source_root.clone(),
            destination: config.destination_root.clone(),
            source_codec: config.source_codec.to_string(),
            target_codec: config.target_codec.to_string(),
            total_jobs: jobs.len(),
            transcode_jobs: jobs.count(JobAction::Transcode),
            copy_jobs: jobs.count(JobAction::Copy),
        }
    }

    /// Crea un messaggio di errore
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl From<&ProgressEvent> for JsonMessage {
    fn from(event: &ProgressEvent) -> Self {
        Self::Progress {
            input: event.input.clone(),
            output: event.output.clone(),
            action: event.action,
            completion: event.completion,
        }
    }
}

impl From<&RunSummary> for JsonMessage {
    fn from(summary: &RunSummary) -> Self {
        Self::Complete {
            total: summary.total,
            attempted: summary.attempted,
            transcoded: summary.transcoded,
            copied: summary.copied,
            skipped: summary.skipped,
            failed: summary.failed(),
            cancelled: summary.cancelled,
        }
    }
}

/// Reporter che emette messaggi JSON line-delimited
#[derive(Debug, Default)]
pub struct JsonReporter;

impl ProgressReporter for JsonReporter {
    fn on_progress(&self, event: &ProgressEvent) {
        JsonMessage::from(event).emit();
    }

    fn on_job_failed(&self, job: &Job, error: &TranscodeError) {
        JsonMessage::JobFailed {
            input: job.input.clone(),
            output: job.output.clone(),
            action: job.action,
            error: error.to_string(),
        }
        .emit();
    }

    fn on_finished(&self, summary: &RunSummary) {
        JsonMessage::from(summary).emit();
    }
}
