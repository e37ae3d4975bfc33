//! # Bulk Transcoder Orchestrator
//!
//! Orchestratore principale che collega planner ed executor per un run
//! completo.
//!
//! ## Flusso di esecuzione:
//! 1. Valida la configurazione (fallisce prima di qualsiasi lavoro)
//! 2. Pianifica i job (crea l'albero di destinazione)
//! 3. Esegue i job notificando il reporter (un encoder fallito è un errore
//!    del singolo job, il run prosegue)
//! 4. Logga le statistiche finali

use crate::config::{ResolvedConfig, TranscodeConfig};
use crate::error::Result;
use crate::executor::{CancelFlag, JobExecutor};
use crate::file_manager::FileManager;
use crate::planner::{JobList, JobPlanner};
use crate::progress::{ProgressReporter, RunSummary};
use tracing::info;

/// Orchestratore di un run di transcodifica
pub struct BulkTranscoder {
    planner: JobPlanner,
    executor: JobExecutor,
}

impl BulkTranscoder {
    /// Crea nuova istanza, validando la configurazione
    pub fn new(config: &TranscodeConfig) -> Result<Self> {
        let resolved = config.validate()?;
        let executor = JobExecutor::from_config(&resolved);
        Ok(Self {
            planner: JobPlanner::new(resolved),
            executor,
        })
    }

    pub fn config(&self) -> &ResolvedConfig {
        self.planner.config()
    }

    /// Flag che interrompe il run tra un job e l'altro
    pub fn cancel_flag(&self) -> CancelFlag {
        self.executor.cancel_flag()
    }

    /// Pianifica i job del run
    pub fn plan(&self) -> Result<JobList> {
        self.log_configuration();
        self.planner.plan()
    }

    /// Esegue una lista di job già pianificata
    pub async fn execute(&self, jobs: JobList, reporter: &dyn ProgressReporter) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();
        let summary = self.executor.run(jobs, reporter).await;
        Self::log_final_stats(&summary, start_time.elapsed().as_secs_f64());

        Ok(summary)
    }

    /// Pianifica ed esegue
    pub async fn run(&self, reporter: &dyn ProgressReporter) -> Result<RunSummary> {
        let jobs = self.plan()?;
        self.execute(jobs, reporter).await
    }

    /// Logga configurazione
    fn log_configuration(&self) {
        let config = self.planner.config();
        info!("Source codec: {}", config.source_codec);
        info!("Target codec: {}", config.target_codec);
        info!("Source folder: {}", config.source_root.display());
        info!("Destination folder: {}", config.destination_root.display());
        info!("Copy other files: {}", config.copy_unmatched);
        info!("Encoder: {} (workers: {})", config.encoder_binary.display(), config.workers);
    }

    /// Logga statistiche finali
    fn log_final_stats(summary: &RunSummary, duration: f64) {
        info!("=== Transcoding Complete ===");
        info!("Jobs attempted: {} of {}", summary.attempted, summary.total);
        info!("Transcoded: {}", summary.transcoded);
        info!("Copied: {}", summary.copied);
        if summary.skipped > 0 {
            info!("Skipped (output appeared meanwhile): {}", summary.skipped);
        }
        info!("Failed: {}", summary.failed());
        info!("Elapsed: {:.1}s", duration);
    }

    /// Somma delle dimensioni degli input, per il riepilogo iniziale
    pub fn input_size(jobs: &JobList) -> String {
        let bytes = jobs
            .iter()
            .filter_map(|job| std::fs::metadata(&job.input).ok())
            .map(|metadata| metadata.len())
            .sum();
        FileManager::format_size(bytes)
    }
}
