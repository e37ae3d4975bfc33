//! # Job Executor
//!
//! Esegue la lista dei job prodotta dal planner.
//!
//! ## Modalità di esecuzione:
//! - `workers == 1`: sequenziale nell'ordine della lista, evento di progresso
//!   emesso *prima* di eseguire il job ("in elaborazione")
//! - `workers > 1`: fino a `workers` job concorrenti, evento emesso al
//!   completamento con percentuale calcolata sui job completati
//!
//! ## Gestione errori:
//! - Un job fallito non interrompe il run: l'errore viene loggato, notificato
//!   al reporter e registrato nel `RunSummary`
//! - Nessun retry automatico
//! - Un output parziale lasciato dall'encoder viene rimosso
//!
//! ## Cancellazione:
//! - `CancelFlag` viene consultato prima di avviare ogni job

use crate::codec::Codec;
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::executor::encoder::Encoder;
use crate::file_manager::FileManager;
use crate::planner::{Job, JobAction, JobList};
use crate::progress::{completion_percent, ProgressEvent, ProgressReporter, RunSummary};
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared flag that stops a run between jobs
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a single job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Done,
    /// The output appeared after planning, nothing was written
    AlreadyPresent,
}

/// Esecutore dei job di un run
pub struct JobExecutor {
    target_codec: Codec,
    encoder: Encoder,
    workers: usize,
    cancel: CancelFlag,
}

impl JobExecutor {
    /// Crea un executor sequenziale
    pub fn new(target_codec: Codec, encoder: Encoder) -> Self {
        Self {
            target_codec,
            encoder,
            workers: 1,
            cancel: CancelFlag::new(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.target_codec, Encoder::new(&config.encoder_binary)).with_workers(config.workers)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Esegue tutti i job, proseguendo oltre i fallimenti
    pub async fn run(&self, jobs: JobList, reporter: &dyn ProgressReporter) -> RunSummary {
        let total = jobs.len();
        info!("🚀 Executing {} jobs with {} worker(s)", total, self.workers);

        let summary = if self.workers > 1 {
            self.run_concurrently(jobs, reporter).await
        } else {
            self.run_sequentially(jobs, reporter).await
        };

        if summary.cancelled {
            warn!(
                "Run cancelled after {} of {} jobs",
                summary.attempted, summary.total
            );
        }
        reporter.on_finished(&summary);
        summary
    }

    async fn run_sequentially(&self, jobs: JobList, reporter: &dyn ProgressReporter) -> RunSummary {
        let total = jobs.len();
        let mut summary = RunSummary::new(total);

        for (index, job) in jobs.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            reporter.on_progress(&ProgressEvent::new(&job, completion_percent(index + 1, total)));
            let result = self.execute(&job).await;
            Self::record(&mut summary, job, result, reporter);
        }

        summary
    }

    async fn run_concurrently(&self, jobs: JobList, reporter: &dyn ProgressReporter) -> RunSummary {
        let total = jobs.len();
        let mut summary = RunSummary::new(total);
        let cancel = self.cancel.clone();

        let mut pending = stream::iter(jobs)
            .take_while(move |_| futures::future::ready(!cancel.is_cancelled()))
            .map(move |job| async move {
                let result = self.execute(&job).await;
                (job, result)
            })
            .buffer_unordered(self.workers);

        let mut completed = 0;
        while let Some((job, result)) = pending.next().await {
            completed += 1;
            reporter.on_progress(&ProgressEvent::new(&job, completion_percent(completed, total)));
            Self::record(&mut summary, job, result, reporter);
        }

        summary.cancelled = summary.attempted < total && self.cancel.is_cancelled();
        summary
    }

    /// Esegue un singolo job
    pub async fn execute(&self, job: &Job) -> Result<JobOutcome> {
        if job.output.exists() {
            debug!("[SKIP] Output appeared since planning: {}", job.output.display());
            return Ok(JobOutcome::AlreadyPresent);
        }

        let result = match job.action {
            JobAction::Transcode => self
                .encoder
                .encode(&job.input, &job.output, self.target_codec)
                .await,
            JobAction::Copy => FileManager::copy_with_metadata(&job.input, &job.output)
                .await
                .map(|_| ()),
        };

        if result.is_err() {
            FileManager::remove_partial(&job.output).await;
        }

        result.map(|()| JobOutcome::Done)
    }

    /// Registra l'esito di un job nel summary
    fn record(
        summary: &mut RunSummary,
        job: Job,
        result: Result<JobOutcome>,
        reporter: &dyn ProgressReporter,
    ) {
        match result {
            Ok(JobOutcome::Done) => summary.add_success(job.action),
            Ok(JobOutcome::AlreadyPresent) => summary.add_skipped(),
            Err(e) => {
                warn!("⚠️ {} failed: {}", job.label(), e);
                reporter.on_job_failed(&job, &e);
                summary.add_failure(job, &e);
            }
        }
    }
}

/// Execute `jobs` sequentially with the default encoder
pub async fn run(jobs: JobList, target_codec: Codec, reporter: &dyn ProgressReporter) -> RunSummary {
    JobExecutor::new(target_codec, Encoder::default())
        .run(jobs, reporter)
        .await
}
