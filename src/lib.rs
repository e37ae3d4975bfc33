//! # Bulk Transcode Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare della pipeline
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri front end
//!
//! ## Architettura dei moduli:
//! - `codec`: Registro fisso dei codec (nome encoder, estensione)
//! - `config`: Configurazione del run e validazione
//! - `error`: Tipi di errore custom
//! - `planner`: Visita dell'albero sorgente e lista dei job
//! - `executor`: Esecuzione dei job (encoder esterno o copia)
//! - `file_manager`: Copia con metadata e pulizia output parziali
//! - `progress`: Eventi di progresso, reporter e statistiche
//! - `json_output`: Reporter JSON line-delimited
//! - `transcoder`: Orchestratore planner + executor
//!
//! ## Utilizzo:
//! ```ignore
//! use bulk_transcode::{BulkTranscoder, Codec, ConsoleReporter, TranscodeConfig};
//!
//! let config = TranscodeConfig {
//!     source_codec: Some(Codec::Flac),
//!     target_codec: Some(Codec::Opus),
//!     source_root: Some("/music/flac".into()),
//!     destination_root: Some("/music/opus".into()),
//!     ..Default::default()
//! };
//! let transcoder = BulkTranscoder::new(&config)?;
//! let summary = transcoder.run(&ConsoleReporter).await?;
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
pub mod file_manager;
pub mod json_output;
pub mod planner;
pub mod progress;
pub mod transcoder;

pub use codec::Codec;
pub use config::{RenameStrategy, TranscodeConfig};
pub use error::TranscodeError;
pub use executor::{CancelFlag, Encoder, JobExecutor};
pub use json_output::JsonReporter;
pub use planner::{plan, Job, JobAction, JobList, JobPlanner};
pub use progress::{ConsoleReporter, ProgressBarReporter, ProgressEvent, ProgressReporter, RunSummary};
pub use transcoder::BulkTranscoder;
