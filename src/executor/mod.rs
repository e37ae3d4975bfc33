//! # Executor Module
//!
//! Esecuzione dei job pianificati:
//! - `job_executor`: Loop di esecuzione, progresso e cancellazione
//! - `encoder`: Invocazione dell'encoder esterno

pub mod encoder;
pub mod job_executor;

pub use encoder::Encoder;
pub use job_executor::{run, CancelFlag, JobExecutor, JobOutcome};
