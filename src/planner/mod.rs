//! # Planner Module
//!
//! Modulo che separa le responsabilità della pianificazione in sottomoduli:
//! - `job`: Modello dei job e della lista ordinata
//! - `job_planner`: Visita dell'albero sorgente e decisione per file
//! - `path_resolver`: Calcolo dei path di destinazione e creazione cartelle

pub mod job;
pub mod job_planner;
pub mod path_resolver;

pub use job::{Job, JobAction, JobList};
pub use job_planner::{plan, JobPlanner};
pub use path_resolver::PathResolver;
