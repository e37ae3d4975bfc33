//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom della pipeline.
//!
//! ## Responsabilità:
//! - Definisce `TranscodeError` enum per categorizzare tutti gli errori possibili
//! - Distingue errori di pianificazione (fatali) da errori per singolo job
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `UnknownCodec`: Identificatore codec non supportato
//! - `PathNotFound` / `NotADirectory`: Cartella sorgente non valida
//! - `MissingConfig`: Campo di configurazione obbligatorio non impostato
//! - `InvalidConfig`: Valore di configurazione fuori range
//! - `DirectoryCreateFailed`: Impossibile creare una cartella di destinazione
//! - `EncodeFailed`: Encoder esterno fallito o non avviabile (per job)
//! - `CopyFailed`: Errore di I/O durante la copia (per job)
//!
//! ## Politica di propagazione:
//! - Gli errori di pianificazione interrompono il run prima di qualsiasi job
//! - Gli errori di esecuzione sono per-job e non interrompono il run
//!
//! ## Esempio:
//! ```ignore
//! let codec: Codec = "wav".parse()?; // Err(TranscodeError::UnknownCodec("wav"))
//! ```

use std::path::PathBuf;

/// Custom error types for planning and executing a transcode run
#[derive(thiserror::Error, Debug)]
pub enum TranscodeError {
    #[error("Unknown codec: {0}")]
    UnknownCodec(String),

    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Missing configuration value: {0}")]
    MissingConfig(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Encoding failed for {}: {reason}", input.display())]
    EncodeFailed { input: PathBuf, reason: String },

    #[error("Failed to copy {} to {}: {source}", input.display(), output.display())]
    CopyFailed {
        input: PathBuf,
        output: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TranscodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_paths() {
        let err = TranscodeError::NotADirectory(PathBuf::from("/tmp/file.txt"));
        assert_eq!(err.to_string(), "Not a directory: /tmp/file.txt");

        let err = TranscodeError::UnknownCodec("wav".to_string());
        assert_eq!(err.to_string(), "Unknown codec: wav");

        let err = TranscodeError::EncodeFailed {
            input: PathBuf::from("a.flac"),
            reason: "exit status: 1".to_string(),
        };
        assert_eq!(err.to_string(), "Encoding failed for a.flac: exit status: 1");
    }
}
