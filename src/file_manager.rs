//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file eseguite dai job di copia.
//!
//! ## Responsabilità:
//! - Copia byte-per-byte preservando permessi e timestamp
//! - Rimozione di output parziali dopo un job fallito
//! - Formattazione human-readable delle dimensioni
//!
//! ## Preservazione metadata:
//! - Permessi: copiati da `fs::copy`
//! - Timestamp di accesso e modifica: copiati con `filetime`

use crate::error::{Result, TranscodeError};
use filetime::FileTime;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Manages file operations
pub struct FileManager;

impl FileManager {
    /// Copy `input` to `output` with permissions and timestamps, returning bytes copied
    pub async fn copy_with_metadata(input: &Path, output: &Path) -> Result<u64> {
        let wrap = |source: std::io::Error| TranscodeError::CopyFailed {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(input).await.map_err(wrap)?;
        let bytes = fs::copy(input, output).await.map_err(wrap)?;

        let accessed = FileTime::from_last_access_time(&metadata);
        let modified = FileTime::from_last_modification_time(&metadata);
        filetime::set_file_times(output, accessed, modified).map_err(wrap)?;

        debug!("Copied {} ({})", output.display(), Self::format_size(bytes));
        Ok(bytes)
    }

    /// Remove an incomplete output so that the next plan schedules it again
    pub async fn remove_partial(output: &Path) {
        match fs::remove_file(output).await {
            Ok(()) => debug!("Removed partial output: {}", output.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove partial output {}: {}", output.display(), e),
        }
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}
