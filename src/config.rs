//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione di un run di transcodifica.
//!
//! ## Responsabilità:
//! - Definisce la struct `TranscodeConfig` con tutti i parametri del run
//! - Valida i parametri e produce una `ResolvedConfig` senza campi opzionali
//! - Supporta caricamento/salvataggio preferenze da/verso file JSON (solo front end)
//! - Fornisce valori di default sensati per i parametri secondari
//!
//! ## Parametri di configurazione:
//! - `source_codec`: Codec dei file da transcodificare (obbligatorio)
//! - `target_codec`: Codec di destinazione (obbligatorio)
//! - `source_root`: Cartella sorgente (obbligatoria, deve esistere)
//! - `destination_root`: Cartella di destinazione (obbligatoria)
//! - `copy_unmatched`: Copia i file che non corrispondono (default: false)
//! - `rename`: Strategia di sostituzione estensione (default: first-occurrence)
//! - `encoder_binary`: Encoder esterno (default: "ffmpeg")
//! - `workers`: Job concorrenti (default: 1, esecuzione sequenziale)
//!
//! ## Validazione:
//! - Tutti e quattro i campi identità devono essere impostati
//! - La cartella sorgente deve esistere ed essere una directory
//! - `workers` deve essere > 0
//!
//! ## Esempio:
//! ```ignore
//! let config = TranscodeConfig {
//!     source_codec: Some(Codec::Flac),
//!     target_codec: Some(Codec::Opus),
//!     source_root: Some("/music/flac".into()),
//!     destination_root: Some("/music/opus".into()),
//!     ..Default::default()
//! };
//! let resolved = config.validate()?;
//! ```

use crate::codec::Codec;
use crate::error::{Result, TranscodeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How the source extension is replaced in a matched file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenameStrategy {
    /// Replace the first occurrence of the source extension anywhere in the
    /// name: `a.flac.flac` becomes `a.opus.flac`.
    #[default]
    FirstOccurrence,
    /// Replace only the trailing extension: `a.flac.flac` becomes `a.flac.opus`.
    Suffix,
}

impl RenameStrategy {
    /// Rewrite the raw bytes of `file_name`, which must end with `from`.
    /// Names that are not valid UTF-8 are renamed the same way.
    pub fn apply(&self, file_name: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
        let at = match self {
            RenameStrategy::FirstOccurrence if !from.is_empty() => file_name
                .windows(from.len())
                .position(|window| window == from),
            _ => file_name.len().checked_sub(from.len()),
        };

        match at {
            Some(at) if file_name[at..].starts_with(from) => {
                [&file_name[..at], to, &file_name[at + from.len()..]].concat()
            }
            _ => file_name.to_vec(),
        }
    }
}

/// Configuration for a transcode run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    /// Codec of the files to transcode
    pub source_codec: Option<Codec>,
    /// Codec to transcode into
    pub target_codec: Option<Codec>,
    /// Folder containing the source audio files
    pub source_root: Option<PathBuf>,
    /// Folder receiving the mirrored tree
    pub destination_root: Option<PathBuf>,
    /// Copy files that do not match the source extension
    pub copy_unmatched: bool,
    /// Extension replacement strategy for matched files
    pub rename: RenameStrategy,
    /// External encoder executable
    pub encoder_binary: PathBuf,
    /// Number of jobs executed concurrently
    pub workers: usize,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            source_codec: None,
            target_codec: None,
            source_root: None,
            destination_root: None,
            copy_unmatched: false,
            rename: RenameStrategy::default(),
            encoder_binary: PathBuf::from("ffmpeg"),
            workers: 1,
        }
    }
}

/// A validated configuration, every identity field present
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub source_codec: Codec,
    pub target_codec: Codec,
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub copy_unmatched: bool,
    pub rename: RenameStrategy,
    pub encoder_binary: PathBuf,
    pub workers: usize,
}

impl TranscodeConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<ResolvedConfig> {
        let source_codec = self.source_codec.ok_or(TranscodeError::MissingConfig("source codec"))?;
        let target_codec = self.target_codec.ok_or(TranscodeError::MissingConfig("target codec"))?;
        let source_root = self
            .source_root
            .clone()
            .ok_or(TranscodeError::MissingConfig("source folder"))?;
        let destination_root = self
            .destination_root
            .clone()
            .ok_or(TranscodeError::MissingConfig("destination folder"))?;

        if self.workers == 0 {
            return Err(TranscodeError::InvalidConfig(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if self.encoder_binary.as_os_str().is_empty() {
            return Err(TranscodeError::InvalidConfig(
                "Encoder binary must not be empty".to_string(),
            ));
        }

        if !source_root.exists() {
            return Err(TranscodeError::PathNotFound(source_root));
        }
        if !source_root.is_dir() {
            return Err(TranscodeError::NotADirectory(source_root));
        }

        Ok(ResolvedConfig {
            source_codec,
            target_codec,
            source_root,
            destination_root,
            copy_unmatched: self.copy_unmatched,
            rename: self.rename,
            encoder_binary: self.encoder_binary.clone(),
            workers: self.workers,
        })
    }

    /// Default location of the saved preferences
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".bulk-transcode").join("config.json"))
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: TranscodeConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
