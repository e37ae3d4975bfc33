//! # Encoder Invocation Module
//!
//! Wrapper attorno all'encoder esterno (ffmpeg per default).
//!
//! ## Contratto di invocazione:
//! ```text
//! <encoder> -i <input> -acodec <nome-encoder> <output>
//! ```
//! - stdout e stderr vengono scartati
//! - stdin è chiuso, l'encoder non può chiedere conferme interattive
//! - l'esistenza del file di output segnala il completamento
//! - un encoder mancante o fallito è un errore del singolo job

use crate::codec::Codec;
use crate::error::{Result, TranscodeError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// External audio encoder
#[derive(Debug, Clone)]
pub struct Encoder {
    binary: PathBuf,
}

impl Encoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments passed to the encoder for one transcode
    pub fn arguments(input: &Path, output: &Path, target: Codec) -> Vec<OsString> {
        vec![
            "-i".into(),
            input.as_os_str().to_os_string(),
            "-acodec".into(),
            target.encoder_name().into(),
            output.as_os_str().to_os_string(),
        ]
    }

    /// Transcode `input` into `output`, blocking until the encoder exits
    pub async fn encode(&self, input: &Path, output: &Path, target: Codec) -> Result<()> {
        debug!(
            "🎵 Encoding {} with {} ({})",
            input.file_name().unwrap_or_default().to_string_lossy(),
            self.binary.display(),
            target.encoder_name()
        );

        let start_time = std::time::Instant::now();

        let status = Command::new(&self.binary)
            .args(Self::arguments(input, output, target))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| TranscodeError::EncodeFailed {
                input: input.to_path_buf(),
                reason: format!("failed to execute {}: {}", self.binary.display(), e),
            })?;

        if !status.success() {
            return Err(TranscodeError::EncodeFailed {
                input: input.to_path_buf(),
                reason: format!("encoder exited with {}", status),
            });
        }

        if !output.exists() {
            return Err(TranscodeError::EncodeFailed {
                input: input.to_path_buf(),
                reason: "encoder reported success but wrote no output".to_string(),
            });
        }

        debug!("✅ Encoded in {:.1}s: {}", start_time.elapsed().as_secs_f64(), output.display());
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_argument_contract() {
        let args = Encoder::arguments(Path::new("/in/a.flac"), Path::new("/out/a.opus"), Codec::Opus);
        let expected: Vec<OsString> = ["-i", "/in/a.flac", "-acodec", "libopus", "/out/a.opus"]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(args, expected);
    }

    #[tokio::test]
    async fn test_missing_binary_is_encode_failure() {
        let temp_dir = TempDir::new().unwrap();
        let encoder = Encoder::new(temp_dir.path().join("no-such-encoder"));

        let err = encoder
            .encode(&temp_dir.path().join("a.flac"), &temp_dir.path().join("a.opus"), Codec::Opus)
            .await
            .unwrap_err();
        match err {
            TranscodeError::EncodeFailed { reason, .. } => {
                assert!(reason.contains("failed to execute"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_encode_failure() {
        let encoder = Encoder::new("false");
        let temp_dir = TempDir::new().unwrap();

        let err = encoder
            .encode(&temp_dir.path().join("a.flac"), &temp_dir.path().join("a.opus"), Codec::Opus)
            .await
            .unwrap_err();
        match err {
            TranscodeError::EncodeFailed { reason, .. } => assert!(reason.contains("exited")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_without_output_is_failure() {
        let encoder = Encoder::new("true");
        let temp_dir = TempDir::new().unwrap();

        let err = encoder
            .encode(&temp_dir.path().join("a.flac"), &temp_dir.path().join("a.opus"), Codec::Opus)
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::EncodeFailed { .. }));
    }
}
