//! # Codec Registry Module
//!
//! Registro fisso dei codec audio supportati.
//!
//! ## Responsabilità:
//! - Mappa ogni codec al nome dell'encoder passato a `-acodec`
//! - Mappa ogni codec all'estensione file (con il punto iniziale)
//! - Parsing degli identificatori testuali (`"opus"`, `"mp3"`, ...)
//!
//! ## Codec supportati:
//! | Codec    | Encoder      | Estensione |
//! |----------|--------------|------------|
//! | aac      | aac          | .aac       |
//! | flac     | flac         | .flac      |
//! | opus     | libopus      | .opus      |
//! | mp3      | libmp3lame   | .mp3       |
//! | vorbis   | libvorbis    | .ogg       |

use crate::error::{Result, TranscodeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Audio codec known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    Aac,
    Flac,
    Opus,
    Mp3,
    Vorbis,
}

impl Codec {
    pub const ALL: [Codec; 5] = [Codec::Aac, Codec::Flac, Codec::Opus, Codec::Mp3, Codec::Vorbis];

    /// Identifier used in configuration and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Codec::Aac => "aac",
            Codec::Flac => "flac",
            Codec::Opus => "opus",
            Codec::Mp3 => "mp3",
            Codec::Vorbis => "vorbis",
        }
    }

    /// Encoder name passed to the external encoder via `-acodec`
    pub fn encoder_name(&self) -> &'static str {
        match self {
            Codec::Aac => "aac",
            Codec::Flac => "flac",
            Codec::Opus => "libopus",
            Codec::Mp3 => "libmp3lame",
            Codec::Vorbis => "libvorbis",
        }
    }

    /// File extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Codec::Aac => ".aac",
            Codec::Flac => ".flac",
            Codec::Opus => ".opus",
            Codec::Mp3 => ".mp3",
            Codec::Vorbis => ".ogg",
        }
    }
}

impl FromStr for Codec {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Codec::ALL
            .into_iter()
            .find(|codec| codec.id() == wanted)
            .ok_or_else(|| TranscodeError::UnknownCodec(s.to_string()))
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Look up the encoder name for a codec identifier
pub fn encoder_name(codec_id: &str) -> Result<&'static str> {
    Ok(codec_id.parse::<Codec>()?.encoder_name())
}

/// Look up the file extension for a codec identifier
pub fn extension(codec_id: &str) -> Result<&'static str> {
    Ok(codec_id.parse::<Codec>()?.extension())
}
