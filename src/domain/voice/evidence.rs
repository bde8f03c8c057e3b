//! Voice evidence value objects

use std::fmt;

/// Audio formats the banking API accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioMimeType {
    #[default]
    M4a,
    Wav,
    Mp3,
    Aac,
}

impl AudioMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::M4a => "audio/m4a",
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mp3",
            Self::Aac => "audio/aac",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::M4a => "m4a",
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Aac => "aac",
        }
    }

    /// Resolve a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "m4a" => Some(Self::M4a),
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "aac" => Some(Self::Aac),
            _ => None,
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw audio bytes and their MIME type
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioData {
    data: Vec<u8>,
    mime_type: AudioMimeType,
}

impl AudioData {
    /// Create AudioData from raw bytes
    pub fn new(data: Vec<u8>, mime_type: AudioMimeType) -> Self {
        Self { data, mime_type }
    }

    /// Get the raw audio data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the MIME type
    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// File name sent with the upload
    pub fn file_name(&self) -> String {
        format!("voice.{}", self.mime_type.extension())
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

/// What the device captured for one instruction: the recording and the
/// text the recognizer produced from it. Opaque to this crate beyond upload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VoiceEvidence {
    audio: AudioData,
    transcript: String,
}

impl VoiceEvidence {
    pub fn new(audio: AudioData, transcript: impl Into<String>) -> Self {
        Self {
            audio,
            transcript: transcript.into(),
        }
    }

    pub fn audio(&self) -> &AudioData {
        &self.audio
    }

    /// Recognized text, sent as the `text` field
    pub fn transcript(&self) -> &str {
        &self.transcript
    }
}
