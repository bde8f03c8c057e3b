//! Voice capture domain module

mod evidence;

pub use evidence::{AudioData, AudioMimeType, VoiceEvidence};
