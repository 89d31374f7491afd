//! Speech processing provider implementations
//!
//! Contains concrete implementations of the recorder, STT, TTS and player traits.

pub mod aplay;
pub mod arecord;
pub mod piper;
pub mod whisper_cpp;
