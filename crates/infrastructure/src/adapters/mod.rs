//! Adapters implementing the application ports

mod console_adapter;
mod speech_adapter;
mod tokio_pacer;

pub use console_adapter::{ConsoleListeningAdapter, ConsoleSpeakingAdapter, REPLY_PREFIX};
pub use speech_adapter::{LocalListeningAdapter, LocalSpeakingAdapter};
pub use tokio_pacer::TokioPacer;
