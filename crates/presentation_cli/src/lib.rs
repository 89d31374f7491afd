//! Parley command-line front end
//!
//! Argument parsing and report rendering live here so the binary stays a thin
//! dispatcher and the parsing rules can be tested directly.

pub mod cli;
pub mod render;

pub use cli::{
    AudioInArgs, AudioOutArgs, Cli, Commands, ConversationArgs, ListenArgs,
    log_filter_from_verbosity, resolve_data_source,
};
