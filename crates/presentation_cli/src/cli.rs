//! Command-line arguments and the overrides they apply to the loaded config.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand};
use domain::{ConversationState, NormalizedCycles};
use infrastructure::{AppConfig, ConversationAppConfig, SpeechBackend};

/// Parley: a turn-based spoken conversation loop
#[derive(Debug, Parser)]
#[command(name = "parley")]
#[command(author, version, about = "Turn-based spoken conversation on the command line", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./parley.toml when present)
    #[arg(short, long, global = true, env = "PARLEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Speech backend to use instead of the configured one
    #[arg(long, global = true, value_parser = parse_backend)]
    pub backend: Option<SpeechBackend>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a conversation of alternating human and machine turns
    ///
    /// Example: parley conversation --cycles 4 --wait
    Conversation(ConversationArgs),

    /// Capture one utterance, or transcribe a recording, and print the transcript
    ///
    /// Example: parley audio-in --duration 3 --output transcript.txt
    /// Example: parley audio-in --file memo.wav --save-transcript
    AudioIn(AudioInArgs),

    /// Speak a piece of text, or the contents of a text file
    ///
    /// Example: parley audio-out --data-source "Hello there"
    /// Example: parley audio-out --data-source notes.txt --output notes.wav --no-play
    AudioOut(AudioOutArgs),

    /// Print the effective configuration as TOML
    Config,
}

/// Capture settings shared by `conversation` and `audio-in`
#[derive(Debug, Default, Args)]
pub struct ListenArgs {
    /// Capture length per human turn in seconds
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub duration: Option<u64>,

    /// Speech-to-text model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Language hint for transcription (e.g. "en")
    #[arg(short, long)]
    pub language: Option<String>,
}

impl ListenArgs {
    /// Overwrite the capture settings that were given on the command line
    pub fn apply(&self, config: &mut ConversationAppConfig) {
        if let Some(duration) = self.duration {
            config.duration_secs = duration;
        }
        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
        if let Some(language) = &self.language {
            config.language = Some(language.clone());
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct ConversationArgs {
    /// Number of cycles; odd values round up, values below 2 become 2
    #[arg(
        long,
        visible_alias = "turns",
        allow_negative_numbers = true,
        value_parser = parse_cycles
    )]
    pub cycles: Option<NormalizedCycles>,

    /// Who opens the conversation: listening (human) or speaking (machine)
    #[arg(long, value_parser = parse_start)]
    pub start: Option<ConversationState>,

    /// Pause between a machine turn and the next capture
    #[arg(long)]
    pub wait: bool,

    /// Pause length in milliseconds; implies --wait
    #[arg(long)]
    pub wait_ms: Option<u64>,

    /// Print the terminal report as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub listen: ListenArgs,
}

impl ConversationArgs {
    /// Overwrite the conversation settings that were given on the command line
    pub fn apply(&self, config: &mut ConversationAppConfig) {
        if let Some(requested) = self.cycles.and_then(|cycles| cycles.requested) {
            config.cycles = Some(requested);
        }
        if let Some(state) = self.start {
            config.initial_state = state;
        }
        if self.wait || self.wait_ms.is_some() {
            config.waiting_enabled = true;
        }
        if let Some(wait_ms) = self.wait_ms {
            config.wait_ms = wait_ms;
        }
        self.listen.apply(config);
    }
}

#[derive(Debug, Default, Args)]
pub struct AudioInArgs {
    /// Transcribe this audio file instead of recording
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Also write the transcript to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the transcript to a timestamped file when no --output is given
    #[arg(long)]
    pub save_transcript: bool,

    #[command(flatten)]
    pub listen: ListenArgs,
}

impl AudioInArgs {
    /// Where to save the transcript, if anywhere
    ///
    /// `--output` wins; `--save-transcript` alone names the file
    /// `transcript_<YYYYmmdd-HHMMSS>.txt` in the working directory.
    pub fn transcript_path(&self, now: DateTime<Local>) -> Option<PathBuf> {
        self.output.clone().or_else(|| {
            self.save_transcript.then(|| {
                PathBuf::from(format!("transcript_{}.txt", now.format("%Y%m%d-%H%M%S")))
            })
        })
    }
}

#[derive(Debug, Args)]
pub struct AudioOutArgs {
    /// Text to speak, or a path to a text file
    #[arg(long, visible_alias = "text")]
    pub data_source: String,

    /// Save the synthesized audio to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Play the audio after saving it (the default)
    #[arg(long, overrides_with = "no_play")]
    pub play: bool,

    /// Only save the audio; requires --output
    #[arg(long, requires = "output", overrides_with = "play")]
    pub no_play: bool,
}

impl AudioOutArgs {
    /// Whether the synthesized audio should be played
    pub const fn should_play(&self) -> bool {
        !self.no_play
    }
}

impl Cli {
    /// Apply every command-line override to the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(backend) = self.backend {
            config.speech.backend = backend.name().to_string();
        }
        match &self.command {
            Commands::Conversation(args) => args.apply(&mut config.conversation),
            Commands::AudioIn(args) => args.listen.apply(&mut config.conversation),
            Commands::AudioOut(_) | Commands::Config => {},
        }
    }
}

/// Determine the log filter override from the verbosity count
///
/// Without `-v` the configured filter (or `RUST_LOG`) applies.
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Read the text to speak
///
/// An existing regular file is read as UTF-8; anything else is spoken as is.
///
/// # Errors
///
/// Returns an I/O error if the file exists but cannot be read.
pub async fn resolve_data_source(source: &str) -> std::io::Result<String> {
    let path = Path::new(source);
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => tokio::fs::read_to_string(path).await,
        _ => Ok(source.to_string()),
    }
}

fn parse_cycles(raw: &str) -> Result<NormalizedCycles, String> {
    NormalizedCycles::parse(raw).map_err(|e| e.to_string())
}

fn parse_start(raw: &str) -> Result<ConversationState, String> {
    match raw.parse::<ConversationState>() {
        Ok(state @ (ConversationState::Listening | ConversationState::Speaking)) => Ok(state),
        Ok(other) => Err(format!(
            "a conversation cannot start in '{other}'; use 'listening' or 'speaking'"
        )),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_backend(raw: &str) -> Result<SpeechBackend, String> {
    raw.parse().map_err(|e: application::ApplicationError| e.to_string())
}
