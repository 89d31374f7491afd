//! Parley CLI
//!
//! Runs spoken conversations and single capture/playback actions.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use anyhow::Context;
use application::{ConversationService, FileTranscriptionRequest};
use chrono::Local;
use clap::Parser;
use domain::NormalizedCycles;
use infrastructure::{AppConfig, build_conversation_ports, build_speech_service, init_tracing};
use presentation_cli::{
    AudioInArgs, AudioOutArgs, Cli, Commands, log_filter_from_verbosity, render,
    resolve_data_source,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply(&mut config);
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    init_tracing(&config.telemetry, log_filter_from_verbosity(cli.verbose))?;

    match cli.command {
        Commands::Conversation(args) => run_conversation(&config, args.json).await?,

        Commands::AudioIn(args) => run_audio_in(&config, &args).await?,

        Commands::AudioOut(args) => run_audio_out(&config, &args).await?,

        Commands::Config => {
            println!("{}", config.to_toml()?);
        },
    }

    Ok(())
}

async fn run_conversation(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let normalized = NormalizedCycles::normalize(config.conversation.cycles);
    if let Some(notice) = normalized.notice() {
        if json {
            eprintln!("{notice}");
        } else {
            println!("{notice}");
        }
    }

    let ports = build_conversation_ports(config)?;
    let service = ConversationService::with_settings(ports, config.conversation.settings());

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_interrupt(cancel.clone()));
    let outcome = service
        .run_until_cancelled(config.conversation.request(), cancel)
        .await;
    watcher.abort();
    let report = outcome?;

    if json {
        println!("{}", render::json(&report)?);
    } else {
        println!("{}", render::summary(&report));
    }
    Ok(())
}

async fn run_audio_in(config: &AppConfig, args: &AudioInArgs) -> anyhow::Result<()> {
    let speech = build_speech_service(config)?;
    let request = config.conversation.settings().listen_request();
    let text = match &args.file {
        Some(path) => {
            speech
                .transcribe_file(FileTranscriptionRequest::from_listen(path.clone(), request))
                .await?
        },
        None => speech.listen_once(request).await?,
    };

    println!("{text}");

    if let Some(path) = args.transcript_path(Local::now()) {
        tokio::fs::write(&path, format!("{text}\n"))
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Transcript saved to {}", path.display());
    }
    Ok(())
}

async fn run_audio_out(config: &AppConfig, args: &AudioOutArgs) -> anyhow::Result<()> {
    let text = resolve_data_source(&args.data_source)
        .await
        .with_context(|| format!("failed to read {}", args.data_source))?;
    let speech = build_speech_service(config)?;

    match &args.output {
        Some(path) => {
            speech.synthesize_to(&text, path, args.should_play()).await?;
            eprintln!("Audio saved to {}", path.display());
        },
        None => speech.speak_once(&text).await?,
    }
    Ok(())
}

async fn cancel_on_interrupt(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Interrupt received, stopping the conversation");
        cancel.cancel();
    }
}
