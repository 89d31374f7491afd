//! State handlers for the conversation driver
//!
//! One handler per non-terminal state. Each performs at most one
//! suspension-point call against a collaborator, updates the context it
//! was given, and names the next state. Handlers never call each other.

use domain::{ConversationContext, ConversationState, TurnResult};
use tracing::{debug, info, instrument};

use super::conversation_service::ConversationSettings;
use super::turn_isolation::{Isolated, isolate};
use crate::error::ApplicationError;
use crate::ports::ConversationPorts;

/// A handler's result plus the collaborator failure it absorbed, if any
#[derive(Debug)]
pub struct HandledTurn {
    /// Next state and updated context
    pub result: TurnResult,
    /// Recoverable error that triggered the fallback
    pub failure: Option<ApplicationError>,
}

impl HandledTurn {
    const fn new(result: TurnResult, failure: Option<ApplicationError>) -> Self {
        Self { result, failure }
    }
}

/// Capture and transcribe the human turn
///
/// Always leads to SPEAKING. A failed capture leaves an empty transcript.
#[instrument(skip_all, fields(cycle = ctx.current_cycle()))]
pub async fn handle_listening(
    mut ctx: ConversationContext,
    ports: &ConversationPorts,
    settings: &ConversationSettings,
) -> Result<HandledTurn, ApplicationError> {
    ctx.had_error = false;
    debug!(duration = ?settings.listen_duration, "Listening");

    let call = ports
        .listener
        .capture_and_transcribe(settings.listen_request());
    let failure = match isolate(ConversationState::Listening, ctx.current_cycle(), call).await? {
        Isolated::Completed(text) => {
            info!(transcript = %text, "Transcription complete");
            ctx.last_transcript = text;
            None
        },
        Isolated::Fallback(err) => {
            ctx.last_transcript = String::new();
            ctx.had_error = true;
            Some(err)
        },
    };

    Ok(HandledTurn::new(
        TurnResult::new(ConversationState::Speaking, ctx),
        failure,
    ))
}

/// Speak the machine turn and count the cycle
///
/// The cycle counts whether or not synthesis and playback succeed.
#[instrument(skip_all, fields(cycle = ctx.current_cycle()))]
pub async fn handle_speaking(
    mut ctx: ConversationContext,
    ports: &ConversationPorts,
) -> Result<HandledTurn, ApplicationError> {
    ctx.had_error = false;

    let response = ports.responder.respond(&ctx.last_transcript);
    info!(response = %response, "Speaking response");
    ctx.last_response.clone_from(&response);

    let call = ports.speaker.synthesize_and_play(response);
    let failure = match isolate(ConversationState::Speaking, ctx.current_cycle(), call).await? {
        Isolated::Completed(()) => None,
        Isolated::Fallback(err) => {
            ctx.had_error = true;
            Some(err)
        },
    };

    ctx.complete_cycle()?;
    let next = ctx.next_after_speaking();
    info!(
        completed = ctx.cycles_completed,
        target = ctx.target_cycles.get(),
        next = %next,
        "Machine turn finished"
    );

    Ok(HandledTurn::new(TurnResult::new(next, ctx), failure))
}

/// Pause briefly before the next capture
#[instrument(skip_all)]
pub async fn handle_waiting(
    mut ctx: ConversationContext,
    ports: &ConversationPorts,
    settings: &ConversationSettings,
) -> HandledTurn {
    ctx.had_error = false;
    ports.pacer.sleep(settings.wait_duration).await;
    HandledTurn::new(TurnResult::new(ConversationState::Listening, ctx), None)
}
