//! Conversation service - Drives the turn-based spoken conversation
//!
//! The driver owns the context for the length of one run and dispatches to
//! exactly one state handler per loop iteration until the conversation
//! reaches STOPPED:
//!
//! | Current   | Next                                   |
//! |-----------|----------------------------------------|
//! | LISTENING | SPEAKING (empty transcript on failure) |
//! | SPEAKING  | WAITING, LISTENING or STOPPED          |
//! | WAITING   | LISTENING                              |
//!
//! Collaborator failures are absorbed by the handlers. Logic errors abort
//! the run with an error instead of a report.

use std::fmt;
use std::time::Duration;

use domain::{
    ConversationContext, ConversationState, NormalizedCycles, RunId, TerminalReport,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use super::turn_handlers::{HandledTurn, handle_listening, handle_speaking, handle_waiting};
use crate::error::ApplicationError;
use crate::ports::{ConversationPorts, ListenRequest};

/// Default capture length per human turn
pub const DEFAULT_LISTEN_DURATION: Duration = Duration::from_secs(5);

/// Default pause in the waiting state
pub const DEFAULT_WAIT_DURATION: Duration = Duration::from_millis(100);

/// Settings shared by every run of a conversation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSettings {
    /// Capture length per human turn
    pub listen_duration: Duration,
    /// Speech-to-text model name
    pub model: Option<String>,
    /// Language hint for transcription
    pub language: Option<String>,
    /// Whether a waiting pause follows each non-final machine turn
    pub waiting_enabled: bool,
    /// Length of the waiting pause
    pub wait_duration: Duration,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            listen_duration: DEFAULT_LISTEN_DURATION,
            model: None,
            language: None,
            waiting_enabled: false,
            wait_duration: DEFAULT_WAIT_DURATION,
        }
    }
}

impl ConversationSettings {
    /// Build the capture request for one listening turn
    pub fn listen_request(&self) -> ListenRequest {
        ListenRequest {
            duration: self.listen_duration,
            model: self.model.clone(),
            language: self.language.clone(),
        }
    }
}

/// Parameters of a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversationRequest {
    /// Requested cycle count; normalized before the loop starts
    pub cycles: Option<i64>,
    /// State to start in; LISTENING when `None`, SPEAKING for machine-initiated runs
    pub initial_state: Option<ConversationState>,
}

impl ConversationRequest {
    /// Create a request for the given cycle count
    pub const fn with_cycles(cycles: i64) -> Self {
        Self {
            cycles: Some(cycles),
            initial_state: None,
        }
    }

    /// Start the conversation in the given state
    #[must_use]
    pub const fn starting_in(mut self, state: ConversationState) -> Self {
        self.initial_state = Some(state);
        self
    }
}

/// Service running the conversation state machine
pub struct ConversationService {
    ports: ConversationPorts,
    settings: ConversationSettings,
}

impl fmt::Debug for ConversationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ConversationService {
    /// Create a conversation service with default settings
    pub fn new(ports: ConversationPorts) -> Self {
        Self::with_settings(ports, ConversationSettings::default())
    }

    /// Create a conversation service with custom settings
    pub const fn with_settings(ports: ConversationPorts, settings: ConversationSettings) -> Self {
        Self { ports, settings }
    }

    /// Get the current settings
    #[must_use]
    pub const fn settings(&self) -> &ConversationSettings {
        &self.settings
    }

    /// Run a conversation to completion
    pub async fn run(
        &self,
        request: ConversationRequest,
    ) -> Result<TerminalReport, ApplicationError> {
        self.run_until_cancelled(request, CancellationToken::new())
            .await
    }

    /// Run a conversation, stopping early at the next transition boundary
    /// once `cancel` fires
    ///
    /// A running handler is never interrupted; the token is checked before
    /// each handler starts.
    #[instrument(skip(self, cancel), fields(run_id = tracing::field::Empty))]
    pub async fn run_until_cancelled(
        &self,
        request: ConversationRequest,
        cancel: CancellationToken,
    ) -> Result<TerminalReport, ApplicationError> {
        let normalized = NormalizedCycles::normalize(request.cycles);
        let initial_state = request
            .initial_state
            .unwrap_or(ConversationState::Listening);
        if initial_state.is_terminal() {
            return Err(ApplicationError::InvalidState(
                "a conversation cannot start in the stopped state".to_string(),
            ));
        }

        let run_id = RunId::new();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        let mut report = TerminalReport::begin(run_id, normalized.target, normalized.adjusted);
        let mut ctx = ConversationContext::new(
            initial_state,
            normalized.target,
            self.settings.waiting_enabled,
        );

        info!(
            target = normalized.target.get(),
            adjusted = normalized.adjusted,
            initial_state = %initial_state,
            waiting = self.settings.waiting_enabled,
            "Conversation started"
        );

        while !ctx.current_state.is_terminal() {
            if cancel.is_cancelled() {
                info!(state = %ctx.current_state, "Cancellation requested, stopping");
                report.cancelled = true;
                ctx.stop();
                break;
            }

            let state = ctx.current_state;
            let cycle = ctx.current_cycle();
            report.visit(state);

            let handled = self.dispatch(ctx.clone()).await?;
            if let Some(failure) = handled.failure {
                report.record_failure(state, cycle, failure.to_string());
            }

            ctx.apply(handled.result).map_err(|e| {
                error!(state = %state, error = %e, "Handler produced an illegal transition");
                ApplicationError::from(e)
            })?;
            debug!(from = %state, to = %ctx.current_state, "State transition");
        }

        report.visit(ctx.current_state);
        report.finish(ctx.current_state, ctx.cycles_completed);

        info!(
            cycles = report.cycles_completed,
            failures = report.failures.len(),
            cancelled = report.cancelled,
            "Conversation stopped"
        );
        Ok(report)
    }

    async fn dispatch(&self, ctx: ConversationContext) -> Result<HandledTurn, ApplicationError> {
        match ctx.current_state {
            ConversationState::Listening => {
                handle_listening(ctx, &self.ports, &self.settings).await
            },
            ConversationState::Speaking => handle_speaking(ctx, &self.ports).await,
            ConversationState::Waiting => {
                Ok(handle_waiting(ctx, &self.ports, &self.settings).await)
            },
            ConversationState::Stopped => Err(ApplicationError::InvalidState(
                "no handler for the stopped state".to_string(),
            )),
        }
    }
}
