//! Conversation state model
//!
//! A conversation alternates between capturing the human's speech and
//! speaking a machine response until the cycle target is met. The context
//! is owned by exactly one run and threaded linearly through the handlers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::CycleTarget;

/// The states a conversation can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationState {
    /// Capturing and transcribing human speech
    Listening,
    /// Synthesizing and playing the machine response
    Speaking,
    /// Short pacing pause between a machine turn and the next capture
    Waiting,
    /// Terminal state
    Stopped,
}

impl ConversationState {
    /// Check if this is the terminal state
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Check whether the transition table permits moving to `next`
    ///
    /// Forced stops on cancellation are not covered here; they bypass the
    /// table through [`ConversationContext::stop`].
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Listening, Self::Speaking)
                | (Self::Speaking, Self::Waiting | Self::Listening | Self::Stopped)
                | (Self::Waiting, Self::Listening)
        )
    }

    /// Lowercase name used in logs and serialized output
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Listening => "listening",
            Self::Speaking => "speaking",
            Self::Waiting => "waiting",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "listening" | "listen" => Ok(Self::Listening),
            "speaking" | "speak" => Ok(Self::Speaking),
            "waiting" | "wait" => Ok(Self::Waiting),
            "stopped" | "stop" => Ok(Self::Stopped),
            other => Err(DomainError::validation(format!(
                "unknown conversation state '{other}'"
            ))),
        }
    }
}

/// Mutable record of one conversation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// State the next handler will run for
    pub current_state: ConversationState,
    /// Completed listening/speaking pairs
    pub cycles_completed: u64,
    /// Normalized cycle target
    pub target_cycles: CycleTarget,
    /// Most recent transcript, empty when capture failed
    pub last_transcript: String,
    /// Most recent machine response
    pub last_response: String,
    /// Whether the last handler fell back after a collaborator failure
    pub had_error: bool,
    /// Whether a waiting pause follows each non-final machine turn
    pub waiting_enabled: bool,
}

impl ConversationContext {
    /// Create a fresh context at the start of a run
    #[must_use]
    pub const fn new(
        initial_state: ConversationState,
        target_cycles: CycleTarget,
        waiting_enabled: bool,
    ) -> Self {
        Self {
            current_state: initial_state,
            cycles_completed: 0,
            target_cycles,
            last_transcript: String::new(),
            last_response: String::new(),
            had_error: false,
            waiting_enabled,
        }
    }

    /// Check whether the cycle target has been reached
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cycles_completed >= self.target_cycles.get()
    }

    /// Number of cycles still to run
    #[must_use]
    pub fn remaining_cycles(&self) -> u64 {
        self.target_cycles.get().saturating_sub(self.cycles_completed)
    }

    /// One-based index of the cycle currently in progress
    #[must_use]
    pub const fn current_cycle(&self) -> u64 {
        self.cycles_completed + 1
    }

    /// Count one machine turn as a completed cycle
    ///
    /// Fails if the target had already been reached, which can only happen
    /// through a logic error in the driver.
    pub fn complete_cycle(&mut self) -> Result<(), DomainError> {
        if self.is_complete() {
            return Err(DomainError::CycleOverrun {
                completed: self.cycles_completed + 1,
                target: self.target_cycles.get(),
            });
        }
        self.cycles_completed += 1;
        Ok(())
    }

    /// Decide where a machine turn leads
    #[must_use]
    pub fn next_after_speaking(&self) -> ConversationState {
        if self.is_complete() {
            ConversationState::Stopped
        } else if self.waiting_enabled {
            ConversationState::Waiting
        } else {
            ConversationState::Listening
        }
    }

    /// Apply a handler result, validating it against the transition table
    pub fn apply(&mut self, result: TurnResult) -> Result<(), DomainError> {
        let from = self.current_state;
        let to = result.next_state;
        if !from.can_transition_to(to) {
            return Err(DomainError::InvalidTransition { from, to });
        }
        if to.is_terminal() && !result.context.is_complete() {
            return Err(DomainError::InvalidTransition { from, to });
        }

        *self = result.context;
        self.current_state = to;
        Ok(())
    }

    /// Force the terminal state, used when a run is cancelled
    pub const fn stop(&mut self) {
        self.current_state = ConversationState::Stopped;
    }
}

/// Value produced by a state handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    /// State to move to
    pub next_state: ConversationState,
    /// Context as updated by the handler
    pub context: ConversationContext,
}

impl TurnResult {
    /// Create a new turn result
    #[must_use]
    pub const fn new(next_state: ConversationState, context: ConversationContext) -> Self {
        Self {
            next_state,
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(target: u64, waiting: bool) -> ConversationContext {
        ConversationContext::new(
            ConversationState::Listening,
            CycleTarget::try_new(target).unwrap(),
            waiting,
        )
    }

    #[test]
    fn state_serializes_lowercase() {
        let json = serde_json::to_string(&ConversationState::Speaking).unwrap();
        assert_eq!(json, "\"speaking\"");
    }

    #[test]
    fn state_parses_case_insensitively() {
        assert_eq!(
            "SPEAKING".parse::<ConversationState>().unwrap(),
            ConversationState::Speaking
        );
        assert_eq!(
            " listen ".parse::<ConversationState>().unwrap(),
            ConversationState::Listening
        );
        assert!("singing".parse::<ConversationState>().is_err());
    }

    #[test]
    fn only_stopped_is_terminal() {
        assert!(ConversationState::Stopped.is_terminal());
        assert!(!ConversationState::Listening.is_terminal());
        assert!(!ConversationState::Speaking.is_terminal());
        assert!(!ConversationState::Waiting.is_terminal());
    }

    #[test]
    fn transition_table() {
        use ConversationState::{Listening, Speaking, Stopped, Waiting};

        assert!(Listening.can_transition_to(Speaking));
        assert!(Speaking.can_transition_to(Waiting));
        assert!(Speaking.can_transition_to(Listening));
        assert!(Speaking.can_transition_to(Stopped));
        assert!(Waiting.can_transition_to(Listening));

        assert!(!Listening.can_transition_to(Stopped));
        assert!(!Listening.can_transition_to(Waiting));
        assert!(!Waiting.can_transition_to(Speaking));
        assert!(!Stopped.can_transition_to(Listening));
    }

    #[test]
    fn new_context_starts_empty() {
        let ctx = context(4, false);
        assert_eq!(ctx.cycles_completed, 0);
        assert_eq!(ctx.remaining_cycles(), 4);
        assert_eq!(ctx.current_cycle(), 1);
        assert!(ctx.last_transcript.is_empty());
        assert!(!ctx.had_error);
    }

    #[test]
    fn next_after_speaking_respects_waiting_flag() {
        let mut ctx = context(4, false);
        ctx.complete_cycle().unwrap();
        assert_eq!(ctx.next_after_speaking(), ConversationState::Listening);

        ctx.waiting_enabled = true;
        assert_eq!(ctx.next_after_speaking(), ConversationState::Waiting);
    }

    #[test]
    fn final_machine_turn_stops_even_with_waiting() {
        let mut ctx = context(2, true);
        ctx.complete_cycle().unwrap();
        ctx.complete_cycle().unwrap();
        assert_eq!(ctx.next_after_speaking(), ConversationState::Stopped);
    }

    #[test]
    fn complete_cycle_refuses_overrun() {
        let mut ctx = context(2, false);
        ctx.complete_cycle().unwrap();
        ctx.complete_cycle().unwrap();
        let err = ctx.complete_cycle().unwrap_err();
        assert!(matches!(err, DomainError::CycleOverrun { completed: 3, target: 2 }));
        assert_eq!(ctx.cycles_completed, 2);
    }

    #[test]
    fn apply_moves_to_next_state() {
        let mut ctx = context(2, false);
        let mut updated = ctx.clone();
        updated.last_transcript = "hello".to_string();

        ctx.apply(TurnResult::new(ConversationState::Speaking, updated))
            .unwrap();

        assert_eq!(ctx.current_state, ConversationState::Speaking);
        assert_eq!(ctx.last_transcript, "hello");
    }

    #[test]
    fn apply_rejects_illegal_transition() {
        let mut ctx = context(2, false);
        let updated = ctx.clone();
        let err = ctx
            .apply(TurnResult::new(ConversationState::Waiting, updated))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(ctx.current_state, ConversationState::Listening);
    }

    #[test]
    fn apply_rejects_stop_before_target() {
        let mut ctx = context(4, false);
        ctx.current_state = ConversationState::Speaking;
        let mut updated = ctx.clone();
        updated.cycles_completed = 1;

        let err = ctx
            .apply(TurnResult::new(ConversationState::Stopped, updated))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn stop_forces_terminal_state() {
        let mut ctx = context(4, true);
        ctx.current_state = ConversationState::Waiting;
        ctx.stop();
        assert!(ctx.current_state.is_terminal());
    }
}
