//! Terminal report summarizing a finished conversation run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::conversation::ConversationState;
use crate::value_objects::{CycleTarget, RunId};

/// A collaborator failure that was swallowed and replaced by a fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFailure {
    /// State whose handler fell back
    pub state: ConversationState,
    /// One-based cycle the failure happened in
    pub cycle: u64,
    /// Rendered collaborator error
    pub message: String,
}

/// Structured result of a conversation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalReport {
    /// Identifier of the run
    pub run_id: RunId,
    /// State the run ended in
    pub final_state: ConversationState,
    /// Completed listening/speaking pairs
    pub cycles_completed: u64,
    /// Normalized target the run aimed for
    pub target_cycles: CycleTarget,
    /// Whether the requested cycle count was adjusted by normalization
    pub cycles_adjusted: bool,
    /// Every state visited, in order, ending with the terminal state
    pub visited: Vec<ConversationState>,
    /// Collaborator failures replaced by fallbacks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<TurnFailure>,
    /// Whether the run was stopped by cancellation
    #[serde(default)]
    pub cancelled: bool,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run reached the terminal state
    pub finished_at: DateTime<Utc>,
}

impl TerminalReport {
    /// Start an empty report for a new run
    #[must_use]
    pub fn begin(run_id: RunId, target_cycles: CycleTarget, cycles_adjusted: bool) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            final_state: ConversationState::Stopped,
            cycles_completed: 0,
            target_cycles,
            cycles_adjusted,
            visited: Vec::new(),
            failures: Vec::new(),
            cancelled: false,
            started_at: now,
            finished_at: now,
        }
    }

    /// Record a visited state
    pub fn visit(&mut self, state: ConversationState) {
        self.visited.push(state);
    }

    /// Record a swallowed collaborator failure
    pub fn record_failure(
        &mut self,
        state: ConversationState,
        cycle: u64,
        message: impl Into<String>,
    ) {
        self.failures.push(TurnFailure {
            state,
            cycle,
            message: message.into(),
        });
    }

    /// Close the report once the run has stopped
    pub fn finish(&mut self, final_state: ConversationState, cycles_completed: u64) {
        self.final_state = final_state;
        self.cycles_completed = cycles_completed;
        self.finished_at = Utc::now();
    }

    /// Whether every targeted cycle ran
    #[must_use]
    pub fn reached_target(&self) -> bool {
        self.cycles_completed == self.target_cycles.get()
    }

    /// Whether any turn fell back after a collaborator failure
    #[must_use]
    pub fn had_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Wall-clock duration of the run in milliseconds
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> TerminalReport {
        TerminalReport::begin(RunId::new(), CycleTarget::try_new(2).unwrap(), false)
    }

    #[test]
    fn begin_is_empty() {
        let report = report();
        assert!(report.visited.is_empty());
        assert!(!report.had_failures());
        assert!(!report.cancelled);
        assert_eq!(report.cycles_completed, 0);
    }

    #[test]
    fn finish_records_final_state_and_cycles() {
        let mut report = report();
        report.visit(ConversationState::Listening);
        report.visit(ConversationState::Speaking);
        report.finish(ConversationState::Stopped, 2);

        assert_eq!(report.final_state, ConversationState::Stopped);
        assert!(report.reached_target());
        assert!(report.finished_at >= report.started_at);
        assert!(report.elapsed_ms() >= 0);
    }

    #[test]
    fn failures_are_kept_in_order() {
        let mut report = report();
        report.record_failure(ConversationState::Listening, 1, "mic unplugged");
        report.record_failure(ConversationState::Speaking, 2, "no speaker");

        assert!(report.had_failures());
        assert_eq!(report.failures[0].state, ConversationState::Listening);
        assert_eq!(report.failures[1].cycle, 2);
    }

    #[test]
    fn serializes_without_empty_failures() {
        let mut report = report();
        report.visit(ConversationState::Listening);
        let json = serde_json::to_value(&report).unwrap();

        assert!(json.get("failures").is_none());
        assert_eq!(json["visited"][0], "listening");
        assert_eq!(json["target_cycles"], 2);
    }
}
