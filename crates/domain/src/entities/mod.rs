//! Domain entities - Objects with identity and lifecycle

mod conversation;
mod terminal_report;

pub use conversation::{ConversationContext, ConversationState, TurnResult};
pub use terminal_report::{TerminalReport, TurnFailure};
