//! Error isolation around collaborator calls
//!
//! Recoverable collaborator failures are logged and handed back as a
//! fallback so the conversation keeps moving. Anything else propagates and
//! aborts the run.

use std::future::Future;

use domain::ConversationState;
use tracing::{error, warn};

use crate::error::ApplicationError;

/// Outcome of an isolated collaborator call
#[derive(Debug)]
pub enum Isolated<T> {
    /// The collaborator succeeded
    Completed(T),
    /// The collaborator failed recoverably; the handler must use its fallback
    Fallback(ApplicationError),
}

/// Run one collaborator call inside the isolation boundary
///
/// # Errors
/// Returns the collaborator's error unchanged when it is not recoverable.
pub async fn isolate<T, F>(
    state: ConversationState,
    cycle: u64,
    call: F,
) -> Result<Isolated<T>, ApplicationError>
where
    F: Future<Output = Result<T, ApplicationError>>,
{
    match call.await {
        Ok(value) => Ok(Isolated::Completed(value)),
        Err(err) if err.is_recoverable() => {
            warn!(state = %state, cycle, error = %err, "Collaborator failed, using fallback");
            Ok(Isolated::Fallback(err))
        },
        Err(err) => {
            error!(state = %state, cycle, error = %err, "Fatal error inside handler");
            Err(err)
        },
    }
}
