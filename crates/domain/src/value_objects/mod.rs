//! Value Objects - Immutable, identity-less domain primitives

mod cycle_target;
mod run_id;

pub use cycle_target::{CycleTarget, DEFAULT_CYCLES, MIN_CYCLES, NormalizedCycles};
pub use run_id::RunId;
