//! Turn dispatch module
//!
//! Per-turn orchestration: the interruption policy, the intent router and
//! the turn driver that ties them to the dialog flows and state store.

pub mod driver;
pub mod policy;
pub mod router;

// Re-export commonly used dispatch components
pub use driver::{suggested_queries, TurnDriver, TurnResponse, TurnStatus};
pub use policy::{InterruptionOutcome, InterruptionPolicy};
pub use router::{IntentRouter, RouteAction};
