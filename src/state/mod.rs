//! State management module
//!
//! This module handles conversation state and its persistence

pub mod context;
pub mod storage;

// Re-export commonly used state components
pub use context::{ConversationContext, RESERVATION_SLOT, USER_PROFILE_SLOT};
pub use storage::{MemoryStateStore, RedisStateStore, StateStore};
