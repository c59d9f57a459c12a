//! Conversation state persistence
//!
//! The engine reads and writes conversation contexts through the `StateStore`
//! seam. The redis implementation handles serialization, TTL from context
//! expiry, and eviction of expired contexts on load; the in-memory
//! implementation backs tests and the console binary.

use std::collections::HashMap;
use std::sync::Arc;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, warn, error};
use crate::config::RedisConfig;
use crate::utils::errors::Result;
use super::context::ConversationContext;

/// External key-value store for conversation contexts
#[async_trait::async_trait]
pub trait StateStore: Send + Sync {
    /// Load the context for a conversation, if one exists and has not expired
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationContext>>;

    /// Persist a context
    async fn save(&self, context: &ConversationContext) -> Result<()>;

    /// Delete the context for a conversation
    async fn delete(&self, conversation_id: &str) -> Result<()>;

    /// Check whether a context exists
    async fn exists(&self, conversation_id: &str) -> Result<bool>;
}

/// Redis-backed state store
#[derive(Clone)]
pub struct RedisStateStore {
    connection_manager: redis::aio::ConnectionManager,
    config: RedisConfig,
}

impl RedisStateStore {
    /// Create a new redis state store
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Test the redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn context_key(&self, conversation_id: &str) -> String {
        format!("{}context:{}", self.config.prefix, conversation_id)
    }
}

#[async_trait::async_trait]
impl StateStore for RedisStateStore {
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationContext>> {
        let key = self.context_key(conversation_id);
        debug!(conversation_id = conversation_id, key = %key, "Loading context from redis");

        let mut conn = self.connection_manager.clone();
        let serialized: Option<String> = conn.get(&key).await.map_err(|e| {
            error!(conversation_id = conversation_id, error = %e, "Failed to get context from redis");
            e
        })?;

        match serialized {
            Some(data) => {
                let context: ConversationContext = serde_json::from_str(&data).map_err(|e| {
                    error!(conversation_id = conversation_id, error = %e, "Failed to deserialize context");
                    e
                })?;

                if context.is_expired() {
                    warn!(conversation_id = conversation_id, expires_at = ?context.expires_at,
                          "Context has expired, removing");
                    self.delete(conversation_id).await?;
                    return Ok(None);
                }

                debug!(conversation_id = conversation_id, dialog = ?context.dialog,
                       step = ?context.step, "Context loaded");
                Ok(Some(context))
            }
            None => {
                debug!(conversation_id = conversation_id, "No context found in redis");
                Ok(None)
            }
        }
    }

    async fn save(&self, context: &ConversationContext) -> Result<()> {
        let key = self.context_key(&context.conversation_id);
        debug!(conversation_id = %context.conversation_id, key = %key,
               dialog = ?context.dialog, step = ?context.step, "Saving context to redis");

        let serialized = serde_json::to_string(context).map_err(|e| {
            error!(conversation_id = %context.conversation_id, error = %e, "Failed to serialize context");
            e
        })?;

        // TTL tracks the context expiry, with a floor of one minute
        let ttl_seconds = if let Some(expires_at) = context.expires_at {
            let duration = expires_at - chrono::Utc::now();
            std::cmp::max(duration.num_seconds(), 60) as u64
        } else {
            self.config.ttl_seconds
        };

        let mut conn = self.connection_manager.clone();
        conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await.map_err(|e| {
            error!(conversation_id = %context.conversation_id, error = %e, "Failed to save context to redis");
            e
        })?;

        debug!(conversation_id = %context.conversation_id, ttl_seconds = ttl_seconds, "Context saved");
        Ok(())
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        let key = self.context_key(conversation_id);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        debug!(conversation_id = conversation_id, deleted = deleted > 0, "Context delete");

        Ok(())
    }

    async fn exists(&self, conversation_id: &str) -> Result<bool> {
        let key = self.context_key(conversation_id);
        let mut conn = self.connection_manager.clone();

        let exists: bool = conn.exists(&key).await?;
        Ok(exists)
    }
}

impl std::fmt::Debug for RedisStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStateStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// In-memory state store for tests and the console binary
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    contexts: Arc<RwLock<HashMap<String, ConversationContext>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationContext>> {
        let context = {
            let contexts = self.contexts.read().await;
            contexts.get(conversation_id).cloned()
        };

        match context {
            Some(context) if context.is_expired() => {
                self.delete(conversation_id).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn save(&self, context: &ConversationContext) -> Result<()> {
        let mut contexts = self.contexts.write().await;
        contexts.insert(context.conversation_id.clone(), context.clone());
        Ok(())
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        let mut contexts = self.contexts.write().await;
        contexts.remove(conversation_id);
        Ok(())
    }

    async fn exists(&self, conversation_id: &str) -> Result<bool> {
        let contexts = self.contexts.read().await;
        Ok(contexts.contains_key(conversation_id))
    }
}
