//! memprobe-core - Client side of a conversation memory service
//!
//! The service stores conversation turns per user and answers retrieval
//! queries with a synthesized summary plus ranked similar memories. This
//! crate provides:
//!
//! - **Model**: wire types for turns, health and retrieval responses
//! - **Client**: a typed async client over the service's HTTP surface
//! - **Session**: generated user / conversation identifiers
//! - **Config**: RON configuration with environment overrides
//!
//! # Example
//!
//! ```rust,ignore
//! use memprobe_core::{ConversationTurn, MemoryClient, ProbeConfig, SessionIds, TurnKind};
//!
//! let config = ProbeConfig::default();
//! let client = MemoryClient::new(&config.base_url, config.timeout())?;
//! let ids = SessionIds::default();
//!
//! client.add_turn(&ConversationTurn::now(
//!     &ids.user_id,
//!     &ids.conversation_id,
//!     TurnKind::Human,
//!     "I prefer email over phone calls",
//! )).await?;
//!
//! let retrieval = client.retrieve_memory(&ids.user_id, "contact preferences").await?;
//! ```

mod client;
mod config;
mod error;
pub mod model;
mod session;

pub use client::MemoryClient;
pub use config::{ProbeConfig, ENV_BASE_URL, ENV_TIMEOUT_SECS, MAX_WAIT_SCALE};
pub use error::{ClientError, ConfigError, Result};
pub use model::{
    ConversationTurn, CreatedRecord, HealthStatus, MemoryRetrieval, SimilarMemories,
    SimilarMemory, TurnKind,
};
pub use session::{SessionIds, DEFAULT_CONVERSATION_PREFIX, DEFAULT_USER_PREFIX};
