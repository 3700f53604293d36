//! Per-run user and conversation identifiers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_USER_PREFIX: &str = "test_user";
pub const DEFAULT_CONVERSATION_PREFIX: &str = "test_conversation";

/// Identifiers that tie a probe run's turns and queries together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIds {
    pub user_id: String,
    pub conversation_id: String,
}

impl SessionIds {
    pub fn new(user_id: impl Into<String>, conversation_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            conversation_id: conversation_id.into(),
        }
    }

    /// Fresh ids of the form `{prefix}_{8 hex chars}`
    pub fn generate(user_prefix: &str, conversation_prefix: &str) -> Self {
        Self {
            user_id: suffixed(user_prefix),
            conversation_id: suffixed(conversation_prefix),
        }
    }

    /// Conversation id of a side conversation, e.g. `..._evolution`
    pub fn derived_conversation(&self, suffix: &str) -> String {
        format!("{}_{}", self.conversation_id, suffix)
    }
}

impl Default for SessionIds {
    fn default() -> Self {
        Self::generate(DEFAULT_USER_PREFIX, DEFAULT_CONVERSATION_PREFIX)
    }
}

fn suffixed(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..8])
}
