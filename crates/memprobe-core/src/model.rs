//! Wire types exchanged with the conversation memory service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    /// Message written by the user
    Human,
    /// Message produced by the assistant
    Ai,
}

impl TurnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnKind::Human => "human",
            TurnKind::Ai => "ai",
        }
    }
}

impl std::fmt::Display for TurnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TurnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(TurnKind::Human),
            "ai" => Ok(TurnKind::Ai),
            other => Err(format!("unknown turn kind '{}', expected human or ai", other)),
        }
    }
}

/// One message posted to `POST /conversation/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_id: String,
    pub conversation_id: String,
    #[serde(rename = "type")]
    pub kind: TurnKind,
    pub text: String,
    #[serde(with = "iso_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Build a turn stamped with the current UTC time
    pub fn now(
        user_id: impl Into<String>,
        conversation_id: impl Into<String>,
        kind: TurnKind,
        text: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            conversation_id: conversation_id.into(),
            kind,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Response body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// Any other fields the service reports, kept for display
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            extra: Map::new(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Whatever the service echoes back after storing a turn
pub type CreatedRecord = Value;

/// Response body of `GET /retrieve_memory/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRetrieval {
    #[serde(default)]
    pub conversation_summary: Option<String>,
    #[serde(default)]
    pub similar_memories: SimilarMemories,
}

/// Ranked memories, or a payload of some other shape kept verbatim
///
/// Any JSON array is `Ranked`, whatever its entries look like.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SimilarMemories {
    Ranked(Vec<SimilarMemory>),
    Other(Value),
}

impl Default for SimilarMemories {
    fn default() -> Self {
        SimilarMemories::Ranked(Vec::new())
    }
}

impl<'de> Deserialize<'de> for SimilarMemories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => {
                SimilarMemories::Ranked(items.into_iter().map(SimilarMemory::from_value).collect())
            }
            other => SimilarMemories::Other(other),
        })
    }
}

impl SimilarMemories {
    /// Ranked entries, empty when the payload had another shape
    pub fn ranked(&self) -> &[SimilarMemory] {
        match self {
            SimilarMemories::Ranked(memories) => memories,
            SimilarMemories::Other(_) => &[],
        }
    }
}

/// A single past memory matched by a retrieval query
///
/// Fields hold the JSON the service sent so that unexpected types
/// (a textual importance, a structured content) still display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarMemory {
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub summary: Option<Value>,
    #[serde(default)]
    pub importance: Option<Value>,
    #[serde(default)]
    pub similarity: Option<Value>,
}

impl SimilarMemory {
    /// Build from one array entry; a non-object entry becomes the content
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => Self {
                content: fields.remove("content"),
                summary: fields.remove("summary"),
                importance: fields.remove("importance"),
                similarity: fields.remove("similarity"),
            },
            other => Self {
                content: Some(other),
                ..Self::default()
            },
        }
    }

    /// Similarity as a number, when the service sent one
    pub fn similarity_score(&self) -> Option<f64> {
        self.similarity.as_ref().and_then(Value::as_f64)
    }
}

/// ISO-8601 with microseconds and an explicit `+00:00` offset
pub mod iso_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, false)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
