//! Core types shared across the crate: chat messages, tool definitions,
//! and the error taxonomy.

use serde::{Deserialize, Serialize};

// ============= Conversation Types =============

/// Role of a message in a gateway conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instruction message establishing the model's behavior.
    System,
    /// Message authored by the end user.
    User,
    /// Message authored by the model.
    Assistant,
}

/// One role-tagged message in an ordered gateway conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: Role,
    /// Plain-text content.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ============= Tool Types =============

/// Serializable description of a tool: name, human text, and the JSON
/// schema of its arguments. This is what manifests and prompt text are
/// rendered from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description shown to users and to the planner model.
    pub description: String,
    /// JSON Schema for the tool's arguments.
    pub parameters: serde_json::Value,
}

// ============= Error Types =============

/// Error taxonomy for the crate.
///
/// Local, deterministic failures (`UnknownTool`, `InvalidArgument`,
/// `NotExecutable`) are never retried. `Gateway` failures terminate the
/// turn except where a caller explicitly downgrades to a local fallback.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Requested tool name is not present in the registry.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A tool with the same name was already registered.
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// A tool rejected its arguments (e.g. zero divisor).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A capability-only tool was invoked; the message names the server
    /// that can actually execute it.
    #[error("Tool is not executable: {0}")]
    NotExecutable(String),

    /// Transport, timeout, or credential failure talking to the remote
    /// reasoning service.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// The planner model's reply did not decode as the decision schema.
    /// Carries the raw text for diagnosis.
    #[error("Planner response was not valid JSON: {raw}")]
    MalformedPlannerResponse {
        /// Unmodified reply text from the model.
        raw: String,
    },

    /// The planner model violated the decision contract (missing fields,
    /// unknown tool, or no summary after a tool call).
    #[error("Planner error: {0}")]
    Planner(String),

    /// Server blueprint lookup failed.
    #[error("Unknown server: {0}")]
    UnknownServer(String),

    /// Configuration or CLI usage error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::user("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));

        let system = serde_json::to_string(&ChatMessage::system("s")).unwrap();
        assert!(system.contains("\"role\":\"system\""));
        let assistant = serde_json::to_string(&ChatMessage::assistant("a")).unwrap();
        assert!(assistant.contains("\"role\":\"assistant\""));
    }

    #[test]
    fn test_tool_definition_round_trip() {
        let def = ToolDefinition {
            name: "math_add".to_string(),
            description: "Add two numbers".to_string(),
            parameters: serde_json::json!({"type": "object"}),
        };

        let json = serde_json::to_string(&def).unwrap();
        let back: ToolDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, def.name);
        assert_eq!(back.parameters, def.parameters);
    }

    #[test]
    fn test_error_display() {
        let err = AppError::UnknownTool("math_modulo".to_string());
        assert_eq!(err.to_string(), "Unknown tool: math_modulo");

        let err = AppError::MalformedPlannerResponse {
            raw: "not json".to_string(),
        };
        assert!(err.to_string().contains("not json"));
    }
}
