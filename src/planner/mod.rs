//! LLM-driven planner that routes natural language to registered tools.
//!
//! Each call to [`Planner::run`] is a fresh traversal of a small state
//! machine: ask the model for a decision, then either relay its message
//! or execute exactly one tool and force a final textual summary. The
//! planner validates the model against a closed world: it can only invoke
//! tools it was offered, and it cannot chain a second tool call within
//! the same turn.

use crate::llm::{ChatGateway, GatewayConfig};
use crate::tools::ToolRegistry;
use crate::types::{AppError, ChatMessage, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Instruction template conveying the allowed JSON schema to the planner
/// model. `{manifest}` is replaced with the rendered tool manifest.
const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are a planner sitting between a user and a set of tools.
You must ALWAYS respond with JSON that matches exactly this schema and nothing else:
{
  "action": "respond" | "call_tool",
  "message": string (required when action == "respond"),
  "tool_name": string (required when action == "call_tool"),
  "arguments": object (required when action == "call_tool")
}

Available tools:
{manifest}

Rules:
- Respond with a single JSON object with no surrounding prose or Markdown fences.
- Only call tools listed above.
- When calling a tool, supply exactly the JSON arguments the tool expects.
- If no tool is needed, reply with action "respond" and a helpful natural-language message.
- Never output additional prose outside the JSON object.
"#;

/// Structured instruction parsed from one planner model reply.
///
/// Transient: constructed from one gateway response, consumed
/// immediately, discarded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlannerDecision {
    /// Planner directive, `respond` or `call_tool`.
    pub action: Option<String>,
    /// User-facing response text when `action` is `respond`.
    pub message: Option<String>,
    /// Tool to invoke when `action` is `call_tool`.
    pub tool_name: Option<String>,
    /// JSON arguments to forward to the requested tool.
    pub arguments: Option<Value>,
    /// Unmodified model reply, kept for auditing.
    #[serde(skip)]
    pub raw_response: String,
}

/// Final planner outcome combining tool activity and user-facing text.
///
/// Exactly one of "no tool used" (`tool_name` absent) or "tool used with
/// result" (`tool_name`, `arguments`, and `tool_result` all present)
/// holds.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct PlannerResult {
    /// Text that should be relayed to the user.
    pub message: String,
    /// Tool invoked during planning, if any.
    pub tool_name: Option<String>,
    /// Arguments that were supplied to the invoked tool.
    pub arguments: Option<Value>,
    /// Payload returned by the tool invocation.
    pub tool_result: Option<Value>,
    /// Raw JSON emitted by the final planner decision.
    pub raw_response: Option<String>,
}

/// Planner that uses the remote reasoning gateway to decide tool usage.
pub struct Planner {
    gateway: Box<dyn ChatGateway>,
    tools: Arc<ToolRegistry>,
    system_prompt: String,
}

impl Planner {
    /// Create a planner over a gateway and a tool registry. The manifest
    /// shown to the model is rendered once, in registry insertion order.
    pub fn new(gateway: Box<dyn ChatGateway>, tools: Arc<ToolRegistry>) -> Self {
        let manifest = format_manifest(&tools);
        let system_prompt = SYSTEM_PROMPT_TEMPLATE.replace("{manifest}", &manifest);
        Self {
            gateway,
            tools,
            system_prompt,
        }
    }

    /// True when a gateway credential is present in the environment.
    pub fn is_available() -> bool {
        GatewayConfig::is_available()
    }

    /// The model identifier this planner plans with.
    pub fn model_name(&self) -> &str {
        self.gateway.model_name()
    }

    /// Produce a planner result from free-form user text.
    ///
    /// One of: a direct textual reply, or a single tool invocation
    /// followed by a forced textual summary. No state persists across
    /// calls.
    pub async fn run(&self, user_input: &str) -> Result<PlannerResult> {
        let decision = self.decide(user_input).await?;

        match decision.action.as_deref() {
            Some("respond") => {
                let message = decision
                    .message
                    .filter(|m| !m.is_empty())
                    .ok_or_else(|| {
                        AppError::Planner(
                            "Planner returned action 'respond' without a message.".to_string(),
                        )
                    })?;
                Ok(PlannerResult {
                    message,
                    raw_response: Some(decision.raw_response),
                    ..Default::default()
                })
            }
            Some("call_tool") => {
                let (tool_name, arguments) = match (decision.tool_name, decision.arguments) {
                    (Some(name), Some(args)) if !name.is_empty() && args.is_object() => {
                        (name, args)
                    }
                    _ => {
                        return Err(AppError::Planner(
                            "Planner requested a tool call but did not provide name or arguments."
                                .to_string(),
                        ))
                    }
                };

                // Closed world: never execute a tool the model was not offered.
                if !self.tools.has_tool(&tool_name) {
                    return Err(AppError::Planner(format!(
                        "Planner referenced unknown tool '{}'.",
                        tool_name
                    )));
                }

                tracing::debug!(tool = %tool_name, "planner requested tool call");
                let payload = self.tools.execute(&tool_name, arguments.clone()).await?;

                let (message, raw_response) = self
                    .summarize_with_tool(user_input, &tool_name, &arguments, &payload)
                    .await?;

                Ok(PlannerResult {
                    message,
                    tool_name: Some(tool_name),
                    arguments: Some(arguments),
                    tool_result: Some(payload),
                    raw_response: Some(raw_response),
                })
            }
            other => Err(AppError::Planner(format!(
                "Unknown planner action '{}'.",
                other.unwrap_or("<missing>")
            ))),
        }
    }

    /// Request the initial decision for one user utterance.
    async fn decide(&self, user_input: &str) -> Result<PlannerDecision> {
        let messages = [
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(user_input),
        ];
        let content = self.gateway.complete(&messages).await?;
        parse_decision(&content)
    }

    /// Second gateway round: ask the model to phrase the outcome of the
    /// completed tool call. A further `call_tool` decision fails the turn;
    /// the design enforces exactly one tool call per user turn.
    async fn summarize_with_tool(
        &self,
        user_input: &str,
        tool_name: &str,
        arguments: &Value,
        payload: &Value,
    ) -> Result<(String, String)> {
        let call_echo = json!({
            "action": "call_tool",
            "tool_name": tool_name,
            "arguments": arguments,
        });
        let tool_summary = json!({
            "tool_name": tool_name,
            "arguments": arguments,
            "result": payload,
        });
        let messages = [
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(user_input),
            ChatMessage::assistant(call_echo.to_string()),
            ChatMessage::user(format!(
                "Tool call completed. Use the result below to respond to the user \
                 and DO NOT call another tool.\nResult: {}",
                tool_summary
            )),
        ];

        let content = self.gateway.complete(&messages).await?;
        let decision = parse_decision(&content)?;

        match (decision.action.as_deref(), decision.message) {
            (Some("respond"), Some(message)) if !message.is_empty() => {
                Ok((message, decision.raw_response))
            }
            _ => Err(AppError::Planner(
                "Planner failed to provide a final response after tool execution.".to_string(),
            )),
        }
    }
}

/// Render the human-readable tool manifest embedded in the system prompt,
/// in registry insertion order.
pub fn format_manifest(tools: &ToolRegistry) -> String {
    tools
        .iter()
        .map(|tool| {
            format!(
                "- {}: {}\n  Parameters: {}",
                tool.name(),
                tool.description(),
                tool.parameters_schema()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip a fenced code block wrapper, tolerating the `json` language tag.
/// Models routinely wrap JSON in Markdown fences despite instructions;
/// stripping them does not weaken the schema requirement.
fn strip_code_fences(content: &str) -> String {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let mut inner = trimmed.trim_matches('`').trim();
    if let Some(rest) = inner.strip_prefix("json") {
        inner = rest.trim_start();
    }
    inner.to_string()
}

/// Decode one model reply into a [`PlannerDecision`].
fn parse_decision(content: &str) -> Result<PlannerDecision> {
    let sanitized = strip_code_fences(content);
    let mut decision: PlannerDecision =
        serde_json::from_str(&sanitized).map_err(|_| AppError::MalformedPlannerResponse {
            raw: content.to_string(),
        })?;
    decision.raw_response = content.to_string();
    Ok(decision)
}
