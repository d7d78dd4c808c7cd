//! Prompt-returning server: pairs each math result with a suggested
//! follow-up prompt the model can immediately run.

use crate::servers::data::compute_response;
use crate::servers::math::BinaryOp;
use crate::servers::MathServer;
use crate::tools::{Tool, ToolRegistry};
use crate::types::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Human-readable label used for prompt-returning servers.
pub const CATEGORY: &str = "Prompt-Returning / Co-Reasoning";

/// Server identifier advertised to clients.
pub const SERVER_NAME: &str = "math-prompt-helper";

const INSTRUCTIONS: &str = "Demonstrates prompt-returning responses by pairing math results with \
     a suggested follow-up prompt the model can immediately run.";

/// Structured payload returned by prompt-enhanced math tools.
#[derive(Debug, Clone, Serialize)]
pub struct PromptedResult {
    /// Operation slug describing the math action.
    pub operation: String,
    /// Numeric inputs consumed by the operation.
    pub inputs: Value,
    /// Numeric result computed by the operation.
    pub result: f64,
    /// Suggested prompt fragment for downstream reasoning.
    pub next_prompt: String,
}

/// Deterministic follow-up prompt embedding the operation, inputs, and
/// result.
fn build_prompt(operation: &str, inputs: &Value, answer: f64) -> String {
    format!(
        "The {} result is {}. Inputs: {}. \
         Incorporate this numeric value into your next reasoning step. \
         If the user asked a follow-up, restate the interpreted question before responding.",
        operation, answer, inputs
    )
}

#[derive(Debug)]
struct PromptMathTool {
    op: BinaryOp,
}

#[async_trait]
impl Tool for PromptMathTool {
    fn name(&self) -> &str {
        match self.op {
            BinaryOp::Addition => "math_add_with_prompt",
            BinaryOp::Subtraction => "math_subtract_with_prompt",
            BinaryOp::Multiplication => "math_multiply_with_prompt",
            BinaryOp::Division => "math_divide_with_prompt",
        }
    }

    fn description(&self) -> &str {
        match self.op {
            BinaryOp::Addition => "Return addition data plus a suggested follow-up prompt.",
            BinaryOp::Subtraction => "Return subtraction data plus a suggested follow-up prompt.",
            BinaryOp::Multiplication => {
                "Return multiplication data plus a suggested follow-up prompt."
            }
            BinaryOp::Division => "Return division data plus a suggested follow-up prompt.",
        }
    }

    fn parameters_schema(&self) -> Value {
        self.op.schema()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let data = compute_response(self.op, &args)?;
        let next_prompt = build_prompt(&data.operation, &data.inputs, data.result);
        let response = PromptedResult {
            operation: data.operation,
            inputs: data.inputs,
            result: data.result,
            next_prompt,
        };
        Ok(json!(response))
    }
}

/// Build the prompt-returning server.
pub fn build_server() -> Result<MathServer> {
    let mut tools = ToolRegistry::new();
    for op in BinaryOp::ALL {
        tools.register(Arc::new(PromptMathTool { op }))?;
    }
    Ok(MathServer::new(SERVER_NAME, INSTRUCTIONS, tools))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppError;
    use serde_json::json;

    #[tokio::test]
    async fn test_division_with_prompt() {
        let server = build_server().unwrap();
        let payload = server
            .tools()
            .execute(
                "math_divide_with_prompt",
                json!({ "dividend": 12.0, "divisor": 3.0 }),
            )
            .await
            .unwrap();

        assert_eq!(payload["result"], 4.0);
        let next_prompt = payload["next_prompt"].as_str().unwrap();
        assert!(next_prompt.contains('4'));
        assert!(next_prompt.contains("division"));
    }

    #[tokio::test]
    async fn test_prompt_embeds_inputs() {
        let server = build_server().unwrap();
        let payload = server
            .tools()
            .execute(
                "math_add_with_prompt",
                json!({ "augend": 5.0, "addend": 11.0 }),
            )
            .await
            .unwrap();

        assert_eq!(payload["result"], 16.0);
        let next_prompt = payload["next_prompt"].as_str().unwrap();
        assert!(next_prompt.contains("augend"));
        assert!(next_prompt.contains("16"));
    }

    #[tokio::test]
    async fn test_zero_divisor_still_fails() {
        let server = build_server().unwrap();
        let err = server
            .tools()
            .execute(
                "math_divide_with_prompt",
                json!({ "dividend": 1.0, "divisor": 0.0 }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}
