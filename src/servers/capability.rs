//! Capability-only server: advertises the math tools without executing
//! them. Every invocation fails with a redirect naming the server that
//! can actually run the calculation.

use crate::servers::math::BinaryOp;
use crate::servers::MathServer;
use crate::tools::{Tool, ToolRegistry};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Human-readable label describing the server category.
pub const CATEGORY: &str = "Capability Discovery / Tool Registration";

/// Identifier advertised in the server manifest.
pub const SERVER_NAME: &str = "math-capability-registry";

const INSTRUCTIONS: &str = "The math capability registry demonstrates the discovery pattern. \
     Inspect the manifest to learn which arithmetic tools exist before \
     calling into the execution-focused servers in this package.";

fn redirect_message(tool_name: &str) -> String {
    format!(
        "This server only exposes tool metadata for educational purposes. \
         Use the {} server to actually execute '{}'.",
        super::data::SERVER_NAME,
        tool_name
    )
}

#[derive(Debug)]
struct CapabilityMathTool {
    op: BinaryOp,
}

impl CapabilityMathTool {
    fn tool_name(&self) -> &'static str {
        match self.op {
            BinaryOp::Addition => "math_add",
            BinaryOp::Subtraction => "math_subtract",
            BinaryOp::Multiplication => "math_multiply",
            BinaryOp::Division => "math_divide",
        }
    }
}

#[async_trait]
impl Tool for CapabilityMathTool {
    fn name(&self) -> &str {
        self.tool_name()
    }

    fn description(&self) -> &str {
        match self.op {
            BinaryOp::Addition => {
                "Advertise how to sum two floats. Call the math-data-provider server \
                 with the same parameters to execute the calculation."
            }
            BinaryOp::Subtraction => {
                "Return metadata for subtracting the subtrahend from the minuend."
            }
            BinaryOp::Multiplication => "Document how to multiply two factors.",
            BinaryOp::Division => "Explain how to divide a dividend by a non-zero divisor.",
        }
    }

    fn parameters_schema(&self) -> Value {
        self.op.schema()
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        Err(AppError::NotExecutable(redirect_message(self.tool_name())))
    }
}

/// Build the capability-only server.
pub fn build_server() -> Result<MathServer> {
    let mut tools = ToolRegistry::new();
    for op in BinaryOp::ALL {
        tools.register(Arc::new(CapabilityMathTool { op }))?;
    }
    Ok(MathServer::new(SERVER_NAME, INSTRUCTIONS, tools))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_every_tool_refuses_execution() {
        let server = build_server().unwrap();
        assert_eq!(server.tools().len(), 4);

        for name in server.tools().tool_names() {
            let err = server
                .tools()
                .execute(name, json!({ "augend": 1.0, "addend": 2.0 }))
                .await
                .unwrap_err();
            match err {
                AppError::NotExecutable(msg) => {
                    assert!(msg.contains("math-data-provider"));
                    assert!(msg.contains(name));
                }
                other => panic!("expected NotExecutable, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_manifest_matches_data_provider_names() {
        let server = build_server().unwrap();
        assert_eq!(
            server.tools().tool_names(),
            vec!["math_add", "math_subtract", "math_multiply", "math_divide"]
        );
    }
}
