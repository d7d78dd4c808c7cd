//! Data-providing server: executes the math tools and returns structured
//! JSON payloads other agents can reason over.

use crate::servers::math::BinaryOp;
use crate::servers::MathServer;
use crate::tools::{Tool, ToolRegistry};
use crate::types::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Human-readable label used in documentation and manifests.
pub const CATEGORY: &str = "Data-Providing / Context-Enriching";

/// Server identifier exposed to clients.
pub const SERVER_NAME: &str = "math-data-provider";

const INSTRUCTIONS: &str = "Executes arithmetic operations and returns structured JSON payloads \
     that other agents can reason over.";

/// Structured payload returned by every math tool on this server.
#[derive(Debug, Clone, Serialize)]
pub struct MathResult {
    /// Name of the arithmetic operation that was executed.
    pub operation: String,
    /// Object describing the numeric inputs used.
    pub inputs: Value,
    /// Computed numeric result.
    pub result: f64,
}

/// Run the operation and wrap its output with metadata.
pub(crate) fn compute_response(op: BinaryOp, args: &Value) -> Result<MathResult> {
    let (left, right) = op.parse_args(args)?;
    let result = op.apply(left, right)?;
    Ok(MathResult {
        operation: op.slug().to_string(),
        inputs: op.build_args(left, right),
        result,
    })
}

#[derive(Debug)]
struct DataMathTool {
    op: BinaryOp,
}

#[async_trait]
impl Tool for DataMathTool {
    fn name(&self) -> &str {
        match self.op {
            BinaryOp::Addition => "math_add",
            BinaryOp::Subtraction => "math_subtract",
            BinaryOp::Multiplication => "math_multiply",
            BinaryOp::Division => "math_divide",
        }
    }

    fn description(&self) -> &str {
        match self.op {
            BinaryOp::Addition => "Return the sum of augend and addend as structured data.",
            BinaryOp::Subtraction => "Return minuend - subtrahend as structured data.",
            BinaryOp::Multiplication => "Return multiplicand * multiplier as structured data.",
            BinaryOp::Division => "Return dividend / divisor as structured data.",
        }
    }

    fn parameters_schema(&self) -> Value {
        self.op.schema()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let response = compute_response(self.op, &args)?;
        Ok(json!(response))
    }
}

/// Build the data-providing server.
pub fn build_server() -> Result<MathServer> {
    let mut tools = ToolRegistry::new();
    for op in BinaryOp::ALL {
        tools.register(Arc::new(DataMathTool { op }))?;
    }
    Ok(MathServer::new(SERVER_NAME, INSTRUCTIONS, tools))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppError;
    use serde_json::json;

    #[tokio::test]
    async fn test_addition_payload() {
        let server = build_server().unwrap();
        let payload = server
            .tools()
            .execute("math_add", json!({ "augend": 2.0, "addend": 3.0 }))
            .await
            .unwrap();

        assert_eq!(payload["operation"], "addition");
        assert_eq!(payload["inputs"]["augend"], 2.0);
        assert_eq!(payload["inputs"]["addend"], 3.0);
        assert_eq!(payload["result"], 5.0);
    }

    #[tokio::test]
    async fn test_division_by_zero_fails() {
        let server = build_server().unwrap();
        let err = server
            .tools()
            .execute("math_divide", json!({ "dividend": 1.0, "divisor": 0.0 }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_division_returns_quotient() {
        let server = build_server().unwrap();
        let payload = server
            .tools()
            .execute("math_divide", json!({ "dividend": 12.0, "divisor": 3.0 }))
            .await
            .unwrap();
        assert_eq!(payload["result"], 4.0);
    }
}
