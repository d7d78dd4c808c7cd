//! Shared arithmetic core used by every server variant.
//!
//! All four demo servers wrap the same fixed-arity float operations; this
//! module owns the operation table, the operand vocabulary, and the JSON
//! schema each variant advertises.

use crate::types::{AppError, Result};
use serde_json::{json, Map, Value};

/// One of the four binary arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// augend + addend
    Addition,
    /// minuend - subtrahend
    Subtraction,
    /// multiplicand * multiplier
    Multiplication,
    /// dividend / divisor
    Division,
}

impl BinaryOp {
    /// All operations, in the order servers register them.
    pub const ALL: [BinaryOp; 4] = [
        BinaryOp::Addition,
        BinaryOp::Subtraction,
        BinaryOp::Multiplication,
        BinaryOp::Division,
    ];

    /// Operation slug used in result payloads (`addition`, ...).
    pub fn slug(self) -> &'static str {
        match self {
            BinaryOp::Addition => "addition",
            BinaryOp::Subtraction => "subtraction",
            BinaryOp::Multiplication => "multiplication",
            BinaryOp::Division => "division",
        }
    }

    /// Imperative verb used in REPL commands (`add 2 3`).
    pub fn verb(self) -> &'static str {
        match self {
            BinaryOp::Addition => "add",
            BinaryOp::Subtraction => "subtract",
            BinaryOp::Multiplication => "multiply",
            BinaryOp::Division => "divide",
        }
    }

    /// Names of the left and right operands.
    pub fn operands(self) -> (&'static str, &'static str) {
        match self {
            BinaryOp::Addition => ("augend", "addend"),
            BinaryOp::Subtraction => ("minuend", "subtrahend"),
            BinaryOp::Multiplication => ("multiplicand", "multiplier"),
            BinaryOp::Division => ("dividend", "divisor"),
        }
    }

    /// Apply the operation. A zero divisor fails with `InvalidArgument`.
    pub fn apply(self, left: f64, right: f64) -> Result<f64> {
        match self {
            BinaryOp::Addition => Ok(left + right),
            BinaryOp::Subtraction => Ok(left - right),
            BinaryOp::Multiplication => Ok(left * right),
            BinaryOp::Division => {
                if right == 0.0 {
                    Err(AppError::InvalidArgument(
                        "Divisor must be non-zero.".to_string(),
                    ))
                } else {
                    Ok(left / right)
                }
            }
        }
    }

    /// JSON schema advertised for this operation's arguments.
    pub fn schema(self) -> Value {
        let (left, right) = self.operands();
        let mut properties = Map::new();
        properties.insert(left.to_string(), json!({ "type": "number" }));
        properties.insert(right.to_string(), json!({ "type": "number" }));
        json!({
            "type": "object",
            "properties": properties,
            "required": [left, right],
        })
    }

    /// Extract this operation's named operands from a tool argument object.
    pub fn parse_args(self, args: &Value) -> Result<(f64, f64)> {
        let (left_name, right_name) = self.operands();
        let left = number_arg(args, left_name)?;
        let right = number_arg(args, right_name)?;
        Ok((left, right))
    }

    /// Build the argument object `{left_name: left, right_name: right}`.
    pub fn build_args(self, left: f64, right: f64) -> Value {
        let (left_name, right_name) = self.operands();
        let mut args = Map::new();
        args.insert(left_name.to_string(), json!(left));
        args.insert(right_name.to_string(), json!(right));
        Value::Object(args)
    }
}

fn number_arg(args: &Value, name: &str) -> Result<f64> {
    args.get(name)
        .and_then(Value::as_f64)
        .ok_or_else(|| AppError::InvalidArgument(format!("missing numeric argument '{}'", name)))
}
