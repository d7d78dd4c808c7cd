//! Autonomous reasoning server: delegates a whole word problem to the
//! remote gateway and degrades to a local heuristic when the gateway is
//! unavailable or fails.

use crate::llm::{ChatGateway, GatewayConfig, OpenAiGateway, DEFAULT_MODEL};
use crate::servers::MathServer;
use crate::tools::{Tool, ToolRegistry};
use crate::types::{AppError, ChatMessage, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Human-readable label for the autonomous reasoning server category.
pub const CATEGORY: &str = "Autonomous / Server-Side Reasoning";

/// Identifier advertised via the server manifest.
pub const SERVER_NAME: &str = "math-autonomous-reasoner";

/// Model label reported by heuristic answers.
pub const FALLBACK_MODEL: &str = "heuristic-fallback";

const INSTRUCTIONS: &str = "Delegates math reasoning to an internal gateway call and returns the \
     final answer plus reasoning steps. Falls back to a heuristic reasoner \
     if credentials are missing.";

const SYSTEM_PROMPT: &str = "You are an autonomous math tutor. Solve the user's problem step by step and \
     produce JSON with keys 'reasoning_steps' (list of short steps) and 'final_answer'. \
     Keep reasoning grounded in arithmetic and avoid prose outside the JSON.";

/// Where an answer came from; lets callers distinguish heuristic answers
/// from model-derived ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasonSource {
    /// Produced by the remote reasoning gateway.
    Gateway,
    /// Produced by the local heuristic fallback.
    Fallback,
}

/// Serialized result returned by the autonomous reasoning server.
#[derive(Debug, Clone, Serialize)]
pub struct AutonomousResult {
    /// Original user problem text.
    pub problem: String,
    /// Step-by-step reasoning summary.
    pub reasoning_steps: Vec<String>,
    /// Final answer reported to the user.
    pub final_answer: String,
    /// Model identifier that produced the response.
    pub model: String,
    /// Whether the answer came from the gateway or the fallback.
    pub source: ReasonSource,
}

/// Keyword table for the heuristic fallback. Matching is a substring
/// search over the lowercased problem, first match wins in declaration
/// order - the order is a behavioral contract, do not reorder.
const KEYWORD_TABLE: &[(&str, fn(f64, f64) -> f64)] = &[
    ("add", |a, b| a + b),
    ("plus", |a, b| a + b),
    ("sum", |a, b| a + b),
    ("subtract", |a, b| a - b),
    ("minus", |a, b| a - b),
    ("difference", |a, b| a - b),
    ("multiply", |a, b| a * b),
    ("times", |a, b| a * b),
    ("product", |a, b| a * b),
    ("divide", |a, b| if b == 0.0 { f64::INFINITY } else { a / b }),
    ("quotient", |a, b| if b == 0.0 { f64::INFINITY } else { a / b }),
];

/// Solve a word problem, preferring the gateway and degrading to the
/// heuristic fallback on any gateway failure. Never fails.
pub async fn solve(problem: &str, model: Option<&str>) -> AutonomousResult {
    if !GatewayConfig::is_available() {
        return fallback_reasoner(problem);
    }
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(_) => return fallback_reasoner(problem),
    };
    let mut config = config.with_temperature(0.1).with_max_tokens(400);
    if let Some(model) = model {
        config = config.with_model(model);
    }
    let gateway = OpenAiGateway::new(config);

    match gateway_reasoning(&gateway, problem).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "gateway reasoning failed; using heuristic fallback");
            fallback_reasoner(problem)
        }
    }
}

/// Ask the gateway for step-by-step reasoning as structured data.
///
/// A reply that fails to parse as JSON is not an error: the whole text
/// becomes a single reasoning step and the final answer.
pub async fn gateway_reasoning(
    gateway: &dyn ChatGateway,
    problem: &str,
) -> Result<AutonomousResult> {
    let messages = [
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Solve this math problem and respond with JSON only.\nProblem: {}",
            problem
        )),
    ];
    let raw = gateway.complete(&messages).await?;

    let (reasoning_steps, final_answer) = match serde_json::from_str::<Value>(&raw) {
        Ok(parsed) => {
            let steps: Vec<String> = parsed["reasoning_steps"]
                .as_array()
                .map(|items| items.iter().map(value_to_text).collect())
                .filter(|steps: &Vec<String>| !steps.is_empty())
                .unwrap_or_else(|| {
                    vec![parsed
                        .get("final_answer")
                        .map(value_to_text)
                        .unwrap_or_else(|| "Unknown".to_string())]
                });
            let answer = parsed
                .get("final_answer")
                .map(value_to_text)
                .or_else(|| steps.last().cloned())
                .unwrap_or_else(|| "Unknown".to_string());
            (steps, answer)
        }
        Err(_) => {
            let text = raw.trim().to_string();
            (vec![text.clone()], text)
        }
    };

    Ok(AutonomousResult {
        problem: problem.to_string(),
        reasoning_steps,
        final_answer,
        model: gateway.model_name().to_string(),
        source: ReasonSource::Gateway,
    })
}

/// Heuristic reasoning used when the gateway is unavailable.
///
/// Extracts numeric literals, scans the keyword table, and computes a
/// binary operation locally. Division by zero yields positive infinity so
/// the fallback never throws.
pub fn fallback_reasoner(problem: &str) -> AutonomousResult {
    let numbers = extract_numbers(problem);
    let lowered = problem.to_lowercase();

    let mut operation = "analysis";
    let mut result = None;
    if numbers.len() >= 2 {
        for &(keyword, compute) in KEYWORD_TABLE {
            if lowered.contains(keyword) {
                result = Some(compute(numbers[0], numbers[1]));
                operation = keyword;
                break;
            }
        }
    }

    let final_answer = match result {
        Some(value) => value.to_string(),
        None => "Unable to determine answer.".to_string(),
    };
    let reasoning_steps = vec![
        "Fallback reasoner engaged because the remote gateway was unavailable.".to_string(),
        format!("Identified operation '{}' using heuristic parsing.", operation),
        format!("Computed result: {}", final_answer),
    ];

    AutonomousResult {
        problem: problem.to_string(),
        reasoning_steps,
        final_answer,
        model: FALLBACK_MODEL.to_string(),
        source: ReasonSource::Fallback,
    }
}

fn extract_numbers(problem: &str) -> Vec<f64> {
    let Ok(re) = Regex::new(r"-?\d+(?:\.\d+)?") else {
        return Vec::new();
    };
    re.find_iter(problem)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug)]
struct SolveMathProblemTool;

#[async_trait]
impl Tool for SolveMathProblemTool {
    fn name(&self) -> &str {
        "solve_math_problem"
    }

    fn description(&self) -> &str {
        "Provide a natural language problem. The server reasons internally \
         via the remote gateway and returns the final answer with the \
         reasoning path."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "problem": {
                    "type": "string",
                    "description": "Natural-language math problem to solve"
                },
                "model": {
                    "type": "string",
                    "description": format!("Optional model override (default: {})", DEFAULT_MODEL)
                }
            },
            "required": ["problem"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let problem = args["problem"]
            .as_str()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                AppError::InvalidArgument("missing string argument 'problem'".to_string())
            })?;
        let model = args["model"].as_str();

        let result = solve(problem, model).await;
        Ok(json!(result))
    }
}

/// Build the autonomous reasoning server.
pub fn build_server() -> Result<MathServer> {
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(SolveMathProblemTool))?;
    Ok(MathServer::new(SERVER_NAME, INSTRUCTIONS, tools))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_extract_numbers() {
        assert_eq!(extract_numbers("triple 4 and subtract 5"), vec![4.0, 5.0]);
        assert_eq!(extract_numbers("divide -1.5 by 3"), vec![-1.5, 3.0]);
        assert!(extract_numbers("no digits here").is_empty());
    }

    #[rstest]
    #[case("please add 2 and 3", "add", "5")]
    #[case("what is 10 minus 4?", "minus", "6")]
    #[case("the product of 9 and 6", "product", "54")]
    #[case("quotient of 10 and 2", "quotient", "5")]
    fn test_fallback_keywords(
        #[case] problem: &str,
        #[case] operation: &str,
        #[case] answer: &str,
    ) {
        let result = fallback_reasoner(problem);
        assert_eq!(result.source, ReasonSource::Fallback);
        assert_eq!(result.model, FALLBACK_MODEL);
        assert_eq!(result.final_answer, answer);
        assert!(result.reasoning_steps[1].contains(operation));
    }

    #[test]
    fn test_fallback_first_match_wins_in_table_order() {
        // "subtract" appears first in the text, but "add" is declared
        // earlier in the table and table order decides.
        let result = fallback_reasoner("subtract or add 8 and 2?");
        assert!(result.reasoning_steps[1].contains("'add'"));
        assert_eq!(result.final_answer, "10");
    }

    #[test]
    fn test_fallback_division_by_zero_is_infinite() {
        let result = fallback_reasoner("divide 10 by 0");
        assert_eq!(result.final_answer, "inf");
    }

    #[test]
    fn test_fallback_without_numbers_or_keyword() {
        let no_numbers = fallback_reasoner("add some things together");
        assert_eq!(no_numbers.final_answer, "Unable to determine answer.");
        assert!(no_numbers.reasoning_steps[1].contains("'analysis'"));

        let no_keyword = fallback_reasoner("what about 3 and 4?");
        assert_eq!(no_keyword.final_answer, "Unable to determine answer.");
    }

    #[test]
    fn test_solve_tool_manifest() {
        let server = build_server().unwrap();
        assert_eq!(server.tools().tool_names(), vec!["solve_math_problem"]);

        let schema = server.tools().get("solve_math_problem").unwrap().parameters_schema();
        assert!(schema["properties"]["problem"].is_object());
        assert_eq!(schema["required"][0], "problem");
    }
}
