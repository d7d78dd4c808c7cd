//! Interactive REPL for chatting with the demo servers.
//!
//! Free text goes either through the LLM planner (when available) or
//! through per-server manual handlers. The reserved commands `exit`,
//! `help`, and `tools` are intercepted before dispatch.

use crate::cli::output::Output;
use crate::cli::print_manifest;
use crate::llm::{GatewayConfig, OpenAiGateway};
use crate::planner::{Planner, PlannerResult};
use crate::servers::math::BinaryOp;
use crate::servers::{autonomous, get_blueprint, MathServer};
use crate::types::Result;
use serde_json::json;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Inputs that terminate the REPL.
const EXIT_COMMANDS: &[&str] = &["exit", "quit", ":q"];
/// Inputs that display help instructions.
const HELP_COMMANDS: &[&str] = &["help", "?", ":help"];
/// Inputs that reprint the tool manifest.
const MANIFEST_COMMANDS: &[&str] = &["tools", "manifest"];

/// Options collected from the `chat` subcommand.
pub struct ChatOptions {
    /// Server blueprint name or alias.
    pub server: String,
    /// Model override for the planner and the autonomous reasoner.
    pub model: Option<String>,
    /// Print raw JSON payloads instead of formatted summaries.
    pub show_json: bool,
    /// Explicit planner preference; `None` means "decide from the server".
    pub planner: Option<bool>,
}

/// One manual binary-math command: REPL verb, target tool, operation.
#[derive(Debug)]
struct BinaryCommand {
    verb: &'static str,
    tool: &'static str,
    op: BinaryOp,
}

static DATA_COMMANDS: [BinaryCommand; 4] = [
    BinaryCommand { verb: "add", tool: "math_add", op: BinaryOp::Addition },
    BinaryCommand { verb: "subtract", tool: "math_subtract", op: BinaryOp::Subtraction },
    BinaryCommand { verb: "multiply", tool: "math_multiply", op: BinaryOp::Multiplication },
    BinaryCommand { verb: "divide", tool: "math_divide", op: BinaryOp::Division },
];

static PROMPT_COMMANDS: [BinaryCommand; 4] = [
    BinaryCommand { verb: "add", tool: "math_add_with_prompt", op: BinaryOp::Addition },
    BinaryCommand { verb: "subtract", tool: "math_subtract_with_prompt", op: BinaryOp::Subtraction },
    BinaryCommand { verb: "multiply", tool: "math_multiply_with_prompt", op: BinaryOp::Multiplication },
    BinaryCommand { verb: "divide", tool: "math_divide_with_prompt", op: BinaryOp::Division },
];

/// Dispatch target for one REPL line.
enum Handler {
    Capability,
    Binary {
        commands: &'static [BinaryCommand],
        with_prompt: bool,
    },
    Autonomous,
    Planner(Planner),
}

impl Handler {
    fn help(&self, out: &Output) {
        match self {
            Handler::Capability => out.info(
                "This server only advertises tools. Use 'abacus chat --server data' \
                 to execute math operations.",
            ),
            Handler::Binary { .. } => {
                out.info("Format: <operation> <number> <number> (e.g., add 2 3)")
            }
            Handler::Autonomous => {
                out.info("Ask a math word problem in plain language. Type 'exit' to quit.")
            }
            Handler::Planner(_) => {
                out.info("Ask any natural-language question. Type 'exit' to quit.")
            }
        }
    }

    async fn handle(
        &self,
        server: &MathServer,
        input: &str,
        options: &ChatOptions,
        out: &Output,
    ) {
        match self {
            Handler::Capability => out.info(
                "Capability registry is read-only. Run the data provider or prompt \
                 helper servers to execute math.",
            ),
            Handler::Binary {
                commands,
                with_prompt,
            } => handle_binary(server, commands, *with_prompt, input, options, out).await,
            Handler::Autonomous => handle_autonomous(server, input, options, out).await,
            Handler::Planner(planner) => handle_planner(planner, input, options, out).await,
        }
    }
}

/// Run the chat subcommand.
pub async fn run(options: ChatOptions, out: &Output) -> Result<()> {
    let blueprint = get_blueprint(&options.server)?;
    let server = (blueprint.factory)()?;

    let use_planner = options
        .planner
        .unwrap_or(blueprint.name != autonomous::SERVER_NAME);
    // Planner is optional; only instantiate when a credential is present.
    let planner = if use_planner {
        build_planner(&options, &server, out)
    } else {
        None
    };

    out.info(&format!(
        "[chat] abacus v{} | Selected server '{}' ({})",
        env!("CARGO_PKG_VERSION"),
        blueprint.name,
        blueprint.category
    ));
    match &planner {
        Some(planner) => out.info(&format!(
            "[chat] Planner enabled using model {}.",
            planner.model_name()
        )),
        None => out.info("[chat] Planner disabled; manual commands required."),
    }
    out.info(server.instructions());
    out.info("Type 'help' for commands, 'exit' to quit.");
    print_manifest(out, server.tools());

    let handler = match planner {
        Some(planner) => Handler::Planner(planner),
        None => manual_handler(blueprint.name),
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                out.newline();
                out.info("Exiting chat.");
                break;
            }
            Ok(_) => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let lowered = input.to_lowercase();
        if EXIT_COMMANDS.contains(&lowered.as_str()) {
            out.info("Goodbye!");
            break;
        }
        if HELP_COMMANDS.contains(&lowered.as_str()) {
            handler.help(out);
            continue;
        }
        if MANIFEST_COMMANDS.contains(&lowered.as_str()) {
            print_manifest(out, server.tools());
            continue;
        }

        handler.handle(&server, input, &options, out).await;
    }

    Ok(())
}

fn build_planner(options: &ChatOptions, server: &MathServer, out: &Output) -> Option<Planner> {
    if !Planner::is_available() {
        out.warning(
            "[chat] Planner requested but the gateway is unavailable; \
             falling back to manual mode.",
        );
        return None;
    }
    match GatewayConfig::from_env() {
        Ok(config) => {
            let config = match &options.model {
                Some(model) => config.with_model(model.as_str()),
                None => config,
            };
            let gateway = OpenAiGateway::new(config);
            Some(Planner::new(Box::new(gateway), Arc::clone(server.tools())))
        }
        Err(e) => {
            out.warning(&format!("[chat] Failed to initialize planner: {}", e));
            None
        }
    }
}

fn manual_handler(server_name: &str) -> Handler {
    match server_name {
        crate::servers::capability::SERVER_NAME => Handler::Capability,
        crate::servers::data::SERVER_NAME => Handler::Binary {
            commands: &DATA_COMMANDS,
            with_prompt: false,
        },
        crate::servers::prompt::SERVER_NAME => Handler::Binary {
            commands: &PROMPT_COMMANDS,
            with_prompt: true,
        },
        _ => Handler::Autonomous,
    }
}

/// Parse a binary math instruction of the form `op left right`.
fn parse_binary_command<'a>(
    input: &str,
    commands: &'a [BinaryCommand],
) -> std::result::Result<(&'a BinaryCommand, f64, f64), String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.len() != 3 {
        return Err("Format: <operation> <number> <number> (e.g., add 2 3)".to_string());
    }
    let verb = parts[0].to_lowercase();
    let command = commands.iter().find(|c| c.verb == verb).ok_or_else(|| {
        let known: Vec<&str> = commands.iter().map(|c| c.verb).collect();
        format!("Unknown operation '{}'. Known: {}", verb, known.join(", "))
    })?;
    let left: f64 = parts[1]
        .parse()
        .map_err(|_| "Numbers must be valid floats.".to_string())?;
    let right: f64 = parts[2]
        .parse()
        .map_err(|_| "Numbers must be valid floats.".to_string())?;
    Ok((command, left, right))
}

async fn handle_binary(
    server: &MathServer,
    commands: &[BinaryCommand],
    with_prompt: bool,
    input: &str,
    options: &ChatOptions,
    out: &Output,
) {
    let (command, left, right) = match parse_binary_command(input, commands) {
        Ok(parsed) => parsed,
        Err(message) => {
            out.info(&message);
            return;
        }
    };

    let args = command.op.build_args(left, right);
    let payload = match server.tools().execute(command.tool, args).await {
        Ok(payload) => payload,
        Err(e) => {
            out.error(&e.to_string());
            return;
        }
    };

    if options.show_json {
        print_json(out, &payload);
        return;
    }
    let verb = title_case(command.verb);
    if with_prompt {
        out.info(&format!("{} result: {}", verb, payload["result"]));
        out.info(&format!(
            "Suggested prompt: {}",
            payload["next_prompt"].as_str().unwrap_or_default()
        ));
    } else {
        out.info(&format!(
            "{} result: {} (inputs={})",
            verb, payload["result"], payload["inputs"]
        ));
    }
}

async fn handle_autonomous(
    server: &MathServer,
    input: &str,
    options: &ChatOptions,
    out: &Output,
) {
    let mut args = json!({ "problem": input });
    if let Some(model) = &options.model {
        args["model"] = json!(model);
    }

    let payload = match server.tools().execute("solve_math_problem", args).await {
        Ok(payload) => payload,
        Err(e) => {
            out.error(&e.to_string());
            return;
        }
    };

    if options.show_json {
        print_json(out, &payload);
        return;
    }
    if let Some(steps) = payload["reasoning_steps"].as_array() {
        out.info("Reasoning:");
        for (idx, step) in steps.iter().enumerate() {
            out.list_item(&format!(
                "{}. {}",
                idx + 1,
                step.as_str().unwrap_or_default()
            ));
        }
    }
    out.info(&format!(
        "Final answer: {}",
        payload["final_answer"].as_str().unwrap_or_default()
    ));
}

async fn handle_planner(planner: &Planner, input: &str, options: &ChatOptions, out: &Output) {
    out.info("[planner] Interpreting request via LLM...");
    let result = match planner.run(input).await {
        Ok(result) => result,
        Err(e) => {
            out.error(&format!("[planner] {}", e));
            return;
        }
    };

    let action = match &result.tool_name {
        Some(tool) => format!("call {}", tool),
        None => "respond".to_string(),
    };
    out.info(&format!("[planner] Completed plan: {}", action));
    print_planner_result(out, &result, options.show_json);
}

fn print_planner_result(out: &Output, result: &PlannerResult, show_json: bool) {
    if show_json {
        print_json(
            out,
            &json!({
                "message": result.message,
                "tool": result.tool_name,
                "arguments": result.arguments,
                "result": result.tool_result,
                "raw_planner_response": result.raw_response,
            }),
        );
    }
    println!("{}", result.message);
}

fn print_json(out: &Output, payload: &serde_json::Value) {
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    for line in pretty.lines() {
        out.detail(line);
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binary_command() {
        let (command, left, right) = parse_binary_command("add 2 3", &DATA_COMMANDS).unwrap();
        assert_eq!(command.tool, "math_add");
        assert_eq!((left, right), (2.0, 3.0));

        let (command, ..) = parse_binary_command("DIVIDE 12 3", &PROMPT_COMMANDS).unwrap();
        assert_eq!(command.tool, "math_divide_with_prompt");
    }

    #[test]
    fn test_parse_binary_command_rejects_bad_input() {
        let err = parse_binary_command("add 2", &DATA_COMMANDS).unwrap_err();
        assert!(err.contains("Format:"));

        let err = parse_binary_command("modulo 2 3", &DATA_COMMANDS).unwrap_err();
        assert!(err.contains("Unknown operation 'modulo'"));
        assert!(err.contains("add, subtract, multiply, divide"));

        let err = parse_binary_command("add two three", &DATA_COMMANDS).unwrap_err();
        assert!(err.contains("valid floats"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("add"), "Add");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_manual_handler_selection() {
        assert!(matches!(
            manual_handler(crate::servers::capability::SERVER_NAME),
            Handler::Capability
        ));
        assert!(matches!(
            manual_handler(crate::servers::data::SERVER_NAME),
            Handler::Binary {
                with_prompt: false,
                ..
            }
        ));
        assert!(matches!(
            manual_handler(crate::servers::prompt::SERVER_NAME),
            Handler::Binary {
                with_prompt: true,
                ..
            }
        ));
        assert!(matches!(
            manual_handler(crate::servers::autonomous::SERVER_NAME),
            Handler::Autonomous
        ));
    }
}
