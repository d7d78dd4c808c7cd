//! Scenario runner: scripted walkthroughs of the four demo servers.

use crate::cli::output::Output;
use crate::cli::print_manifest;
use crate::servers::{get_blueprint, MathServer, ServerBlueprint};
use crate::types::{AppError, Result};
use serde_json::{json, Value};

/// One runnable demo scenario.
#[derive(Debug)]
struct Scenario {
    name: &'static str,
    description: &'static str,
    blueprint_key: &'static str,
}

static SCENARIOS: [Scenario; 4] = [
    Scenario {
        name: "capability",
        description: "Inspect the manifest returned by the capability registry server.",
        blueprint_key: "capability",
    },
    Scenario {
        name: "data",
        description: "Execute real math tools returning structured JSON.",
        blueprint_key: "data",
    },
    Scenario {
        name: "prompt",
        description: "Observe data paired with a suggested follow-up prompt.",
        blueprint_key: "prompt",
    },
    Scenario {
        name: "autonomous",
        description: "Delegate a math word problem to the autonomous reasoner.",
        blueprint_key: "autonomous",
    },
];

/// Run the demo subcommand.
pub async fn run(scenario: &str, list: bool, out: &Output) -> Result<()> {
    if list {
        list_scenarios(out);
        return Ok(());
    }
    out.banner();

    let targets: Vec<&Scenario> = if scenario.eq_ignore_ascii_case("all") {
        SCENARIOS.iter().collect()
    } else {
        vec![resolve_scenario(scenario)?]
    };

    for scenario in targets {
        out.header(&format!("Scenario: {}", scenario.name));
        let blueprint = get_blueprint(scenario.blueprint_key)?;
        let server = (blueprint.factory)()?;
        print_server_intro(out, &server, blueprint);
        print_manifest(out, server.tools());
        run_sample(out, scenario, &server).await?;
    }

    Ok(())
}

fn resolve_scenario(key: &str) -> Result<&'static Scenario> {
    SCENARIOS
        .iter()
        .find(|s| key.eq_ignore_ascii_case(s.name) || key.eq_ignore_ascii_case(s.blueprint_key))
        .ok_or_else(|| {
            AppError::Config(format!(
                "Unknown scenario '{}'. Use --list to see available names.",
                key
            ))
        })
}

fn list_scenarios(out: &Output) {
    out.info("Available scenarios:");
    for scenario in &SCENARIOS {
        out.list_item(&format!("{}: {}", scenario.name, scenario.description));
    }
}

fn print_server_intro(out: &Output, server: &MathServer, blueprint: &ServerBlueprint) {
    out.kv("Server", &format!("{} [{}]", server.name(), blueprint.category));
    out.kv("Instructions", server.instructions());
}

async fn run_sample(out: &Output, scenario: &Scenario, server: &MathServer) -> Result<()> {
    let sample: Option<(&str, Value)> = match scenario.name {
        // The capability registry's manifest IS the demo.
        "capability" => None,
        "data" => Some(("math_add", json!({ "augend": 8.0, "addend": 13.0 }))),
        "prompt" => Some((
            "math_add_with_prompt",
            json!({ "augend": 5.0, "addend": 11.0 }),
        )),
        _ => Some((
            "solve_math_problem",
            json!({ "problem": "If you triple 4 and subtract 5, what do you get?" }),
        )),
    };

    if let Some((tool_name, args)) = sample {
        let payload = server.tools().execute(tool_name, args).await?;
        let pretty =
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        out.info(&format!("Sample response from {}:", tool_name));
        for line in pretty.lines() {
            out.detail(line);
        }
    }

    Ok(())
}
