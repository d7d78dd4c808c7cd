//! Command-line interface for the abacus binary.
//!
//! Two subcommands: `demo` runs scripted scenarios against the four demo
//! servers, `chat` opens an interactive REPL with optional LLM planning.

pub mod chat;
pub mod demo;
pub mod output;

use crate::tools::ToolRegistry;
use clap::{Parser, Subcommand};
use output::Output;

/// abacus - math tool-server demos with an LLM planner
#[derive(Parser, Debug)]
#[command(
    name = "abacus",
    version,
    about = "Math tool-server demos with an LLM planner",
    long_about = "Four demo math tool servers behind one CLI:\n\
                  a capability registry, a data provider, a prompt helper, and an\n\
                  autonomous reasoner. The chat REPL can route free-text requests\n\
                  through an LLM planner that calls exactly one tool per turn.",
    after_help = "EXAMPLES:\n    \
                  abacus demo                    # Run every scenario\n    \
                  abacus demo data               # Run one scenario\n    \
                  abacus demo --list             # List available scenarios\n    \
                  abacus chat                    # Chat with the autonomous reasoner\n    \
                  abacus chat --server data      # Planner-routed chat over the data provider\n    \
                  abacus chat --server data --no-planner   # Manual commands (add 2 3)"
)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run demo scenarios against the example servers
    Demo {
        /// Scenario name (capability, data, prompt, autonomous, or all)
        #[arg(default_value = "all")]
        scenario: String,

        /// List available scenarios and exit
        #[arg(long)]
        list: bool,
    },

    /// Interactive REPL for chatting with a server
    Chat {
        /// Server blueprint name or alias to use
        #[arg(short, long, default_value = "autonomous")]
        server: String,

        /// Model override for the planner and the autonomous reasoner
        #[arg(short, long)]
        model: Option<String>,

        /// Print the raw JSON payload returned by each tool
        #[arg(long)]
        show_json: bool,

        /// Force the LLM planner to interpret natural-language queries
        #[arg(long, conflicts_with = "no_planner")]
        planner: bool,

        /// Disable the LLM planner even if available
        #[arg(long)]
        no_planner: bool,
    },
}

/// Print each registered tool with its schema, in registry order.
pub(crate) fn print_manifest(out: &Output, tools: &ToolRegistry) {
    out.info("Tools:");
    for tool in tools.iter() {
        out.list_item(&format!("{}: {}", tool.name(), tool.description()));
        let schema = serde_json::to_string_pretty(&tool.parameters_schema())
            .unwrap_or_else(|_| "{}".to_string());
        for line in schema.lines() {
            out.detail(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_demo_defaults() {
        let cli = Cli::try_parse_from(["abacus", "demo"]).unwrap();
        match cli.command {
            Commands::Demo { scenario, list } => {
                assert_eq!(scenario, "all");
                assert!(!list);
            }
            _ => panic!("expected demo subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_chat_flags() {
        let cli = Cli::try_parse_from([
            "abacus",
            "chat",
            "--server",
            "data",
            "--show-json",
            "--no-planner",
        ])
        .unwrap();
        match cli.command {
            Commands::Chat {
                server,
                model,
                show_json,
                planner,
                no_planner,
            } => {
                assert_eq!(server, "data");
                assert!(model.is_none());
                assert!(show_json);
                assert!(!planner);
                assert!(no_planner);
            }
            _ => panic!("expected chat subcommand"),
        }
    }

    #[test]
    fn test_planner_flags_conflict() {
        let result = Cli::try_parse_from(["abacus", "chat", "--planner", "--no-planner"]);
        assert!(result.is_err());
    }
}
