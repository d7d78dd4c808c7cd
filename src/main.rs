//! abacus CLI entry point.
//!
//! - `abacus demo [scenario]` - run scripted demos of the four servers
//! - `abacus chat` - interactive REPL, planner-routed when credentials
//!   are available

use abacus::cli::chat::{self, ChatOptions};
use abacus::cli::output::Output;
use abacus::cli::{demo, Cli, Commands};
use abacus::types::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "abacus=debug" } else { "abacus=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let out = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if let Err(e) = run(cli, &out).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, out: &Output) -> Result<()> {
    match cli.command {
        Commands::Demo { scenario, list } => demo::run(&scenario, list, out).await,
        Commands::Chat {
            server,
            model,
            show_json,
            planner,
            no_planner,
        } => {
            let planner = if planner {
                Some(true)
            } else if no_planner {
                Some(false)
            } else {
                None
            };
            chat::run(
                ChatOptions {
                    server,
                    model,
                    show_json,
                    planner,
                },
                out,
            )
            .await
        }
    }
}
