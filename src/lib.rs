//! # abacus - math tool-server demos with an LLM planner
//!
//! Four demonstration servers expose the same fixed-arity float
//! arithmetic behind progressively richer response contracts, and a
//! planner turns free-text requests into structured tool calls:
//!
//! 1. **Capability registry** - advertises tools without executing them
//! 2. **Data provider** - returns `{operation, inputs, result}` payloads
//! 3. **Prompt helper** - pairs each result with a suggested follow-up prompt
//! 4. **Autonomous reasoner** - delegates whole word problems to the
//!    remote gateway, with a local heuristic fallback
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use abacus::servers::get_blueprint;
//!
//! let blueprint = get_blueprint("data")?;
//! let server = (blueprint.factory)()?;
//! let payload = server
//!     .tools()
//!     .execute("math_add", serde_json::json!({"augend": 2.0, "addend": 3.0}))
//!     .await?;
//! assert_eq!(payload["result"], 5.0);
//! ```
//!
//! ## Using the Planner
//!
//! ```rust,ignore
//! use abacus::{OpenAiGateway, Planner};
//! use std::sync::Arc;
//!
//! let gateway = OpenAiGateway::from_env()?;
//! let planner = Planner::new(Box::new(gateway), Arc::clone(server.tools()));
//! let result = planner.run("what is 9 times 6?").await?;
//! println!("{}", result.message);
//! ```
//!
//! The planner enforces a closed world (only offered tools can run) and
//! exactly one tool call per user turn, followed by a forced textual
//! summary.
//!
//! ## Modules
//!
//! - [`cli`] - clap commands, scenario runner, interactive REPL
//! - [`llm`] - remote reasoning gateway client
//! - [`planner`] - natural-language router over the tool registry
//! - [`servers`] - the four demo server blueprints
//! - [`tools`] - tool trait and registry
//! - [`types`] - shared types and the error taxonomy

#![warn(missing_docs)]

/// CLI commands, scenario runner, and interactive REPL.
pub mod cli;
/// Remote reasoning gateway client.
pub mod llm;
/// Natural-language planner/router.
pub mod planner;
/// Demo server blueprints and implementations.
pub mod servers;
/// Tool trait and registry.
pub mod tools;
/// Shared types and error taxonomy.
pub mod types;

// Re-export commonly used types
pub use llm::{ChatGateway, GatewayConfig, OpenAiGateway};
pub use planner::{Planner, PlannerDecision, PlannerResult};
pub use servers::{get_blueprint, iter_blueprints, MathServer, ServerBlueprint};
pub use tools::{Tool, ToolRegistry};
pub use types::{AppError, ChatMessage, Result, Role, ToolDefinition};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
