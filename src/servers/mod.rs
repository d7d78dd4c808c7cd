//! Server blueprints for the four demo tool sets.
//!
//! A blueprint is static configuration describing one server: a unique
//! name, a category label, a factory, a one-line summary, and lookup
//! aliases. The blueprint table is fixed at compile time and is looked up
//! by name or alias, case-insensitively.

pub mod autonomous;
pub mod capability;
pub mod data;
pub mod math;
pub mod prompt;

use crate::tools::ToolRegistry;
use crate::types::{AppError, Result};
use std::sync::Arc;

/// A constructed demo server: identity, operator-facing instructions, and
/// its tool registry. Immutable after construction.
pub struct MathServer {
    name: &'static str,
    instructions: &'static str,
    tools: Arc<ToolRegistry>,
}

impl MathServer {
    pub(crate) fn new(
        name: &'static str,
        instructions: &'static str,
        tools: ToolRegistry,
    ) -> Self {
        Self {
            name,
            instructions,
            tools: Arc::new(tools),
        }
    }

    /// Server identifier.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Operator-facing usage instructions.
    pub fn instructions(&self) -> &'static str {
        self.instructions
    }

    /// The server's tool registry.
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }
}

/// Factory constructing one demo server.
pub type ServerFactory = fn() -> Result<MathServer>;

/// Static configuration describing one demo server.
#[derive(Debug)]
pub struct ServerBlueprint {
    /// Unique server identifier.
    pub name: &'static str,
    /// Human-readable category name.
    pub category: &'static str,
    /// Factory that constructs the server.
    pub factory: ServerFactory,
    /// Short description of the server capabilities.
    pub summary: &'static str,
    /// Additional names that reference the same blueprint.
    pub aliases: &'static [&'static str],
}

static BLUEPRINTS: [ServerBlueprint; 4] = [
    ServerBlueprint {
        name: capability::SERVER_NAME,
        category: capability::CATEGORY,
        factory: capability::build_server,
        summary: "Advertises math tools without executing them, ideal for capability discovery.",
        aliases: &["capability", "discovery"],
    },
    ServerBlueprint {
        name: data::SERVER_NAME,
        category: data::CATEGORY,
        factory: data::build_server,
        summary: "Executes math operations and returns structured JSON payloads.",
        aliases: &["data", "provider"],
    },
    ServerBlueprint {
        name: prompt::SERVER_NAME,
        category: prompt::CATEGORY,
        factory: prompt::build_server,
        summary: "Pairs math data with a suggested follow-up prompt for co-reasoning.",
        aliases: &["prompt", "co-reasoning"],
    },
    ServerBlueprint {
        name: autonomous::SERVER_NAME,
        category: autonomous::CATEGORY,
        factory: autonomous::build_server,
        summary: "Delegates math problem solving to an internal gateway call.",
        aliases: &["autonomous", "reasoner"],
    },
];

/// All server blueprints, in registration order.
pub fn iter_blueprints() -> &'static [ServerBlueprint] {
    &BLUEPRINTS
}

/// Fetch a blueprint by name or alias, case-insensitively. A full name
/// always beats an alias; among aliases the first registrant wins.
pub fn get_blueprint(key: &str) -> Result<&'static ServerBlueprint> {
    let normalized = key.to_lowercase();

    if let Some(blueprint) = BLUEPRINTS
        .iter()
        .find(|b| b.name.to_lowercase() == normalized)
    {
        return Ok(blueprint);
    }
    if let Some(blueprint) = BLUEPRINTS
        .iter()
        .find(|b| b.aliases.iter().any(|a| a.to_lowercase() == normalized))
    {
        return Ok(blueprint);
    }

    let mut available: Vec<&str> = BLUEPRINTS
        .iter()
        .flat_map(|b| std::iter::once(b.name).chain(b.aliases.iter().copied()))
        .collect();
    available.sort_unstable();
    Err(AppError::UnknownServer(format!(
        "'{}'. Available: {}",
        key,
        available.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_and_alias() {
        assert_eq!(
            get_blueprint("math-data-provider").unwrap().name,
            data::SERVER_NAME
        );
        assert_eq!(get_blueprint("data").unwrap().name, data::SERVER_NAME);
        assert_eq!(get_blueprint("reasoner").unwrap().name, autonomous::SERVER_NAME);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(
            get_blueprint("Math-Prompt-Helper").unwrap().name,
            prompt::SERVER_NAME
        );
        assert_eq!(get_blueprint("CAPABILITY").unwrap().name, capability::SERVER_NAME);
    }

    #[test]
    fn test_unknown_key_lists_available_names() {
        let err = get_blueprint("warp-drive").unwrap_err();
        match err {
            AppError::UnknownServer(msg) => {
                assert!(msg.contains("warp-drive"));
                assert!(msg.contains("autonomous"));
                assert!(msg.contains("math-data-provider"));
            }
            other => panic!("expected UnknownServer, got {:?}", other),
        }
    }

    #[test]
    fn test_every_factory_builds() {
        for blueprint in iter_blueprints() {
            let server = (blueprint.factory)().unwrap();
            assert_eq!(server.name(), blueprint.name);
            assert!(!server.tools().is_empty());
            assert!(!server.instructions().is_empty());
        }
    }
}
