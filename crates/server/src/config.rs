use anyhow::Context as _;
use plainroute_connect::ConnectOptions;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::routes::ROUTE_NAMES;

/// Server configuration file (YAML).
///
/// ```yaml
/// connect:
///   internalErrors: conceal
/// routes:
///   getNote: req.query.id
///   createNote: [body.title, body.text]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerConfig {
    /// Options applied to every connected route.
    #[serde(default)]
    pub connect: ConnectOptions,
    /// Argument mapping overrides by route name. Values are checked when the route is built;
    /// a bad one is reported on every request to that route.
    #[serde(default)]
    pub routes: BTreeMap<String, Value>,
}

/// Load the configuration, or the defaults when `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if it overrides a route that
/// does not exist.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    let Some(path) = path else {
        return Ok(ServerConfig::default());
    };
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg = parse_config(&content).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

fn parse_config(content: &str) -> anyhow::Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(content)?;
    if let Some(unknown) = cfg.routes.keys().find(|name| !ROUTE_NAMES.contains(&name.as_str())) {
        anyhow::bail!(
            "unknown route '{unknown}' in routes (expected one of: {})",
            ROUTE_NAMES.join(", ")
        );
    }
    Ok(cfg)
}
