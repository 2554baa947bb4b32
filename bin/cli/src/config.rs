//! CLI configuration.
//!
//! Loaded with the `config` crate from an optional file, then environment
//! variables prefixed `FLOWDESK_` with `__` between nested keys:
//!
//! ```text
//! FLOWDESK_AUTOMATION__BASE_URL=http://localhost:5678/api
//! FLOWDESK_AUTOMATION__TIMEOUT_SECONDS=10
//! FLOWDESK_CANVAS__WIDTH=1280
//! FLOWDESK_NODE__HEIGHT=80
//! ```

use flowdesk_automation::HttpBackendConfig;
use flowdesk_editor::{CanvasBounds, NodeFootprint};
use serde::Deserialize;
use std::path::Path;

/// CLI configuration composed from library configs.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Automation backend. Only commands that talk to the engine need it.
    #[serde(default)]
    pub automation: Option<HttpBackendConfig>,

    #[serde(default)]
    pub canvas: CanvasBounds,

    #[serde(default)]
    pub node: NodeFootprint,
}

impl CliConfig {
    /// Loads configuration from an optional file and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value is invalid.
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with(file, environment())
    }

    fn load_with(
        file: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        builder.add_source(env).build()?.try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("FLOWDESK")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        environment().source(Some(source))
    }

    #[test]
    fn defaults_without_any_source() {
        let config = CliConfig::load_with(None, env(&[])).expect("load");
        assert!(config.automation.is_none());
        assert_eq!(config.canvas, CanvasBounds::default());
        assert_eq!(config.node, NodeFootprint::default());
    }

    #[test]
    fn reads_nested_environment_keys() {
        let config = CliConfig::load_with(
            None,
            env(&[
                ("FLOWDESK_AUTOMATION__BASE_URL", "http://engine:5678/api"),
                ("FLOWDESK_AUTOMATION__TIMEOUT_SECONDS", "5"),
                ("FLOWDESK_CANVAS__WIDTH", "1280"),
            ]),
        )
        .expect("load");

        let automation = config.automation.expect("automation");
        assert_eq!(automation.base_url, "http://engine:5678/api");
        assert_eq!(automation.timeout_seconds, 5);
        assert_eq!(config.canvas.width, 1280.0);
        assert_eq!(config.canvas.height, 600.0);
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("tempfile");
        write!(
            file,
            r#"{{"automation": {{"base_url": "http://from-file"}}, "node": {{"width": 180}}}}"#
        )
        .expect("write");

        let config = CliConfig::load_with(
            Some(file.path()),
            env(&[("FLOWDESK_AUTOMATION__BASE_URL", "http://from-env")]),
        )
        .expect("load");

        assert_eq!(
            config.automation.map(|a| a.base_url).as_deref(),
            Some("http://from-env")
        );
        assert_eq!(config.node.width, 180.0);
        assert_eq!(config.node.height, 72.0);
    }
}
