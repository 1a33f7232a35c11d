//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Optional TOML file passed by the caller
//! 3. Environment variables: `NODECLASS_*` prefix, `__` between nested keys
//!    (e.g. `NODECLASS_RENDER__PATH_SEPARATOR`)

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::{NodeError, NodeResult};

pub const DEFAULT_NODE_NAME: &str = "Node";
pub const DEFAULT_PATH_SEPARATOR: &str = " => ";
pub const DEFAULT_INDENT: &str = "\t";
pub const DEFAULT_CHILDREN_MARKER: &str = "/";

/// String rendering settings shared by trees and chains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Placed between ancestor descriptions in `describe_path`
    pub path_separator: String,
    /// Repeated once per depth level in `describe_subtree` / `describe_chain`
    pub indent: String,
    /// Appended to the description of a node that has children
    pub children_marker: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            path_separator: DEFAULT_PATH_SEPARATOR.into(),
            indent: DEFAULT_INDENT.into(),
            children_marker: DEFAULT_CHILDREN_MARKER.into(),
        }
    }
}

/// Unified configuration for nodeclass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Name given by `create_default` (default: "Node")
    pub default_name: String,
    /// Rendering settings
    pub render: RenderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_NODE_NAME.into(),
            render: RenderConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `path` - Optional TOML file; it must exist when given
    #[instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> NodeResult<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("default_name", defaults.default_name)?
            .set_default("render.path_separator", defaults.render.path_separator)?
            .set_default("render.indent", defaults.render.indent)?
            .set_default("render.children_marker", defaults.render.children_marker)?;

        if let Some(path) = path {
            debug!("Loading settings file: {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("NODECLASS")
                .prefix_separator("_")
                .separator("__"),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        debug!("Settings loaded: {:?}", settings);
        Ok(settings)
    }

    /// Parse settings from TOML text; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> NodeResult<Self> {
        toml::from_str(content).map_err(|e| NodeError::Config(config::ConfigError::Message(e.to_string())))
    }
}
