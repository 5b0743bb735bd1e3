//! KDL config file.
//!
//! ```kdl
//! gfm true
//! breaks false
//! math true
//! highlight true
//! svg-objects true
//! wrap-math true
//! emphasis true
//! code-theme-light "InspiredGitHub"
//! code-theme-dark "base16-ocean.dark"
//! ```
//!
//! Every node is optional; a missing file means defaults.

use std::path::{Path, PathBuf};

use kdl::{KdlDocument, KdlNode, KdlValue};
use keepmark_renderer::RenderOptions;
use keepmark_renderer::css::{DEFAULT_DARK_THEME, DEFAULT_LIGHT_THEME};

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub render: RenderOptions,
    pub light_theme: String,
    pub dark_theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            light_theme: DEFAULT_LIGHT_THEME.to_string(),
            dark_theme: DEFAULT_DARK_THEME.to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => {
                    tracing::debug!("no config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let source = std::fs::read_to_string(&path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&source, &path)
    }

    /// Parse config source. `path` is only used for error reporting.
    pub fn parse(source: &str, path: &Path) -> Result<Self, CliError> {
        let doc: KdlDocument = source.parse().map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::default();
        for node in doc.nodes() {
            let name = node.name().value();
            match name {
                "gfm" => config.render.gfm = bool_arg(node)?,
                "breaks" => config.render.breaks = bool_arg(node)?,
                "math" => config.render.math = bool_arg(node)?,
                "highlight" => config.render.highlight = bool_arg(node)?,
                "svg-objects" => config.render.svg_objects = bool_arg(node)?,
                "wrap-math" => config.render.pipeline.wrap_math = bool_arg(node)?,
                "emphasis" => config.render.pipeline.rewrite_emphasis = bool_arg(node)?,
                "code-theme-light" => config.light_theme = string_arg(node)?,
                "code-theme-dark" => config.dark_theme = string_arg(node)?,
                other => tracing::warn!(node = other, "ignoring unknown config node"),
            }
        }
        Ok(config)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("keepmark").join("config.kdl"))
}

fn first_arg(node: &KdlNode) -> Option<&KdlValue> {
    node.entries()
        .iter()
        .find(|entry| entry.name().is_none())
        .map(|entry| entry.value())
}

fn bool_arg(node: &KdlNode) -> Result<bool, CliError> {
    first_arg(node)
        .and_then(KdlValue::as_bool)
        .ok_or_else(|| CliError::InvalidConfig {
            node: node.name().value().to_string(),
            expected: "a boolean",
            example: "true",
        })
}

fn string_arg(node: &KdlNode) -> Result<String, CliError> {
    first_arg(node)
        .and_then(KdlValue::as_string)
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidConfig {
            node: node.name().value().to_string(),
            expected: "a string",
            example: "\"InspiredGitHub\"",
        })
}
