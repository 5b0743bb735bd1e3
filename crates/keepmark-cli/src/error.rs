use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("failed to read {}", .path.display())]
    #[diagnostic(code(keepmark::cli::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", .path.display())]
    #[diagnostic(code(keepmark::cli::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", .path.display())]
    #[diagnostic(code(keepmark::cli::config_parse))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: kdl::KdlError,
    },

    #[error("config node `{node}` expects {expected}")]
    #[diagnostic(
        code(keepmark::cli::invalid_config),
        help("e.g. `{node} {example}`")
    )]
    InvalidConfig {
        node: String,
        expected: &'static str,
        example: &'static str,
    },

    #[error("offset {offset} is past the end of the input ({len} chars)")]
    #[diagnostic(code(keepmark::cli::offset))]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("failed to encode output as JSON")]
    #[diagnostic(code(keepmark::cli::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] keepmark_renderer::RenderError),
}
