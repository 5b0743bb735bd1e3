//! Stylesheet for highlighted code blocks.

use miette::Diagnostic;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::css_for_theme_with_class_style;
use thiserror::Error;

use crate::code_pretty::CLASS_STYLE;

pub const DEFAULT_LIGHT_THEME: &str = "InspiredGitHub";
pub const DEFAULT_DARK_THEME: &str = "base16-ocean.dark";

#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("unknown code theme: {name}")]
    #[diagnostic(
        code(keepmark::renderer::unknown_theme),
        help("bundled themes: {available}")
    )]
    UnknownTheme { name: String, available: String },

    #[error("failed to generate syntax css")]
    #[diagnostic(code(keepmark::renderer::css))]
    Css(#[from] syntect::Error),
}

fn load_theme<'a>(themes: &'a ThemeSet, name: &str) -> Result<&'a Theme, RenderError> {
    themes.themes.get(name).ok_or_else(|| RenderError::UnknownTheme {
        name: name.to_string(),
        available: themes.themes.keys().cloned().collect::<Vec<_>>().join(", "),
    })
}

/// CSS for the classed highlighting output: `light` by default, `dark`
/// under `prefers-color-scheme: dark`.
pub fn syntax_css(light: &str, dark: &str) -> Result<String, RenderError> {
    let themes = ThemeSet::load_defaults();
    let light_css = css_for_theme_with_class_style(load_theme(&themes, light)?, CLASS_STYLE)?;
    let dark_css = css_for_theme_with_class_style(load_theme(&themes, dark)?, CLASS_STYLE)?;

    let mut result = String::new();
    result.push_str("/* Syntax highlighting - Light Mode (default) */\n");
    result.push_str(&light_css);
    result.push_str("\n\n/* Syntax highlighting - Dark Mode */\n");
    result.push_str("@media (prefers-color-scheme: dark) {\n");
    result.push_str(&dark_css);
    result.push_str("}\n");
    Ok(result)
}
