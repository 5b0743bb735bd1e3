use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use keepmark_core::{TextStats, on_newline};
use keepmark_renderer::{html_page, render_document, syntax_css};
use miette::Result;
use serde::Serialize;

mod config;
mod error;

use config::Config;
use error::CliError;

/// File name used when saving without one.
const DEFAULT_FILE_NAME: &str = "untitled.md";

#[derive(Parser)]
#[command(version, about = "keepmark - Markdown preview for notes", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to config file
    #[arg(long, global = true, env = "KEEPMARK_CONFIG")]
    config: Option<PathBuf>,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a Markdown (or SVG) file to preview HTML
    Render {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Write HTML here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit a full HTML page with highlighting styles
        #[arg(long)]
        standalone: bool,
    },
    /// Print the text handed to the Markdown renderer
    Preprocess {
        /// Input file, or `-` for stdin
        input: PathBuf,
    },
    /// Continue or end a list as if Enter was pressed at OFFSET
    Newline {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Cursor position in characters
        #[arg(long)]
        offset: usize,

        /// Print `{"text", "cursor", "changed"}` instead of the new text
        #[arg(long)]
        json: bool,
    },
    /// Word and character counts
    Stats {
        /// Input file, or `-` for stdin
        input: PathBuf,
    },
    /// Save a buffer as a Markdown file
    Save {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Target file name; `.md` is added when missing
        name: Option<String>,
    },
}

#[derive(Serialize)]
struct NewlineOutput {
    text: String,
    cursor: usize,
    /// False when the list engine left the newline to the default behaviour.
    changed: bool,
}

fn main() -> Result<()> {
    init_miette();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            input,
            output,
            standalone,
        } => render(&config, &input, output.as_deref(), standalone)?,
        Commands::Preprocess { input } => {
            let (_, content) = read_input(&input)?;
            let prepared = keepmark_core::Pipeline::new(config.render.pipeline).run(&content);
            write_output(None, &prepared)?;
        }
        Commands::Newline {
            input,
            offset,
            json,
        } => newline(&input, offset, json)?,
        Commands::Stats { input } => {
            let (name, content) = read_input(&input)?;
            println!("{}", document_stats(&config, &name, &content));
        }
        Commands::Save { input, name } => {
            let (_, content) = read_input(&input)?;
            let target = PathBuf::from(markdown_file_name(name.as_deref()));
            std::fs::write(&target, content).map_err(|source| CliError::Write {
                path: target.clone(),
                source,
            })?;
            println!("Saved: {}", target.display());
        }
    }

    Ok(())
}

fn render(config: &Config, input: &Path, output: Option<&Path>, standalone: bool) -> Result<()> {
    let (name, content) = read_input(input)?;

    let start = std::time::Instant::now();
    let rendered = render_document(&name, &content, &config.render);
    tracing::info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        words = rendered.stats.words,
        chars = rendered.stats.chars,
        "rendered {name}"
    );

    let html = if standalone {
        let css = if config.render.highlight {
            syntax_css(&config.light_theme, &config.dark_theme).map_err(CliError::from)?
        } else {
            String::new()
        };
        html_page(&name, &rendered.html, &css)
    } else {
        rendered.html
    };

    write_output(output, &html)?;
    Ok(())
}

fn newline(input: &Path, offset: usize, json: bool) -> Result<()> {
    let (_, content) = read_input(input)?;
    let out = newline_output(&content, offset, json)?;
    write_output(None, &out)?;
    Ok(())
}

/// What `newline` prints: the new buffer, or a JSON line with it.
fn newline_output(content: &str, offset: usize, json: bool) -> Result<String, CliError> {
    let len = content.chars().count();
    if offset > len {
        return Err(CliError::OffsetOutOfRange { offset, len });
    }

    let result = on_newline(content, offset);
    let changed = !result.is_noop();
    let (text, cursor) = result.apply(content, offset);

    if !json {
        return Ok(text);
    }
    let mut out = serde_json::to_string(&NewlineOutput {
        text,
        cursor,
        changed,
    })?;
    out.push('\n');
    Ok(out)
}

/// Counts as the status line shows them: over the pre-rendered text, or the
/// raw source for SVG documents.
fn document_stats(config: &Config, name: &str, content: &str) -> TextStats {
    render_document(name, content, &config.render).stats
}

/// Read a file, or stdin for `-`. Returns a display name with the content.
fn read_input(path: &Path) -> Result<(String, String), CliError> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        return Ok((DEFAULT_FILE_NAME.to_string(), content));
    }

    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
    Ok((name, content))
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, content).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        }),
        None => std::io::stdout()
            .lock()
            .write_all(content.as_bytes())
            .map_err(|source| CliError::Write {
                path: PathBuf::from("-"),
                source,
            }),
    }
}

/// `name` with a `.md` extension, or the default name.
fn markdown_file_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => {
            if name.ends_with(".md") {
                name.to_string()
            } else {
                format!("{name}.md")
            }
        }
        _ => DEFAULT_FILE_NAME.to_string(),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_names() {
        assert_eq!(markdown_file_name(None), "untitled.md");
        assert_eq!(markdown_file_name(Some("  ")), "untitled.md");
        assert_eq!(markdown_file_name(Some("notes")), "notes.md");
        assert_eq!(markdown_file_name(Some("notes.md")), "notes.md");
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from(["keepmark", "newline", "-", "--offset", "4", "--json"]).unwrap();
        match cli.command {
            Commands::Newline { offset, json, .. } => {
                assert_eq!(offset, 4);
                assert!(json);
            }
            _ => panic!("expected newline command"),
        }
    }

    #[test]
    fn newline_continues_list() {
        assert_eq!(newline_output("- a", 3, false).unwrap(), "- a\n- ");
        assert_eq!(
            newline_output("- a", 3, true).unwrap(),
            "{\"text\":\"- a\\n- \",\"cursor\":6,\"changed\":true}\n"
        );
    }

    #[test]
    fn newline_outside_list_inserts_plain_newline() {
        assert_eq!(newline_output("ab", 1, false).unwrap(), "a\nb");
        assert_eq!(
            newline_output("ab", 1, true).unwrap(),
            "{\"text\":\"a\\nb\",\"cursor\":2,\"changed\":false}\n"
        );
    }

    #[test]
    fn newline_rejects_offset_past_end() {
        let err = newline_output("강조", 3, false).unwrap_err();
        assert!(matches!(err, CliError::OffsetOutOfRange { offset: 3, len: 2 }));
        // the end itself is fine
        assert_eq!(newline_output("강조", 2, false).unwrap(), "강조\n");
    }

    #[test]
    fn stats_match_render() {
        let config = Config::default();
        let stats = document_stats(&config, "note.md", "**a** b");
        assert_eq!(stats, TextStats { words: 2, chars: 20 });

        let svg = "<svg> </svg>";
        let stats = document_stats(&config, "d.svg", svg);
        assert_eq!(stats, TextStats { words: 2, chars: 12 });
    }
}
