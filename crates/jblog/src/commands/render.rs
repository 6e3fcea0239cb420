//! `jblog render` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use jblog_config::{CliSettings, Config};
use jblog_markdown::MarkdownRenderer;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin).
    file: Option<PathBuf>,

    /// Write HTML to this file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover jblog.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Let markdown rules apply inside code blocks and spans.
    #[arg(long)]
    no_protect_code: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or reading/writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            protect_code: self.no_protect_code.then_some(false),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let renderer = MarkdownRenderer::with_options(config.render);

        let markdown = read_input(self.file.as_deref())?;
        let html = renderer.render(&markdown);

        match &self.output {
            Some(path) => {
                std::fs::write(path, &html)?;
                Output::new().success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.write_all(b"\n")?;
            }
        }

        Ok(())
    }
}

/// Read markdown from `file`, or from stdin when no file is given.
fn read_input(file: Option<&Path>) -> Result<String, std::io::Error> {
    match file {
        Some(path) => {
            tracing::info!(path = %path.display(), "Reading markdown");
            std::fs::read_to_string(path)
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
