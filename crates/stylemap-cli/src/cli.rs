use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use stylemap::{compile, Compiled, CssEngine, Description, Props, Sheet, SheetOptions, StyleEngine};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "stylemap")]
#[command(about = "Compiles stylesheet descriptions into CSS rule trees and variant class names")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a description and print the result
    Compile {
        /// Description file (.yaml, .yml or .json)
        input: PathBuf,

        /// What to print
        #[arg(short, long, value_enum, default_value_t = Emit::All)]
        emit: Emit,

        /// Serialization of rules, classes and all
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// JSON object used to evaluate dynamic values (requires `--emit css`)
        #[arg(long, value_name = "JSON")]
        props: Option<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that a description compiles
    Check {
        /// Description file (.yaml, .yml or .json)
        input: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// The normalized rule tree
    Rules,
    /// The variant name table
    Classes,
    /// CSS text from the reference engine
    Css,
    /// Rule tree and classes together
    All,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl Cli {
    /// The most verbose level that gets logged.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::ERROR;
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// Runs a parsed command line, writing results to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Commands::Compile {
            input,
            emit,
            format,
            props,
            output,
        } => {
            if props.is_some() && *emit != Emit::Css {
                bail!("--props only applies to --emit css");
            }
            let compiled = load_and_compile(input)?;
            let props = props.as_deref().map(parse_props).transpose()?;
            let text = render(&compiled, *emit, *format, props.as_ref())?;

            match output {
                Some(path) => {
                    std::fs::write(path, text)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "wrote output");
                }
                None => out.write_all(text.as_bytes())?,
            }
        }
        Commands::Check { input } => {
            let compiled = load_and_compile(input)?;
            writeln!(
                out,
                "{}: ok ({} classes, {} rules)",
                input.display(),
                compiled.classes().count(),
                compiled.rules().len()
            )?;
        }
    }
    Ok(())
}

fn load_and_compile(input: &Path) -> Result<Compiled> {
    let description = Description::from_path(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    tracing::info!(path = %input.display(), classes = description.len(), "loaded description");

    compile(&description)
        .map_err(|e| anyhow!("{} ({}): {}", e.kind(), e.code(), e))
        .with_context(|| format!("failed to compile {}", input.display()))
}

fn parse_props(text: &str) -> Result<Props> {
    serde_json::from_str(text).context("--props is not valid JSON")
}

fn render(
    compiled: &Compiled,
    emit: Emit,
    format: OutputFormat,
    props: Option<&Props>,
) -> Result<String> {
    match emit {
        Emit::Rules => serialize(compiled.rules(), format),
        Emit::Classes => serialize(compiled.variants(), format),
        Emit::All => serialize(compiled, format),
        Emit::Css => {
            let engine = CssEngine::new();
            let sheet = match props {
                Some(props) => {
                    let mut sheet = engine.create_sheet(compiled.rules(), SheetOptions::linked());
                    sheet.update(props).context("failed to evaluate dynamic values")?;
                    sheet
                }
                None => engine.create_sheet(compiled.rules(), SheetOptions::unlinked()),
            };
            Ok(sheet.to_css())
        }
    }
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(value)?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}
