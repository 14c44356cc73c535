use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use facade_codegen::GeneratorConfig;
use facade_schema::TablePath;

mod log;

pub(crate) use log::LogLevel;

#[derive(Debug, Parser)]
#[command(name = "facade", version)]
#[command(arg_required_else_help = true)]
/// Generates Rust facades for the tables of a database
pub(crate) struct Args {
    #[command(subcommand)]
    pub command: Command,
    /// Path to the TOML generator configuration
    #[arg(long, short, global = true, env = "FACADE_CONFIG")]
    pub config: Option<PathBuf>,
    /// Master template to generate from instead of the bundled one
    #[arg(long, global = true)]
    pub template: Option<PathBuf>,
    /// Character set of the generated files, overrides the configuration
    #[arg(long, global = true)]
    pub charset: Option<String>,
    /// Pipe generated code through rustfmt
    #[arg(long, global = true)]
    pub rustfmt: bool,
    /// Set the logging level
    #[arg(long = "log", global = true, env = "FACADE_LOG")]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Generate every table of a schema
    Build(BuildCommand),
    /// Generate the given tables and every table they reference
    Generate(GenerateCommand),
}

#[derive(Debug, Parser)]
pub(crate) struct BuildCommand {
    /// Path to the JSON schema definition
    #[arg(long, short)]
    pub definition: PathBuf,
    /// Name of the schema to generate
    #[arg(long, short)]
    pub schema: String,
    /// Directory the facades are written to
    #[arg(long, short)]
    pub output: PathBuf,
}

#[derive(Debug, Parser)]
pub(crate) struct GenerateCommand {
    /// Path to the JSON schema definition
    #[arg(long, short)]
    pub definition: PathBuf,
    /// Directory the facades are written to
    #[arg(long, short)]
    pub output: PathBuf,
    /// Tables to generate, as `schema.table`
    #[arg(long = "table", short, required = true)]
    pub tables: Vec<TablePath>,
}

impl Command {
    pub fn definition(&self) -> &Path {
        match self {
            Command::Build(command) => &command.definition,
            Command::Generate(command) => &command.definition,
        }
    }

    pub fn output(&self) -> &Path {
        match self {
            Command::Build(command) => &command.output,
            Command::Generate(command) => &command.output,
        }
    }
}

impl Args {
    pub fn log_level(&self) -> LogLevel {
        self.log_level.unwrap_or_default()
    }

    /// The configuration file, if any, with command line flags applied on top.
    pub fn generator_config(&self) -> anyhow::Result<GeneratorConfig> {
        let mut config = match self.config.as_deref() {
            Some(path) => GeneratorConfig::from_path(path).context("error loading configuration")?,
            None => GeneratorConfig::default(),
        };

        if let Some(charset) = &self.charset {
            config.charset = charset.clone();
        }

        if self.rustfmt {
            config.rustfmt = true;
        }

        Ok(config)
    }
}

pub(crate) fn parse() -> Args {
    Args::parse()
}
