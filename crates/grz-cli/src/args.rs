use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the grz binary.
#[derive(Parser, Debug)]
#[command(
    name = "grz",
    version,
    about = "Structural type kernel for Groovy: render, join and inspect types"
)]
pub struct CliArgs {
    /// Solver configuration file (JSON, camelCase keys).
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the canonical text of every fixture type.
    Render {
        /// Fixture file with class declarations and type texts.
        fixture: PathBuf,

        /// Use simple class names instead of qualified ones.
        #[arg(long)]
        presentable: bool,
    },
    /// Print the least upper bound of all fixture types.
    Lub {
        fixture: PathBuf,
    },
    /// Print the type parameters of every fixture type.
    Params {
        fixture: PathBuf,
    },
    /// Check every fixture type after the first for assignability to the first.
    Assignable {
        fixture: PathBuf,
    },
}

impl Command {
    pub fn fixture(&self) -> &PathBuf {
        match self {
            Self::Render { fixture, .. }
            | Self::Lub { fixture }
            | Self::Params { fixture }
            | Self::Assignable { fixture } => fixture,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Render { .. } => "render",
            Self::Lub { .. } => "lub",
            Self::Params { .. } => "params",
            Self::Assignable { .. } => "assignable",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `input: output` line per entry.
    #[default]
    Text,
    /// A JSON report.
    Json,
}

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod tests;
