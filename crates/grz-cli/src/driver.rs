//! Command execution.
//!
//! Each command loads the fixture, builds a class table from it and produces
//! a [`Report`]: one entry per answered question.

use crate::args::{CliArgs, Command, OutputFormat};
use crate::fixture::Fixture;
use anyhow::{Context, Result, bail};
use grz_solver::{Hierarchy, LubCalculator, SearchScope, SolverConfig, TypeFormatter, TypeValue};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub input: String,
    pub output: String,
}

impl ReportEntry {
    fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub command: &'static str,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.input);
            out.push_str(": ");
            out.push_str(&entry.output);
            out.push('\n');
        }
        out
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
                json.push('\n');
                Ok(json)
            }
        }
    }
}

/// Solver configuration from `path`, or the defaults.
pub fn load_config(path: Option<&Path>) -> Result<SolverConfig> {
    let Some(path) = path else {
        return Ok(SolverConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: SolverConfig = serde_json::from_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(?config, "Loaded solver config");
    Ok(config)
}

pub fn run(args: &CliArgs) -> Result<Report> {
    let config = load_config(args.config.as_deref())?;
    let fixture = Fixture::load(args.command.fixture())?;
    run_fixture(&args.command, &fixture, &config)
}

/// Run `command` against an already loaded fixture.
pub fn run_fixture(command: &Command, fixture: &Fixture, config: &SolverConfig) -> Result<Report> {
    let table = fixture.build_table()?;
    let types = fixture.parse_types(&table)?;
    info!(
        command = command.name(),
        classes = fixture.classes.len(),
        types = types.len(),
        "Running command"
    );

    let scope = SearchScope::all();
    let formatter = TypeFormatter::new(&table, scope).with_config(config);
    let inputs = fixture.types.iter().map(String::as_str).zip(&types);

    let entries = match command {
        Command::Render { presentable, .. } => {
            let formatter = if *presentable {
                formatter.presentable()
            } else {
                formatter
            };
            inputs
                .map(|(text, ty)| ReportEntry::new(text, formatter.text(ty)))
                .collect()
        }
        Command::Lub { .. } => {
            let lub = LubCalculator::new(&table, scope).with_config(config);
            let joined = lub.lub_all(types.iter().map(Some));
            vec![ReportEntry::new(
                fixture.types.join(" | "),
                formatter.canonical_text(&joined),
            )]
        }
        Command::Params { .. } => inputs
            .map(|(text, ty)| {
                let params = ty.parameters(&table, &scope);
                ReportEntry::new(text, parameter_text(&formatter, &params))
            })
            .collect(),
        Command::Assignable { .. } => {
            let Some((target, sources)) = types.split_first() else {
                bail!("assignable needs a target type");
            };
            let hierarchy = Hierarchy::new(&table, scope);
            let target_text = &fixture.types[0];
            fixture.types[1..]
                .iter()
                .zip(sources)
                .map(|(text, source)| {
                    ReportEntry::new(
                        format!("{target_text} <- {text}"),
                        hierarchy.is_assignable(target, source).to_string(),
                    )
                })
                .collect()
        }
    };

    Ok(Report {
        command: command.name(),
        entries,
    })
}

/// `[A, B]`, unknown parameters as `?`.
fn parameter_text(formatter: &TypeFormatter<'_>, params: &[Option<TypeValue>]) -> String {
    let rendered: Vec<String> = params
        .iter()
        .map(|param| match param {
            Some(ty) => formatter.canonical_text(ty),
            None => "?".to_string(),
        })
        .collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
