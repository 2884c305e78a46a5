use anyhow::Result;
use clap::Parser;
use grz_cli::args::CliArgs;
use grz_cli::{driver, tracing_config};
use std::io::Write;

fn main() -> Result<()> {
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let report = driver::run(&args)?;
    let text = report.render(args.format)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
