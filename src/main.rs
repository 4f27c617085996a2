use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use greenmatch::cli::Cli;
use greenmatch::output::print_report;
use greenmatch::runner::run_command;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn real_main() -> Result<bool> {
    let cli = Cli::parse();
    let report = run_command(&cli)?;
    print_report(cli.output, &report)?;
    Ok(report.succeeded())
}

fn main() {
    init_tracing();

    match real_main() {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
