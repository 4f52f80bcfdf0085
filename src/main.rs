use anyhow::Result;
use patgen::cli::{Cli, Commands};
use patgen::commands::{self, CommandOutcome};
use patgen::observability::init_tracing;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = patgen::cli::parse_args();
    init_tracing(cli.command.options().verbosity);

    let outcome = dispatch(cli)?;
    Ok(exit_code(&outcome))
}

fn dispatch(cli: Cli) -> Result<CommandOutcome> {
    match cli.command {
        Commands::Generate { src, out, options } => {
            let outcome = commands::run_generate(&src, &out, &options)?;
            for name in &outcome.emitted {
                println!("{}", commands::unit_path(&out, name).display());
            }
            Ok(outcome)
        }
        Commands::Check { src, options } => {
            let outcome = commands::run_check(&src, &options)?;
            for name in &outcome.emitted {
                println!("{}", name.dotted());
            }
            Ok(outcome)
        }
    }
}

fn exit_code(outcome: &CommandOutcome) -> ExitCode {
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "patgen: {} error(s), {} warning(s)",
            outcome.errors, outcome.warnings
        );
        ExitCode::FAILURE
    }
}
