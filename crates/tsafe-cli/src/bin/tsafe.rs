#![allow(clippy::print_stderr)]

use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;

use tsafe_cli::args::CliArgs;
use tsafe_cli::driver;

fn main() -> ExitCode {
    // Zero cost unless TSAFE_LOG or RUST_LOG is set.
    tsafe_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let stdout = std::io::stdout();
    let color = !args.no_color && stdout.is_terminal();
    let mut out = stdout.lock();

    match driver::run(&args, color, &mut out) {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(driver::EXIT_FAILURE)
        }
    }
}
