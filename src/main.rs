//! CLI binary for `casa_gestao`.
//!
//! This binary is a thin wrapper that parses arguments and delegates to the
//! library.

use casa_gestao::cli::{run, Cli};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = run(cli);

    for line in &output.stdout {
        println!("{line}");
    }
    for line in &output.stderr {
        eprintln!("{line}");
    }

    output.exit_code
}
