//! Entry point for the `roam` command-line interface.
#![forbid(unsafe_code)]

use env_logger::Env;
use roam_cli::{CliError, run};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    match run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("roam: {err}");
            std::process::exit(1);
        }
    }
}
