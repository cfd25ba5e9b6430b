mod ui;

use std::process::ExitCode;

use clap::Parser;
use crate::ui::cli;
use jvmconnect_core::utils::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let args = cli::Args::parse();
    match cli::run_cli(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("jvmconnect: {e:#}");
            ExitCode::FAILURE
        }
    }
}
