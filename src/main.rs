use std::process::ExitCode;

pub mod cli;
use cli::dispatch;
pub mod config;
use config::app_config::load_config;
pub mod error;
pub mod http_probe;
use http_probe::prelude::*;
pub mod reporter;
use reporter::TerminalReporter;
pub mod runner;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut reporter = TerminalReporter::stdout();
    let code = dispatch(
        std::env::args_os(),
        load_config,
        HttpProber::new,
        &mut reporter,
        &mut std::io::stdout(),
    )
    .await;

    ExitCode::from(code)
}
