mod catalog;
mod cli;
mod cli_cmds;
mod code;
mod color;
mod config;
mod error;
mod extract;
mod harmony;
mod history;
mod matching;
mod service;
mod styles;
mod wheel;

use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::error::PaletteError;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HUEMATCH_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// 2 for rejected requests (bad input, unknown code), 1 for anything else.
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<PaletteError>() {
        Some(e) if e.is_client_error() => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(e) = err.downcast_ref::<PaletteError>() {
                tracing::debug!(status = e.status(), "request failed");
            }
            eprintln!("Error: {err:#}");
            exit_code(&err)
        }
    }
}
