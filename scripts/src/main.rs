use std::process::ExitCode;

use clap::Parser;
use scripts::{
    cli::Cli,
    config::{DeployConfig, EnvSnapshot},
    runner::exit_code,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let Cli {
        network,
        env_file,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A missing `.env` is fine, an explicitly requested one is not
    let dotenv_result = match &env_file {
        Some(path) => dotenvy::from_path(path).map(|_| ()),
        None => dotenvy::dotenv().map(|_| ()).or_else(|e| {
            if e.not_found() {
                Ok(())
            } else {
                Err(e)
            }
        }),
    };
    if let Err(e) = dotenv_result {
        tracing::error!("error loading env file: {}", e);
        return ExitCode::FAILURE;
    }

    let config = DeployConfig::from_env(&EnvSnapshot::from_process());

    let result = command.run(&config, network).await;
    ExitCode::from(exit_code(&result))
}
