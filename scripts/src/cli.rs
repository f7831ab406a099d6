//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, show_config},
    config::{DeployConfig, NetworkName},
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_CONTRACT_NAME},
    errors::ScriptError,
};

/// Deploy the token contract to an EVM network
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The network to deploy to
    #[arg(short, long, value_enum, default_value_t = NetworkName::Localhost)]
    pub network: NetworkName,

    /// A dotenv file to load before resolving the configuration,
    /// defaults to `.env` in the working directory when present
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The commands supported by the deploy scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy a contract with no constructor arguments
    Deploy(DeployArgs),
    /// Print the resolved configuration of every network
    ShowConfig,
}

impl Command {
    /// Run the command against the resolved configuration
    pub async fn run(self, config: &DeployConfig, network: NetworkName) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, config, network).await,
            Command::ShowConfig => {
                show_config(config);
                Ok(())
            }
        }
    }
}

/// Deploy a contract from its compiled artifact
#[derive(Args)]
pub struct DeployArgs {
    /// The name of the contract to deploy
    #[arg(short, long, default_value = DEFAULT_CONTRACT_NAME)]
    pub contract: String,

    /// The directory holding the compiled artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Path to a JSON file in which to record the deployed address
    #[arg(short, long)]
    pub deployments_path: Option<String>,
}
