//! Implementations of the deploy script commands

use tracing::{debug, info};

use crate::{
    artifacts::ArtifactStore,
    cli::DeployArgs,
    client::RpcChainClient,
    config::{DeployConfig, NetworkName},
    errors::ScriptError,
    runner::deploy_contract,
    utils::{append_gas_report, write_deployed_address},
};

/// Deploy the requested contract, then record its address and gas usage
/// where configured
pub async fn deploy(
    args: DeployArgs,
    config: &DeployConfig,
    network: NetworkName,
) -> Result<(), ScriptError> {
    let profile = config.network(network);
    debug!(
        "Expecting artifacts from solc {} (optimizer: {}, runs: {})",
        config.compiler.version, config.compiler.optimizer.enabled, config.compiler.optimizer.runs
    );

    let artifacts = ArtifactStore::new(args.artifacts);
    let client = RpcChainClient::new(profile.clone());
    let receipt = deploy_contract(profile, &artifacts, &client, &args.contract).await?;

    if let Some(deployments_path) = &args.deployments_path {
        write_deployed_address(deployments_path, &args.contract, receipt.contract_address)?;
        info!("Recorded `{}` in {}", args.contract, deployments_path);
    }

    if config.gas_reporter.enabled {
        append_gas_report(&config.gas_reporter, &args.contract, network, &receipt)?;
    }

    Ok(())
}

/// Print the resolved configuration, with credentials redacted
pub fn show_config(config: &DeployConfig) {
    println!("{}", config);
}
