//! The deployment procedure

use tracing::{error, info};

use crate::{
    artifacts::ArtifactStore,
    client::{ChainClient, DeploymentReceipt},
    config::NetworkProfile,
    constants::{EXIT_FAILURE, EXIT_SUCCESS},
    errors::ScriptError,
};

/// Deploy the named contract to the given network with no constructor arguments,
/// returning the receipt of the confirmed creation.
///
/// Every call creates a new contract instance; nothing is deduplicated.
pub async fn deploy_contract(
    profile: &NetworkProfile,
    artifacts: &ArtifactStore,
    client: &impl ChainClient,
    contract_name: &str,
) -> Result<DeploymentReceipt, ScriptError> {
    let artifact = artifacts.find(contract_name)?;

    info!("Deploying `{}` to {}", contract_name, profile.name);
    let tx_hash = client.submit_creation(artifact.bytecode).await?;
    info!("Creation transaction submitted: {:#x}", tx_hash);

    let receipt = client.await_confirmation(tx_hash).await?;
    match receipt.block_number {
        Some(block) => info!(
            "`{}` deployed at {:#x} in block {}",
            contract_name, receipt.contract_address, block
        ),
        None => info!(
            "`{}` deployed at {:#x}",
            contract_name, receipt.contract_address
        ),
    }

    Ok(receipt)
}

/// Log the outcome of a run and map it to a process exit code
pub fn exit_code<T>(result: &Result<T, ScriptError>) -> u8 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            error!("{}", e);
            EXIT_FAILURE
        }
    }
}
