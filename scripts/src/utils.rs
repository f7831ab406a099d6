//! Utilities for recording the results of a deployment.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

use alloy::primitives::Address;
use serde_json::{Map, Value};

use crate::{
    client::DeploymentReceipt,
    config::{GasReporterConfig, NetworkName},
    constants::DEPLOYMENTS_KEY,
    errors::ScriptError,
};

/// The header written at the top of a fresh gas report
const GAS_REPORT_HEADER: &str = "contract | network | gas used | gas price (wei) | tx hash";

/// Parse the JSON contents of the deployments file
pub fn get_json_from_file(file_path: &str) -> Result<Value, ScriptError> {
    let file_contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    serde_json::from_str(&file_contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Record a deployed contract's address in the deployments file,
/// overwriting any previous address under the same key
pub fn write_deployed_address(
    file_path: &str,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !Path::new(file_path).exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path)?;

    let deployments = parsed_json
        .as_object_mut()
        .ok_or_else(|| {
            ScriptError::WriteDeployments("deployments file is not a JSON object".to_string())
        })?
        .entry(DEPLOYMENTS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    let deployments = deployments.as_object_mut().ok_or_else(|| {
        ScriptError::WriteDeployments(format!("`{}` is not a JSON object", DEPLOYMENTS_KEY))
    })?;
    deployments.insert(
        contract_key.to_string(),
        Value::String(format!("{address:#x}")),
    );

    let contents = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(file_path, contents).map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

    Ok(())
}

/// Append the gas usage of a deployment to the gas report
pub fn append_gas_report(
    config: &GasReporterConfig,
    contract_name: &str,
    network: NetworkName,
    receipt: &DeploymentReceipt,
) -> Result<(), ScriptError> {
    let is_new = !Path::new(&config.output_file).exists();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.output_file)
        .map_err(|e| ScriptError::GasReport(e.to_string()))?;

    if is_new {
        writeln!(file, "{}", GAS_REPORT_HEADER)
            .map_err(|e| ScriptError::GasReport(e.to_string()))?;
    }
    writeln!(
        file,
        "{} | {} | {} | {} | {:#x}",
        contract_name, network, receipt.gas_used, receipt.effective_gas_price, receipt.tx_hash
    )
    .map_err(|e| ScriptError::GasReport(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use alloy::primitives::{Address, TxHash};
    use eyre::Result;
    use tempfile::TempDir;

    use super::{append_gas_report, get_json_from_file, write_deployed_address};
    use crate::{
        client::DeploymentReceipt,
        config::{GasReporterConfig, NetworkName},
    };

    #[test]
    fn test_write_deployed_address_overwrites() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("deployments.json");
        let path = path.to_str().unwrap();

        let first = Address::with_last_byte(1);
        let second = Address::with_last_byte(2);
        write_deployed_address(path, "ApolloToken", first)?;
        write_deployed_address(path, "OtherToken", first)?;
        write_deployed_address(path, "ApolloToken", second)?;

        let parsed = get_json_from_file(path)?;
        let deployments = &parsed["deployments"];
        assert_eq!(deployments["ApolloToken"], format!("{second:#x}"));
        assert_eq!(deployments["OtherToken"], format!("{first:#x}"));
        assert!(deployments["Missing"].is_null());

        Ok(())
    }

    #[test]
    fn test_gas_report_appends() -> Result<()> {
        let dir = TempDir::new()?;
        let output_file = dir.path().join("gas-report.txt");
        let config = GasReporterConfig {
            enabled: true,
            currency: "USD".to_string(),
            output_file: output_file.to_str().unwrap().to_string(),
        };
        let receipt = DeploymentReceipt {
            tx_hash: TxHash::with_last_byte(7),
            contract_address: Address::with_last_byte(1),
            block_number: Some(1),
            gas_used: 21_000,
            effective_gas_price: 1_000_000_000,
        };

        append_gas_report(&config, "ApolloToken", NetworkName::Sepolia, &receipt)?;
        append_gas_report(&config, "ApolloToken", NetworkName::Sepolia, &receipt)?;

        let report = fs::read_to_string(&output_file)?;
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("contract"));
        assert!(lines[1].starts_with("ApolloToken | sepolia | 21000 | 1000000000 | 0x"));

        Ok(())
    }
}
