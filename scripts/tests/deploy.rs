use std::{
    fs, io,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use alloy::primitives::{Address, Bytes, TxHash};
use eyre::Result;
use scripts::{
    artifacts::ArtifactStore,
    client::{ChainClient, DeploymentReceipt},
    config::{EnvSnapshot, NetworkName, NetworkProfile},
    errors::ScriptError,
    runner::{deploy_contract, exit_code},
};
use serde_json::json;
use tempfile::TempDir;
use tracing::subscriber::DefaultGuard;

/// The creation bytecode written into test artifacts
const TEST_BYTECODE: &str = "0x6080604052348015600f57600080fd5b50";

// ----------------
// | TEST HELPERS |
// ----------------

/// An in-memory chain that mines every creation immediately,
/// assigning each one a fresh address
#[derive(Default)]
struct SimulatedChain {
    /// The number of creation transactions submitted so far
    nonce: AtomicU64,
    /// The init code of every submitted creation
    submitted: Mutex<Vec<Bytes>>,
    /// Whether submissions should be rejected
    reject: bool,
}

impl SimulatedChain {
    fn rejecting() -> Self {
        Self {
            reject: true,
            ..Default::default()
        }
    }

    fn submissions(&self) -> Vec<Bytes> {
        self.submitted.lock().unwrap().clone()
    }

    /// The address the chain assigns to the creation with the given nonce
    fn address_for(nonce: u64) -> Address {
        Address::left_padding_from(&(nonce + 1).to_be_bytes())
    }
}

impl ChainClient for SimulatedChain {
    async fn submit_creation(&self, init_code: Bytes) -> Result<TxHash, ScriptError> {
        if self.reject {
            return Err(ScriptError::Submission("insufficient funds".to_string()));
        }

        self.submitted.lock().unwrap().push(init_code);
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        Ok(TxHash::left_padding_from(&nonce.to_be_bytes()))
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<DeploymentReceipt, ScriptError> {
        let nonce = u64::from_be_bytes(tx_hash[24..].try_into().unwrap());
        Ok(DeploymentReceipt {
            tx_hash,
            contract_address: Self::address_for(nonce),
            block_number: Some(nonce + 1),
            gas_used: 100_000,
            effective_gas_price: 1,
        })
    }
}

/// A log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route log output on the current thread into a buffer until the guard drops
fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    (logs, tracing::subscriber::set_default(subscriber))
}

/// Write a compiled `ApolloToken` artifact into a fresh artifacts directory
fn setup_artifacts() -> Result<TempDir> {
    let dir = TempDir::new()?;
    let artifact_dir = dir.path().join("contracts").join("ApolloToken.sol");
    fs::create_dir_all(&artifact_dir)?;
    fs::write(
        artifact_dir.join("ApolloToken.json"),
        json!({
            "contractName": "ApolloToken",
            "abi": [],
            "bytecode": TEST_BYTECODE,
        })
        .to_string(),
    )?;

    Ok(dir)
}

fn localhost() -> NetworkProfile {
    NetworkProfile::resolve(NetworkName::Localhost, &EnvSnapshot::default())
}

// ---------
// | TESTS |
// ---------

#[tokio::test]
async fn test_deploy_reports_chain_address() -> Result<()> {
    let dir = setup_artifacts()?;
    let chain = SimulatedChain::default();
    let (logs, _guard) = capture_logs();

    let result = deploy_contract(
        &localhost(),
        &ArtifactStore::new(dir.path()),
        &chain,
        "ApolloToken",
    )
    .await;
    assert_eq!(exit_code(&result), 0);

    let receipt = result?;
    assert_eq!(receipt.contract_address, SimulatedChain::address_for(0));
    assert_eq!(chain.submissions(), vec![TEST_BYTECODE.parse::<Bytes>()?]);

    let expected = format!("`ApolloToken` deployed at {:#x}", receipt.contract_address);
    assert!(logs.contents().contains(&expected), "{}", logs.contents());

    Ok(())
}

#[tokio::test]
async fn test_missing_artifact_submits_nothing() -> Result<()> {
    let dir = setup_artifacts()?;
    let chain = SimulatedChain::default();
    let (logs, _guard) = capture_logs();

    let result = deploy_contract(
        &localhost(),
        &ArtifactStore::new(dir.path()),
        &chain,
        "NeverCompiled",
    )
    .await;

    assert!(matches!(result, Err(ScriptError::ArtifactNotFound(_))));
    assert_eq!(exit_code(&result), 1);
    assert!(chain.submissions().is_empty());

    let logs = logs.contents();
    let error_line = logs
        .lines()
        .find(|line| line.contains("ERROR"))
        .ok_or_else(|| eyre::eyre!("no error logged: {logs}"))?;
    assert!(error_line.contains("artifact not found"), "{error_line}");
    assert!(error_line.contains("NeverCompiled"), "{error_line}");
    assert!(!logs.contains("Deploying"));

    Ok(())
}

#[tokio::test]
async fn test_submission_failure_exits_nonzero() -> Result<()> {
    let dir = setup_artifacts()?;
    let chain = SimulatedChain::rejecting();

    let result = deploy_contract(
        &localhost(),
        &ArtifactStore::new(dir.path()),
        &chain,
        "ApolloToken",
    )
    .await;

    assert!(matches!(result, Err(ScriptError::Submission(_))));
    assert_eq!(exit_code(&result), 1);

    Ok(())
}

#[tokio::test]
async fn test_redeploy_yields_new_address() -> Result<()> {
    let dir = setup_artifacts()?;
    let artifacts = ArtifactStore::new(dir.path());
    let chain = SimulatedChain::default();
    let profile = localhost();

    let first = deploy_contract(&profile, &artifacts, &chain, "ApolloToken").await?;
    let second = deploy_contract(&profile, &artifacts, &chain, "ApolloToken").await?;

    assert_ne!(first.contract_address, second.contract_address);
    assert_eq!(chain.submissions().len(), 2);

    Ok(())
}
