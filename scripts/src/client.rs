//! The chain client through which creation transactions are submitted

use std::{future::Future, str::FromStr};

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, TxHash},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::debug;

use crate::{
    config::NetworkProfile,
    constants::{DEFAULT_LOCAL_RPC_URL, PRIVATE_KEY_ENV_VAR},
    errors::ScriptError,
};

/// The outcome of a confirmed contract creation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentReceipt {
    /// The hash of the creation transaction
    pub tx_hash: TxHash,
    /// The address of the deployed contract
    pub contract_address: Address,
    /// The block the transaction was mined in
    pub block_number: Option<u64>,
    /// The gas used by the creation transaction
    pub gas_used: u64,
    /// The price paid per unit of gas, in wei
    pub effective_gas_price: u128,
}

impl TryFrom<TransactionReceipt> for DeploymentReceipt {
    type Error = ScriptError;

    fn try_from(receipt: TransactionReceipt) -> Result<Self, Self::Error> {
        if !receipt.status() {
            return Err(ScriptError::Submission(format!(
                "creation transaction {:#x} reverted",
                receipt.transaction_hash
            )));
        }

        let contract_address = receipt.contract_address.ok_or_else(|| {
            ScriptError::Submission(format!(
                "receipt for {:#x} has no contract address",
                receipt.transaction_hash
            ))
        })?;

        Ok(Self {
            tx_hash: receipt.transaction_hash,
            contract_address,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
        })
    }
}

/// A client able to create contracts on a chain
pub trait ChainClient {
    /// Submit a contract-creation transaction carrying the given init code,
    /// returning its hash once the node has accepted it
    fn submit_creation(
        &self,
        init_code: Bytes,
    ) -> impl Future<Output = Result<TxHash, ScriptError>>;

    /// Wait until the given creation transaction is mined
    fn await_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = Result<DeploymentReceipt, ScriptError>>;
}

/// A [`ChainClient`] speaking JSON-RPC over HTTP to the node of a network profile
pub struct RpcChainClient {
    /// The profile of the target network
    profile: NetworkProfile,
}

impl RpcChainClient {
    /// Create a client for the given network.
    ///
    /// Nothing is validated here, a malformed URL or key surfaces on submission.
    pub fn new(profile: NetworkProfile) -> Self {
        Self { profile }
    }

    /// Build a provider for the profile, signing locally when a key is configured
    fn provider(&self) -> Result<DynProvider, ScriptError> {
        let url_str = self.profile.url.as_deref().unwrap_or(DEFAULT_LOCAL_RPC_URL);
        let url = Url::parse(url_str).map_err(|e| {
            ScriptError::Submission(format!(
                "invalid RPC URL {:?} for {}: {}",
                url_str, self.profile.name, e
            ))
        })?;

        let builder = ProviderBuilder::new();
        let provider = match self.profile.accounts.first() {
            Some(key) => {
                let signer = PrivateKeySigner::from_str(key)
                    .map_err(|e| ScriptError::Submission(format!("invalid private key: {}", e)))?;
                DynProvider::new(builder.wallet(EthereumWallet::from(signer)).on_http(url))
            }
            None => DynProvider::new(builder.on_http(url)),
        };

        Ok(provider)
    }
}

impl ChainClient for RpcChainClient {
    async fn submit_creation(&self, init_code: Bytes) -> Result<TxHash, ScriptError> {
        let has_key = !self.profile.accounts.is_empty();
        if !has_key && !self.profile.name.is_local() {
            return Err(ScriptError::Submission(format!(
                "no signing credential configured for {}, set {}",
                self.profile.name, PRIVATE_KEY_ENV_VAR
            )));
        }

        let provider = self.provider()?;

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::Submission(e.to_string()))?;
        if chain_id != self.profile.chain_id {
            return Err(ScriptError::Submission(format!(
                "node reports chain id {} but {} expects {}",
                chain_id, self.profile.name, self.profile.chain_id
            )));
        }

        let mut tx = TransactionRequest::default().with_deploy_code(init_code);
        if !has_key {
            // Without a key, the local node signs with its first unlocked account
            let from = provider
                .get_accounts()
                .await
                .map_err(|e| ScriptError::Submission(e.to_string()))?
                .first()
                .copied()
                .ok_or_else(|| {
                    ScriptError::Submission("local node exposes no accounts".to_string())
                })?;
            debug!("Sending from node-managed account {:#x}", from);
            tx = tx.with_from(from);
        }

        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::Submission(e.to_string()))?;

        Ok(*pending.tx_hash())
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<DeploymentReceipt, ScriptError> {
        let provider = self.provider()?;

        let receipt = PendingTransactionBuilder::new(provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::Submission(e.to_string()))?;

        DeploymentReceipt::try_from(receipt)
    }
}
