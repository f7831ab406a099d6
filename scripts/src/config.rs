//! Resolution of the deployment configuration from an environment snapshot.
//!
//! The process environment is captured exactly once, in `main`, into an
//! [`EnvSnapshot`]. Everything else resolves against that snapshot.

use std::{
    collections::HashMap,
    ffi::OsString,
    fmt::{self, Display},
};

use alloy::transports::http::reqwest::Url;
use clap::ValueEnum;

use crate::constants::{
    ALCHEMY_MAINNET_RPC_URL_ENV_VAR, BYTECODE_HASH, ETHERSCAN_API_KEY_ENV_VAR,
    ETHERSCAN_API_KEY_PLACEHOLDER, GAS_REPORT_CURRENCY, GAS_REPORT_OUTPUT_FILE,
    LOCALHOST_CHAIN_ID, MAINNET_CHAIN_ID, MAINNET_RPC_URL_ENV_VAR, MAINNET_RPC_URL_PLACEHOLDER,
    OPTIMIZER_RUNS, PRIVATE_KEY_ENV_VAR, REPORT_GAS_ENV_VAR, SEPOLIA_CHAIN_ID,
    SEPOLIA_RPC_URL_ENV_VAR, SOLC_VERSION, TSCS_CHAIN_ID, TSCS_RPC_URL_ENV_VAR,
};

// ---------------
// | Environment |
// ---------------

/// An immutable copy of the environment variables the scripts care about
#[derive(Clone, Debug, Default)]
pub struct EnvSnapshot {
    /// The captured variables
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    /// Build a snapshot from raw OS strings, dropping any variable whose key
    /// or value is not valid UTF-8
    pub fn from_os_pairs(pairs: impl IntoIterator<Item = (OsString, OsString)>) -> Self {
        Self::from_pairs(
            pairs
                .into_iter()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Build a snapshot from explicit key/value pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self { vars }
    }

    /// Get a variable if it is set, even to the empty string
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Get a variable only if it is set to a non-empty value
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

// ------------
// | Networks |
// ------------

/// The networks a contract can be deployed to
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NetworkName {
    /// A local development node
    Localhost,
    /// The Super Smart Chain testnet
    Tscs,
    /// The Sepolia testnet
    Sepolia,
    /// Ethereum mainnet
    Mainnet,
}

impl NetworkName {
    /// Every supported network, in declaration order
    pub const ALL: [NetworkName; 4] = [
        NetworkName::Localhost,
        NetworkName::Tscs,
        NetworkName::Sepolia,
        NetworkName::Mainnet,
    ];

    /// The fixed chain ID of the network
    pub fn chain_id(self) -> u64 {
        match self {
            NetworkName::Localhost => LOCALHOST_CHAIN_ID,
            NetworkName::Tscs => TSCS_CHAIN_ID,
            NetworkName::Sepolia => SEPOLIA_CHAIN_ID,
            NetworkName::Mainnet => MAINNET_CHAIN_ID,
        }
    }

    /// Whether the network is a local development node
    pub fn is_local(self) -> bool {
        self == NetworkName::Localhost
    }
}

impl Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkName::Localhost => write!(f, "localhost"),
            NetworkName::Tscs => write!(f, "tscs"),
            NetworkName::Sepolia => write!(f, "sepolia"),
            NetworkName::Mainnet => write!(f, "mainnet"),
        }
    }
}

/// The resolved connection parameters for one deployment target
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkProfile {
    /// The network this profile targets
    pub name: NetworkName,
    /// The RPC endpoint, absent for the local node
    pub url: Option<String>,
    /// The signing credentials, zero or one hex private keys
    pub accounts: Vec<String>,
    /// The chain ID transactions are signed for
    pub chain_id: u64,
}

impl NetworkProfile {
    /// Resolve the profile for the given network from the environment.
    ///
    /// Never fails: a missing credential yields an empty account list and is
    /// only reported once a transaction is submitted.
    pub fn resolve(name: NetworkName, env: &EnvSnapshot) -> Self {
        let url = match name {
            NetworkName::Localhost => None,
            NetworkName::Tscs => Some(env.get(TSCS_RPC_URL_ENV_VAR).unwrap_or_default()),
            NetworkName::Sepolia => Some(env.get(SEPOLIA_RPC_URL_ENV_VAR).unwrap_or_default()),
            NetworkName::Mainnet => Some(
                env.get_non_empty(MAINNET_RPC_URL_ENV_VAR)
                    .or_else(|| env.get_non_empty(ALCHEMY_MAINNET_RPC_URL_ENV_VAR))
                    .unwrap_or(MAINNET_RPC_URL_PLACEHOLDER),
            ),
        };

        // The local node signs with its own unlocked accounts
        let accounts = match name {
            NetworkName::Localhost => vec![],
            _ => env
                .get(PRIVATE_KEY_ENV_VAR)
                .map(|key| vec![key.to_string()])
                .unwrap_or_default(),
        };

        Self {
            name,
            url: url.map(str::to_string),
            accounts,
            chain_id: name.chain_id(),
        }
    }
}

impl Display for NetworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        match &self.url {
            Some(url) => writeln!(f, "\turl: {}", redact_url(url))?,
            None => writeln!(f, "\turl: <local node>")?,
        }
        // Credentials are never printed
        writeln!(f, "\taccounts: {} configured", self.accounts.len())?;
        write!(f, "\tchain id: {}", self.chain_id)
    }
}

// ------------------
// | Project Config |
// ------------------

/// The optimizer settings the artifacts are compiled with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptimizerSettings {
    /// Whether the optimizer is enabled
    pub enabled: bool,
    /// The number of optimizer runs
    pub runs: u64,
}

/// The compiler settings the artifacts are compiled with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerSettings {
    /// The Solidity compiler version
    pub version: String,
    /// The optimizer settings
    pub optimizer: OptimizerSettings,
    /// The metadata bytecode hash setting
    pub bytecode_hash: String,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            version: SOLC_VERSION.to_string(),
            optimizer: OptimizerSettings {
                enabled: true,
                runs: OPTIMIZER_RUNS,
            },
            bytecode_hash: BYTECODE_HASH.to_string(),
        }
    }
}

/// Block explorer settings, used when verifying deployed contracts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// The explorer API key
    pub api_key: String,
    /// The networks the API key applies to
    pub networks: Vec<NetworkName>,
}

/// Gas reporter settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GasReporterConfig {
    /// Whether gas usage is reported after a deployment
    pub enabled: bool,
    /// The currency costs are denominated in
    pub currency: String,
    /// The file the report is appended to
    pub output_file: String,
}

/// The complete configuration, constructed once at startup
#[derive(Clone, Debug)]
pub struct DeployConfig {
    /// The profiles of every supported network, indexed by [`NetworkName`]
    pub networks: [NetworkProfile; 4],
    /// The compiler settings
    pub compiler: CompilerSettings,
    /// The block explorer settings
    pub explorer: ExplorerConfig,
    /// The gas reporter settings
    pub gas_reporter: GasReporterConfig,
}

impl DeployConfig {
    /// Resolve the full configuration from the environment
    pub fn from_env(env: &EnvSnapshot) -> Self {
        let networks = NetworkName::ALL.map(|name| NetworkProfile::resolve(name, env));

        let explorer = ExplorerConfig {
            api_key: env
                .get_non_empty(ETHERSCAN_API_KEY_ENV_VAR)
                .unwrap_or(ETHERSCAN_API_KEY_PLACEHOLDER)
                .to_string(),
            networks: vec![NetworkName::Sepolia, NetworkName::Mainnet],
        };

        let gas_reporter = GasReporterConfig {
            enabled: env.get(REPORT_GAS_ENV_VAR).is_some_and(is_truthy),
            currency: GAS_REPORT_CURRENCY.to_string(),
            output_file: GAS_REPORT_OUTPUT_FILE.to_string(),
        };

        Self {
            networks,
            compiler: CompilerSettings::default(),
            explorer,
            gas_reporter,
        }
    }

    /// Get the resolved profile for the given network
    pub fn network(&self, name: NetworkName) -> &NetworkProfile {
        &self.networks[name as usize]
    }
}

impl Display for DeployConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "compiler: solc {}", self.compiler.version)?;
        writeln!(
            f,
            "\toptimizer: enabled={} runs={}",
            self.compiler.optimizer.enabled, self.compiler.optimizer.runs
        )?;
        writeln!(f, "\tbytecode hash: {}", self.compiler.bytecode_hash)?;

        writeln!(f, "networks:")?;
        for profile in &self.networks {
            writeln!(f, "{}", profile)?;
        }

        let explorer_networks: Vec<String> =
            self.explorer.networks.iter().map(ToString::to_string).collect();
        let api_key_status = if self.explorer.api_key == ETHERSCAN_API_KEY_PLACEHOLDER {
            "placeholder"
        } else {
            "configured"
        };
        writeln!(
            f,
            "explorer: api key {} for {}",
            api_key_status,
            explorer_networks.join(", ")
        )?;

        write!(
            f,
            "gas reporter: enabled={} currency={} output={}",
            self.gas_reporter.enabled, self.gas_reporter.currency, self.gas_reporter.output_file
        )
    }
}

/// Render an RPC URL without its userinfo, path or query, any of which may
/// carry a provider API key
fn redact_url(url: &str) -> String {
    if url.is_empty() {
        return "<unset>".to_string();
    }

    let Ok(parsed) = Url::parse(url) else {
        return "<invalid url>".to_string();
    };
    let Some(host) = parsed.host_str() else {
        return format!("{}://<redacted>", parsed.scheme());
    };

    let mut rendered = format!("{}://{}", parsed.scheme(), host);
    if let Some(port) = parsed.port() {
        rendered.push_str(&format!(":{}", port));
    }

    let has_secret_parts = !parsed.username().is_empty()
        || parsed.password().is_some()
        || parsed.path() != "/"
        || parsed.query().is_some()
        || parsed.fragment().is_some();
    if has_secret_parts {
        rendered.push_str("/<redacted>");
    }

    rendered
}

/// Whether a toggle variable's value should be read as "on"
fn is_truthy(value: &str) -> bool {
    !value.is_empty() && !value.eq_ignore_ascii_case("false") && value != "0"
}
