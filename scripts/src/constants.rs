//! Constants used in the deploy scripts

// ---------------
// | Environment |
// ---------------

/// The environment variable holding the deployer's private key
pub const PRIVATE_KEY_ENV_VAR: &str = "TSCS_PRIVATE_KEY";

/// The environment variable holding the Super Smart Chain testnet RPC URL
pub const TSCS_RPC_URL_ENV_VAR: &str = "SUPER_SMART_CHAIN_TESTNET_RPC_URL";

/// The environment variable holding the Sepolia RPC URL
pub const SEPOLIA_RPC_URL_ENV_VAR: &str = "SEPOLIA_RPC_URL";

/// The environment variable holding the mainnet RPC URL
pub const MAINNET_RPC_URL_ENV_VAR: &str = "MAINNET_RPC_URL";

/// The alternate environment variable holding an Alchemy mainnet RPC URL,
/// consulted when [`MAINNET_RPC_URL_ENV_VAR`] is unset
pub const ALCHEMY_MAINNET_RPC_URL_ENV_VAR: &str = "ALCHEMY_MAINNET_RPC_URL";

/// The environment variable holding the block explorer API key
pub const ETHERSCAN_API_KEY_ENV_VAR: &str = "ETHERSCAN_API_KEY";

/// The environment variable toggling the gas reporter
pub const REPORT_GAS_ENV_VAR: &str = "REPORT_GAS";

// -------------
// | Fallbacks |
// -------------

/// The placeholder mainnet RPC URL used when no mainnet variable is set
pub const MAINNET_RPC_URL_PLACEHOLDER: &str = "https://eth-mainnet.alchemyapi.io/v2/your-api-key";

/// The placeholder explorer API key used when none is set
pub const ETHERSCAN_API_KEY_PLACEHOLDER: &str = "Your etherscan API key";

/// The RPC URL of a local development node
pub const DEFAULT_LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

// -------------
// | Chain IDs |
// -------------

/// The chain ID of a local development node
pub const LOCALHOST_CHAIN_ID: u64 = 31337;

/// The chain ID of the Super Smart Chain testnet
pub const TSCS_CHAIN_ID: u64 = 1969;

/// The chain ID of the Sepolia testnet
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// The chain ID of Ethereum mainnet
pub const MAINNET_CHAIN_ID: u64 = 1;

// ------------
// | Compiler |
// ------------

/// The Solidity compiler version the artifacts are built with
pub const SOLC_VERSION: &str = "0.8.19";

/// The number of optimizer runs the artifacts are built with
pub const OPTIMIZER_RUNS: u64 = 1_000_000;

/// The metadata bytecode hash setting the artifacts are built with
pub const BYTECODE_HASH: &str = "none";

// --------------
// | Deployment |
// --------------

/// The contract deployed when none is named
pub const DEFAULT_CONTRACT_NAME: &str = "ApolloToken";

/// The default directory holding compilation artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The artifacts subdirectory holding compiler build info, which is never
/// searched for contract artifacts
pub const BUILD_INFO_DIR: &str = "build-info";

/// The extension of a contract artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The deployments key in the deployments file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The exit code reported on a successful run
pub const EXIT_SUCCESS: u8 = 0;

/// The exit code reported on a failed run
pub const EXIT_FAILURE: u8 = 1;

// ----------------
// | Gas Reporter |
// ----------------

/// The currency the gas reporter denominates costs in
pub const GAS_REPORT_CURRENCY: &str = "USD";

/// The file the gas reporter writes to
pub const GAS_REPORT_OUTPUT_FILE: &str = "gas-report.txt";
