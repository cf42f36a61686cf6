// Bank Accounts - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod account;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod logging;
pub mod registry;
pub mod request;
pub mod service;
pub mod store;
pub mod transaction;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use account::{Account, NewAccount};
pub use config::Config;
pub use db::{count_accounts, open_database, setup_database, SqliteAccountStore};
pub use error::{RegistryError, StoreError, TransactionError};
pub use import::{import_accounts, load_accounts_csv, ImportSummary};
pub use logging::{init_logging, parse_log_level};
pub use registry::{builtin_factories, TransactionRegistry};
pub use request::{AccountRequest, FieldErrors, TransactionRequest};
pub use service::{TransactionIntent, TransactionOutcome, TransactionService, TransactionStatus};
pub use store::AccountStore;
pub use transaction::{
    Deposit, DepositFactory, TransactionFactory, TransactionStrategy, Withdrawal, WithdrawalFactory,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
