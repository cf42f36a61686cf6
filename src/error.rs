// Error types for the account store, the transaction registry and the
// transaction flow.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures raised by an `AccountStore` backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("account number already exists: {0}")]
    DuplicateAccountNumber(String),

    #[error("stored balance for account {account_number} is not a decimal: {value}")]
    CorruptBalance {
        account_number: String,
        value: String,
    },

    #[error("database lock poisoned")]
    LockPoisoned,
}

/// Registration-time configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("transaction type registered twice: {0}")]
    DuplicateType(String),
}

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("unsupported transaction type: {0}")]
    UnsupportedType(String),

    #[error("{kind} amount must be positive")]
    NonPositiveAmount { kind: &'static str },

    #[error("insufficient funds for withdrawal: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },

    #[error("{kind} amount overflows the account balance")]
    Overflow { kind: &'static str },

    #[error("{kind} amount {amount} cannot be applied exactly to balance {balance}")]
    Precision {
        kind: &'static str,
        amount: Decimal,
        balance: Decimal,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TransactionError {
    /// Domain failures are reported to the caller as a FAILED outcome;
    /// anything else is an internal error.
    pub fn is_domain(&self) -> bool {
        !matches!(self, TransactionError::Store(_))
    }
}
