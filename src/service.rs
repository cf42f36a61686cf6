// ⚙️ Transaction Service - the orchestrator
//
// resolve account → resolve factory → execute strategy → save
//
// The whole read-modify-write runs inside one IMMEDIATE SQLite transaction:
// it either commits in full or is rolled back. Concurrent writers to the same
// row are serialized by SQLite's write lock, not by anything here.

use rusqlite::{Connection, TransactionBehavior};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::account::Account;
use crate::db::SqliteAccountStore;
use crate::error::{StoreError, TransactionError};
use crate::registry::TransactionRegistry;
use crate::store::AccountStore;

// ============================================================================
// INTENT & OUTCOME
// ============================================================================

/// What the caller asked for. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionIntent {
    pub transaction_type: String,
    pub account_number: String,
    pub amount: Decimal,
}

impl TransactionIntent {
    pub fn new(
        transaction_type: impl Into<String>,
        account_number: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        TransactionIntent {
            transaction_type: transaction_type.into(),
            account_number: account_number.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Success,
    Failed,
}

/// Result handed back to the caller; the transaction type is echoed as submitted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    pub transaction_type: String,
    pub account_number: String,
    pub amount: Decimal,
    pub new_balance: Option<Decimal>,
    pub status: TransactionStatus,
    pub message: String,
}

impl TransactionOutcome {
    pub fn success(intent: &TransactionIntent, new_balance: Decimal) -> Self {
        TransactionOutcome {
            transaction_type: intent.transaction_type.clone(),
            account_number: intent.account_number.clone(),
            amount: intent.amount,
            new_balance: Some(new_balance),
            status: TransactionStatus::Success,
            message: "Transaction processed successfully".to_string(),
        }
    }

    pub fn failed(intent: &TransactionIntent, reason: &TransactionError) -> Self {
        TransactionOutcome {
            transaction_type: intent.transaction_type.clone(),
            account_number: intent.account_number.clone(),
            amount: intent.amount,
            new_balance: None,
            status: TransactionStatus::Failed,
            message: reason.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TransactionStatus::Success
    }
}

// ============================================================================
// TRANSACTION SERVICE
// ============================================================================

pub struct TransactionService {
    registry: TransactionRegistry,
}

impl TransactionService {
    pub fn new(registry: TransactionRegistry) -> Self {
        TransactionService { registry }
    }

    pub fn transaction_types(&self) -> Vec<String> {
        self.registry.transaction_types()
    }

    /// Run one transaction against `store` and return the saved account.
    ///
    /// Nothing is written unless the strategy succeeds. The caller owns the
    /// unit of work (see `process_transaction`).
    pub fn apply<S: AccountStore + ?Sized>(
        &self,
        store: &S,
        intent: &TransactionIntent,
    ) -> Result<Account, TransactionError> {
        let account = store
            .find_by_number(&intent.account_number)?
            .ok_or_else(|| TransactionError::AccountNotFound(intent.account_number.clone()))?;

        let factory = self.registry.resolve(&intent.transaction_type)?;

        let mut transaction = factory.create_transaction(intent.amount, account);
        debug!(
            transaction_type = transaction.transaction_type(),
            account_number = %intent.account_number,
            amount = %transaction.amount(),
            balance = %transaction.account().balance,
            "executing transaction"
        );
        transaction.execute()?;

        let updated = transaction.into_account();
        Ok(store.save(&updated)?)
    }

    /// Process a transaction as a single SQLite unit of work.
    ///
    /// Domain failures (unknown account, unsupported type, bad amount,
    /// insufficient funds) roll back and come back as a FAILED outcome.
    /// Storage failures roll back and are returned as `Err`.
    pub fn process_transaction(
        &self,
        conn: &mut Connection,
        intent: &TransactionIntent,
    ) -> Result<TransactionOutcome, StoreError> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let result = self.apply(&SqliteAccountStore::new(&tx), intent);

        match result {
            Ok(account) => {
                tx.commit()?;
                info!(
                    transaction_type = %intent.transaction_type,
                    account_number = %intent.account_number,
                    amount = %intent.amount,
                    new_balance = %account.balance,
                    "transaction committed"
                );
                Ok(TransactionOutcome::success(intent, account.balance))
            }
            Err(TransactionError::Store(e)) => {
                error!(
                    account_number = %intent.account_number,
                    error = %e,
                    "transaction aborted by storage error"
                );
                Err(e)
            }
            Err(e) => {
                tx.rollback()?;
                warn!(
                    transaction_type = %intent.transaction_type,
                    account_number = %intent.account_number,
                    amount = %intent.amount,
                    reason = %e,
                    "transaction rejected"
                );
                Ok(TransactionOutcome::failed(intent, &e))
            }
        }
    }
}
