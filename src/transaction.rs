// 🔁 Transaction Strategies - polymorphic balance mutations
//
// Adding a new transaction kind = implement `TransactionStrategy` for it,
// give it a `TransactionFactory`, and list the factory in
// `registry::builtin_factories`. The orchestrator does not change.

use rust_decimal::Decimal;

use crate::account::Account;
use crate::error::TransactionError;

pub const DEPOSIT: &str = "DEPOSIT";
pub const WITHDRAWAL: &str = "WITHDRAWAL";

// ============================================================================
// CORE TRAITS
// ============================================================================

/// One kind of balance mutation bound to an amount and an account.
///
/// `execute` validates first and only then mutates, so a failed execute
/// leaves the held account exactly as it was. Nothing is persisted here.
pub trait TransactionStrategy: Send {
    fn execute(&mut self) -> Result<&Account, TransactionError>;

    fn amount(&self) -> Decimal;

    fn account(&self) -> &Account;

    /// Stable uppercase tag, e.g. "DEPOSIT"
    fn transaction_type(&self) -> &'static str;

    /// Hand the (possibly mutated) account back for persistence
    fn into_account(self: Box<Self>) -> Account;
}

/// Stateless constructor for one strategy kind
pub trait TransactionFactory: Send + Sync {
    fn create_transaction(&self, amount: Decimal, account: Account) -> Box<dyn TransactionStrategy>;

    fn transaction_type(&self) -> &'static str;
}

// ============================================================================
// DEPOSIT
// ============================================================================

#[derive(Debug, Clone)]
pub struct Deposit {
    amount: Decimal,
    account: Account,
}

impl Deposit {
    pub fn new(amount: Decimal, account: Account) -> Self {
        Deposit { amount, account }
    }
}

impl TransactionStrategy for Deposit {
    fn execute(&mut self) -> Result<&Account, TransactionError> {
        if self.amount <= Decimal::ZERO {
            return Err(TransactionError::NonPositiveAmount { kind: "deposit" });
        }

        let balance = self.account.balance;
        let new_balance = balance
            .checked_add(self.amount)
            .ok_or(TransactionError::Overflow { kind: "deposit" })?;

        // Decimal rounds past 28 significant digits instead of failing
        if new_balance.checked_sub(balance) != Some(self.amount) {
            return Err(TransactionError::Precision { kind: "deposit", amount: self.amount, balance });
        }
        self.account.balance = new_balance;

        Ok(&self.account)
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn account(&self) -> &Account {
        &self.account
    }

    fn transaction_type(&self) -> &'static str {
        DEPOSIT
    }

    fn into_account(self: Box<Self>) -> Account {
        self.account
    }
}

pub struct DepositFactory;

impl TransactionFactory for DepositFactory {
    fn create_transaction(&self, amount: Decimal, account: Account) -> Box<dyn TransactionStrategy> {
        Box::new(Deposit::new(amount, account))
    }

    fn transaction_type(&self) -> &'static str {
        DEPOSIT
    }
}

// ============================================================================
// WITHDRAWAL
// ============================================================================

#[derive(Debug, Clone)]
pub struct Withdrawal {
    amount: Decimal,
    account: Account,
}

impl Withdrawal {
    pub fn new(amount: Decimal, account: Account) -> Self {
        Withdrawal { amount, account }
    }
}

impl TransactionStrategy for Withdrawal {
    fn execute(&mut self) -> Result<&Account, TransactionError> {
        if self.amount <= Decimal::ZERO {
            return Err(TransactionError::NonPositiveAmount { kind: "withdrawal" });
        }

        if self.account.balance < self.amount {
            return Err(TransactionError::InsufficientFunds {
                balance: self.account.balance,
                requested: self.amount,
            });
        }

        let balance = self.account.balance;
        let new_balance = balance
            .checked_sub(self.amount)
            .ok_or(TransactionError::Overflow { kind: "withdrawal" })?;

        if balance.checked_sub(new_balance) != Some(self.amount) {
            return Err(TransactionError::Precision { kind: "withdrawal", amount: self.amount, balance });
        }
        self.account.balance = new_balance;

        Ok(&self.account)
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn account(&self) -> &Account {
        &self.account
    }

    fn transaction_type(&self) -> &'static str {
        WITHDRAWAL
    }

    fn into_account(self: Box<Self>) -> Account {
        self.account
    }
}

pub struct WithdrawalFactory;

impl TransactionFactory for WithdrawalFactory {
    fn create_transaction(&self, amount: Decimal, account: Account) -> Box<dyn TransactionStrategy> {
        Box::new(Withdrawal::new(amount, account))
    }

    fn transaction_type(&self) -> &'static str {
        WITHDRAWAL
    }
}
