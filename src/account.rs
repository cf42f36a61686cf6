// 💳 Account Entity - persisted bank account
//
// "Account number is the business key, id is the identity"
//
// - id is assigned by the store at creation and never changes
// - account_number is supplied by the caller and is unique
// - balance only moves through a transaction strategy

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// System-assigned identity (row id)
    pub id: i64,

    /// Business key, e.g. "ACC123456"
    pub account_number: String,

    /// Free-form type: "checking", "savings", ...
    pub account_type: String,

    /// Never negative after a successful transaction
    pub balance: Decimal,

    pub owner_name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// NEW ACCOUNT (creation payload, no identity yet)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub account_number: String,
    pub account_type: String,
    pub initial_balance: Decimal,
    pub owner_name: String,
}

impl NewAccount {
    pub fn new(
        account_number: impl Into<String>,
        account_type: impl Into<String>,
        initial_balance: Decimal,
        owner_name: impl Into<String>,
    ) -> Self {
        NewAccount {
            account_number: account_number.into(),
            account_type: account_type.into(),
            initial_balance,
            owner_name: owner_name.into(),
        }
    }
}
