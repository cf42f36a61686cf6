// 🗄️ Account Store - persistence boundary
//
// The orchestrator only needs lookup-by-number and save. Listing and creation
// serve the account endpoints and the CSV importer. No transaction-kind logic
// lives behind this trait.

use crate::account::{Account, NewAccount};
use crate::error::StoreError;

pub trait AccountStore {
    /// Find account by business key
    fn find_by_number(&self, account_number: &str) -> Result<Option<Account>, StoreError>;

    /// All accounts, ordered by id
    fn find_all(&self) -> Result<Vec<Account>, StoreError>;

    /// Upsert by identity. Returns the account as persisted (updated_at refreshed).
    fn save(&self, account: &Account) -> Result<Account, StoreError>;

    /// Insert a new account and assign its id.
    ///
    /// Fails with `StoreError::DuplicateAccountNumber` if the number is taken.
    fn create(&self, new_account: &NewAccount) -> Result<Account, StoreError>;
}
