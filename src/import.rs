// 📂 Account import - seed accounts from a CSV file
//
// Expected header: accountNumber,accountType,initialBalance,ownerName
// Rows go through the same validation as POST /api/accounts.

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::account::NewAccount;
use crate::error::StoreError;
use crate::request::AccountRequest;
use crate::store::AccountStore;

/// Raw CSV row. The balance stays text so the decimal scale is kept exactly.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountCsvRow {
    account_number: Option<String>,
    account_type: Option<String>,
    initial_balance: Option<String>,
    owner_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub duplicates: usize,
}

pub fn load_accounts_csv(csv_path: &Path) -> Result<Vec<NewAccount>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;

    let mut accounts = Vec::new();

    for (index, result) in rdr.deserialize().enumerate() {
        // header is line 1
        let line = index + 2;
        let row: AccountCsvRow =
            result.with_context(|| format!("Failed to deserialize account on line {}", line))?;

        let initial_balance = match row.initial_balance.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(Decimal::from_str(raw).map_err(|_| {
                anyhow!("line {}: initialBalance is not a decimal number: '{}'", line, raw)
            })?),
            _ => None,
        };

        let request = AccountRequest {
            account_number: row.account_number,
            account_type: row.account_type,
            initial_balance,
            owner_name: row.owner_name,
        };

        let account = request
            .validate()
            .map_err(|errors| anyhow!("line {}: {}", line, errors))?;
        accounts.push(account);
    }

    debug!(count = accounts.len(), path = %csv_path.display(), "loaded accounts from CSV");

    Ok(accounts)
}

/// Create every account, skipping numbers that already exist
pub fn import_accounts<S: AccountStore + ?Sized>(
    store: &S,
    accounts: &[NewAccount],
) -> Result<ImportSummary, StoreError> {
    let mut summary = ImportSummary::default();

    for account in accounts {
        match store.create(account) {
            Ok(_) => summary.inserted += 1,
            Err(StoreError::DuplicateAccountNumber(number)) => {
                debug!(account_number = %number, "skipping duplicate account");
                summary.duplicates += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(inserted = summary.inserted, duplicates = summary.duplicates, "account import finished");

    Ok(summary)
}
