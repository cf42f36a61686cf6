use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::account::{Account, NewAccount};
use crate::error::StoreError;
use crate::store::AccountStore;

const ACCOUNT_COLUMNS: &str =
    "id, account_number, account_type, balance, owner_name, created_at, updated_at";

/// Open (or create) the accounts database and make sure the schema exists.
/// `":memory:"` opens a private in-memory database.
pub fn open_database(path: &str) -> Result<Connection, StoreError> {
    let conn = if path == ":memory:" {
        Connection::open_in_memory()?
    } else {
        Connection::open(path)?
    };
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<(), StoreError> {
    // Enable WAL mode for crash recovery (in-memory databases report "memory")
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;

    // ==========================================================================
    // Accounts Table
    // balance is decimal TEXT so no precision is lost to REAL
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_number TEXT UNIQUE NOT NULL,
            account_type TEXT NOT NULL,
            balance TEXT NOT NULL,
            owner_name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_accounts_number ON accounts(account_number)",
        [],
    )?;

    Ok(())
}

pub fn count_accounts(conn: &Connection) -> Result<i64, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;

    Ok(count)
}

// ============================================================================
// ROW MAPPING
// ============================================================================

/// Raw row as stored; balance is still text until `into_account`
struct AccountRow {
    id: i64,
    account_number: String,
    account_type: String,
    balance: String,
    owner_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AccountRow {
            id: row.get(0)?,
            account_number: row.get(1)?,
            account_type: row.get(2)?,
            balance: row.get(3)?,
            owner_name: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn into_account(self) -> Result<Account, StoreError> {
        let balance = Decimal::from_str(&self.balance).map_err(|_| StoreError::CorruptBalance {
            account_number: self.account_number.clone(),
            value: self.balance.clone(),
        })?;

        Ok(Account {
            id: self.id,
            account_number: self.account_number,
            account_type: self.account_type,
            balance,
            owner_name: self.owner_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn map_constraint(err: rusqlite::Error, account_number: &str) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
            StoreError::DuplicateAccountNumber(account_number.to_string())
        }
        e => e.into(),
    }
}

// ============================================================================
// SQLITE ACCOUNT STORE
// ============================================================================

/// `AccountStore` over a borrowed connection.
///
/// Works with a plain `Connection` or with an open `rusqlite::Transaction`
/// (which derefs to `Connection`), so the transaction flow can run every read
/// and write inside one unit of work.
pub struct SqliteAccountStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteAccountStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        SqliteAccountStore { conn }
    }
}

impl AccountStore for SqliteAccountStore<'_> {
    fn find_by_number(&self, account_number: &str) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_number = ?1");

        let row = self
            .conn
            .query_row(&sql, [account_number], AccountRow::from_row)
            .optional()?;

        row.map(AccountRow::into_account).transpose()
    }

    fn find_all(&self) -> Result<Vec<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = stmt
            .query_map([], AccountRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    fn save(&self, account: &Account) -> Result<Account, StoreError> {
        let mut saved = account.clone();
        saved.updated_at = Utc::now();

        self.conn
            .execute(
                "INSERT INTO accounts (
                    id, account_number, account_type, balance, owner_name, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(id) DO UPDATE SET
                    account_number = excluded.account_number,
                    account_type = excluded.account_type,
                    balance = excluded.balance,
                    owner_name = excluded.owner_name,
                    updated_at = excluded.updated_at",
                params![
                    saved.id,
                    saved.account_number,
                    saved.account_type,
                    saved.balance.to_string(),
                    saved.owner_name,
                    saved.created_at,
                    saved.updated_at,
                ],
            )
            .map_err(|e| map_constraint(e, &saved.account_number))?;

        Ok(saved)
    }

    fn create(&self, new_account: &NewAccount) -> Result<Account, StoreError> {
        let now = Utc::now();

        self.conn
            .execute(
                "INSERT INTO accounts (
                    account_number, account_type, balance, owner_name, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    new_account.account_number,
                    new_account.account_type,
                    new_account.initial_balance.to_string(),
                    new_account.owner_name,
                    now,
                    now,
                ],
            )
            .map_err(|e| map_constraint(e, &new_account.account_number))?;

        Ok(Account {
            id: self.conn.last_insert_rowid(),
            account_number: new_account.account_number.clone(),
            account_type: new_account.account_type.clone(),
            balance: new_account.initial_balance,
            owner_name: new_account.owner_name.clone(),
            created_at: now,
            updated_at: now,
        })
    }
}
