use anyhow::{bail, Result};
use std::env;
use std::path::Path;

use bank_accounts::{
    count_accounts, import_accounts, init_logging, load_accounts_csv, open_database, AccountStore,
    Config, SqliteAccountStore, TransactionRegistry,
};

const USAGE: &str = "Usage: bank-accounts <command>

Commands:
  import <accounts.csv>   create accounts from CSV (accountNumber,accountType,initialBalance,ownerName)
  list                    print all accounts
  types                   print registered transaction types

Environment: BANK_DATABASE_PATH, BANK_LOG_LEVEL";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    // BANK_BIND_ADDRESS is ignored here, the CLI never listens
    let config = Config::from_env()?;
    init_logging(config.log_level);

    match args.get(1).map(String::as_str) {
        Some("import") => match args.get(2) {
            Some(path) => run_import(&config, Path::new(path)),
            None => bail!("import needs a CSV path\n\n{}", USAGE),
        },
        Some("list") => run_list(&config),
        Some("types") => run_types(),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    }
}

fn run_import(config: &Config, csv_path: &Path) -> Result<()> {
    let accounts = load_accounts_csv(csv_path)?;
    println!("✓ Loaded {} accounts from CSV", accounts.len());

    let mut conn = open_database(&config.database_path)?;

    // All rows commit together
    let tx = conn.transaction()?;
    let summary = import_accounts(&SqliteAccountStore::new(&tx), &accounts)?;
    tx.commit()?;

    println!("✓ Inserted: {} accounts", summary.inserted);
    println!("✓ Skipped duplicates: {}", summary.duplicates);
    println!("✓ Accounts in database: {}", count_accounts(&conn)?);

    Ok(())
}

fn run_list(config: &Config) -> Result<()> {
    let conn = open_database(&config.database_path)?;
    let accounts = SqliteAccountStore::new(&conn).find_all()?;

    println!("{:<6} {:<16} {:<12} {:>16}  {}", "ID", "NUMBER", "TYPE", "BALANCE", "OWNER");
    for account in &accounts {
        println!(
            "{:<6} {:<16} {:<12} {:>16}  {}",
            account.id, account.account_number, account.account_type, account.balance, account.owner_name
        );
    }
    println!("{} accounts", accounts.len());

    Ok(())
}

fn run_types() -> Result<()> {
    let registry = TransactionRegistry::with_builtin()?;
    for transaction_type in registry.transaction_types() {
        println!("{}", transaction_type);
    }
    Ok(())
}
