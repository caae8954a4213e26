//! Account storage.
//!
//! The use cases only see the `AccountRepository` trait. The in-memory
//! implementation backs the CLI and the tests, and can be seeded from and
//! dumped to CSV.

use crate::account::{Account, AccountId, Owner};
use crate::decimal::Money;
use crate::error::{Error, Result};
use csv::{ReaderBuilder, Trim};
use log::debug;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;

/// Looks up and persists accounts.
pub trait AccountRepository {
    /// Returns an owned copy of the stored account.
    ///
    /// Fails with `Error::AccountNotFound` for an unknown id.
    fn get_account_by_id(&self, id: AccountId) -> Result<Account>;

    /// Persists the full current state of `account`. Idempotent.
    fn update(&self, account: Account) -> Result<()>;
}

impl<T: AccountRepository + ?Sized> AccountRepository for &T {
    fn get_account_by_id(&self, id: AccountId) -> Result<Account> {
        (**self).get_account_by_id(id)
    }

    fn update(&self, account: Account) -> Result<()> {
        (**self).update(account)
    }
}

impl<T: AccountRepository + ?Sized> AccountRepository for Rc<T> {
    fn get_account_by_id(&self, id: AccountId) -> Result<Account> {
        (**self).get_account_by_id(id)
    }

    fn update(&self, account: Account) -> Result<()> {
        (**self).update(account)
    }
}

/// Raw account row as read from CSV.
///
/// `withdrawn` and `paid_in` may be left blank for a fresh account.
#[derive(Debug, Deserialize)]
struct AccountRecord {
    id: String,
    email: String,
    balance: String,
    withdrawn: Option<String>,
    paid_in: Option<String>,
}

/// Single-threaded in-memory account store.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RefCell<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an account.
    pub fn insert(&self, account: Account) {
        self.accounts.borrow_mut().insert(account.id(), account);
    }

    pub fn len(&self) -> usize {
        self.accounts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.borrow().is_empty()
    }

    /// Returns a snapshot of all accounts sorted by id.
    pub fn accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<_> = self.accounts.borrow().values().cloned().collect();
        accounts.sort_by_key(|a| a.id());
        accounts
    }

    /// Builds a repository from an accounts CSV.
    ///
    /// Unlike instruction processing, a bad row here is an error: the
    /// starting state has to be trustworthy. Rows with the same email share
    /// one `Owner`.
    pub fn load_csv<R: Read>(reader: R) -> Result<Self> {
        let repository = Self::new();
        let mut owners: HashMap<String, Arc<Owner>> = HashMap::new();
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<AccountRecord>().enumerate() {
            let row = row_idx + 2; // 1-indexed, accounting for header row
            let record = result?;

            let id = AccountId::from_str(&record.id).map_err(|e| Error::InvalidRecord {
                row,
                message: format!("bad id {:?}: {}", record.id, e),
            })?;
            if repository.accounts.borrow().contains_key(&id) {
                return Err(Error::DuplicateAccount { id, row });
            }

            let email = record.email.trim();
            if email.is_empty() {
                return Err(Error::InvalidRecord {
                    row,
                    message: "missing email".to_string(),
                });
            }
            let owner = owners
                .entry(email.to_string())
                .or_insert_with(|| Arc::new(Owner::new(email)));

            let balance = parse_amount(Some(&record.balance), "balance", row)?;
            let withdrawn = parse_amount(record.withdrawn.as_deref(), "withdrawn", row)?;
            let paid_in = parse_amount(record.paid_in.as_deref(), "paid_in", row)?;

            let account = Account::restore(id, Arc::clone(owner), balance, withdrawn, paid_in)
                .map_err(|e| Error::InvalidRecord {
                    row,
                    message: e.to_string(),
                })?;
            debug!("Row {}: Loaded account {} with balance {}", row, id, balance);
            repository.insert(account);
        }

        Ok(repository)
    }

    /// Writes all accounts to CSV, sorted by id for deterministic output.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "email", "balance", "withdrawn", "paid_in"])?;

        for account in self.accounts() {
            csv_writer.write_record([
                account.id().to_string(),
                account.owner().email().to_string(),
                account.balance().to_string(),
                account.withdrawn().to_string(),
                account.paid_in().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn get_account_by_id(&self, id: AccountId) -> Result<Account> {
        self.accounts
            .borrow()
            .get(&id)
            .cloned()
            .ok_or(Error::AccountNotFound(id))
    }

    fn update(&self, account: Account) -> Result<()> {
        self.insert(account);
        Ok(())
    }
}

/// Parses an optional amount column; blank means zero.
fn parse_amount(value: Option<&str>, column: &str, row: usize) -> Result<Money> {
    match value.map(str::trim) {
        None | Some("") => Ok(Money::ZERO),
        Some(text) => Money::from_str(text).map_err(|e| Error::InvalidRecord {
            row,
            message: format!("{}: {}", column, e),
        }),
    }
}
