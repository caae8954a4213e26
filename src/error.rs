//! Error types for accounts, the money-movement use cases and the CLI.

use crate::account::AccountId;
use crate::decimal::Money;
use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// A rejected account mutation.
///
/// Always raised before any field is changed, so the account is left
/// exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Insufficient funds for withdrawal: balance {balance}, requested {amount}")]
    InsufficientFunds { balance: Money, amount: Money },

    #[error("Account pay in limit reached: paid in {paid_in}, requested {amount}, limit {limit}")]
    PayInLimitExceeded {
        paid_in: Money,
        amount: Money,
        limit: Money,
    },

    /// Withdrawals and pay-ins only move non-negative amounts.
    #[error("Amount must not be negative: {0}")]
    NegativeAmount(Money),

    #[error("Cannot transfer from account {0} to itself")]
    SameAccount(AccountId),

    /// A running total would leave the representable decimal range.
    #[error("Account {field} would overflow: current {current}, requested {amount}")]
    Overflow {
        field: &'static str,
        current: Money,
        amount: Money,
    },

    /// Starting state handed to `Account::restore` breaks an invariant.
    #[error("Invalid account state: {0}")]
    InvalidState(String),
}

/// Errors that can occur while running use cases or the CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// Domain validation failure raised by an account
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The repository has no account with this id
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid account record
    #[error("Invalid account at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// The same account id appears twice in the accounts file
    #[error("Duplicate account ID {id} at row {row}")]
    DuplicateAccount { id: AccountId, row: usize },

    /// Missing input file arguments
    #[error("Missing input file arguments. Usage: moneybox <accounts.csv> <instructions.csv>")]
    MissingArgument,
}

impl Error {
    /// Returns `true` for domain validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
