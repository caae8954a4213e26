//! Account entity and its balance rules.
//!
//! Maintains these invariants after every successful operation:
//! `balance >= 0`, `paid_in <= PAY_IN_LIMIT`, `withdrawn` never increases
//! and `paid_in` never decreases.

use crate::decimal::Money;
use crate::error::ValidationError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Strongly-typed account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// The account holder. Accounts only ever read the contact address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Owner {
    email: String,
}

impl Owner {
    pub fn new(email: impl Into<String>) -> Self {
        Owner {
            email: email.into(),
        }
    }

    /// Address that notifications for this owner are sent to.
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// A personal account with a withdrawable balance and cumulative
/// withdrawal/pay-in counters.
///
/// Fields are private: `withdraw` and `pay_in` are the only mutation paths.
/// The owner is shared, so several accounts of one person point at the
/// same `Owner`.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    owner: Arc<Owner>,

    /// Funds available for withdrawal. Never negative.
    balance: Money,

    /// Running total of withdrawals, kept as a non-positive number.
    withdrawn: Money,

    /// Running total of pay-ins. Never above `PAY_IN_LIMIT`.
    paid_in: Money,
}

impl Account {
    /// Maximum cumulative amount an account may ever receive.
    pub const PAY_IN_LIMIT: Money = Money::from_cents(400_000);

    /// Threshold below which low-funds and near-limit alerts fire.
    pub const NOTIFICATION_AMOUNT: Money = Money::from_cents(50_000);

    /// Creates an account with zero balance and counters.
    pub fn new(id: AccountId, owner: Arc<Owner>) -> Self {
        Account {
            id,
            owner,
            balance: Money::ZERO,
            withdrawn: Money::ZERO,
            paid_in: Money::ZERO,
        }
    }

    /// Creates an account holding an opening balance.
    ///
    /// The opening balance does not count towards `paid_in`.
    pub fn with_balance(
        id: AccountId,
        owner: Arc<Owner>,
        balance: Money,
    ) -> Result<Self, ValidationError> {
        Self::restore(id, owner, balance, Money::ZERO, Money::ZERO)
    }

    /// Rebuilds an account from previously stored state.
    ///
    /// Rejects state that already breaks an invariant.
    pub fn restore(
        id: AccountId,
        owner: Arc<Owner>,
        balance: Money,
        withdrawn: Money,
        paid_in: Money,
    ) -> Result<Self, ValidationError> {
        if balance.is_negative() {
            return Err(ValidationError::InvalidState(format!(
                "balance {} is negative",
                balance
            )));
        }
        if withdrawn > Money::ZERO {
            return Err(ValidationError::InvalidState(format!(
                "withdrawn {} is positive",
                withdrawn
            )));
        }
        if paid_in.is_negative() || paid_in > Self::PAY_IN_LIMIT {
            return Err(ValidationError::InvalidState(format!(
                "paid in {} is outside 0..={}",
                paid_in,
                Self::PAY_IN_LIMIT
            )));
        }

        Ok(Account {
            id,
            owner,
            balance,
            withdrawn,
            paid_in,
        })
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn owner(&self) -> &Arc<Owner> {
        &self.owner
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn withdrawn(&self) -> Money {
        self.withdrawn
    }

    pub fn paid_in(&self) -> Money {
        self.paid_in
    }

    /// Withdraws funds from the account.
    ///
    /// Withdrawing exactly the whole balance succeeds. On error no field
    /// is changed.
    pub fn withdraw(&mut self, amount: Money) -> Result<(), ValidationError> {
        ensure_not_negative(amount)?;

        let remaining = self.balance - amount;
        if remaining.is_negative() {
            return Err(ValidationError::InsufficientFunds {
                balance: self.balance,
                amount,
            });
        }
        let withdrawn = self
            .withdrawn
            .checked_sub(amount)
            .ok_or(ValidationError::Overflow {
                field: "withdrawn",
                current: self.withdrawn,
                amount,
            })?;

        self.balance = remaining;
        self.withdrawn = withdrawn;
        debug_assert!(self.check_invariants());
        Ok(())
    }

    /// Pays funds into the account.
    ///
    /// Paying in exactly up to `PAY_IN_LIMIT` succeeds. On error no field
    /// is changed.
    pub fn pay_in(&mut self, amount: Money) -> Result<(), ValidationError> {
        ensure_not_negative(amount)?;

        // An overflowing total is above the limit too.
        let new_paid_in = self
            .paid_in
            .checked_add(amount)
            .filter(|total| *total <= Self::PAY_IN_LIMIT)
            .ok_or(ValidationError::PayInLimitExceeded {
                paid_in: self.paid_in,
                amount,
                limit: Self::PAY_IN_LIMIT,
            })?;
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(ValidationError::Overflow {
                field: "balance",
                current: self.balance,
                amount,
            })?;

        self.balance = balance;
        self.paid_in = new_paid_in;
        debug_assert!(self.check_invariants());
        Ok(())
    }

    /// Returns `true` once the balance is strictly below `NOTIFICATION_AMOUNT`.
    pub fn funds_low(&self) -> bool {
        self.balance < Self::NOTIFICATION_AMOUNT
    }

    /// Returns `true` once less than `NOTIFICATION_AMOUNT` of pay-in
    /// allowance is left.
    pub fn approaching_pay_in_limit(&self) -> bool {
        Self::PAY_IN_LIMIT - self.paid_in < Self::NOTIFICATION_AMOUNT
    }

    /// Verifies the balance and counter invariants.
    pub fn check_invariants(&self) -> bool {
        !self.balance.is_negative()
            && self.withdrawn <= Money::ZERO
            && !self.paid_in.is_negative()
            && self.paid_in <= Self::PAY_IN_LIMIT
    }
}

fn ensure_not_negative(amount: Money) -> Result<(), ValidationError> {
    if amount.is_negative() {
        return Err(ValidationError::NegativeAmount(amount));
    }
    Ok(())
}
