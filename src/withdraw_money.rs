//! Single-account withdrawal.

use crate::account::AccountId;
use crate::decimal::Money;
use crate::error::Result;
use crate::notification::NotificationService;
use crate::repository::AccountRepository;
use log::debug;

/// Withdraws money from one account and warns its owner when funds run low.
///
/// Runs `fetch → withdraw → notify → persist` and stops at the first
/// failure, so a rejected withdrawal writes nothing and sends nothing.
pub struct WithdrawMoney<R, N> {
    accounts: R,
    notifications: N,
}

impl<R: AccountRepository, N: NotificationService> WithdrawMoney<R, N> {
    pub fn new(accounts: R, notifications: N) -> Self {
        WithdrawMoney {
            accounts,
            notifications,
        }
    }

    /// Withdraws `amount` from the account with the given id.
    ///
    /// Performs exactly one repository write and at most one notification
    /// on success; neither on failure.
    pub fn execute(&self, account_id: AccountId, amount: Money) -> Result<()> {
        let mut account = self.accounts.get_account_by_id(account_id)?;

        account.withdraw(amount)?;

        if account.funds_low() {
            self.notifications
                .notify_funds_low(account.owner().email());
        }

        debug!(
            "Withdrew {} from account {}, balance now {}",
            amount,
            account_id,
            account.balance()
        );
        self.accounts.update(account)
    }
}
