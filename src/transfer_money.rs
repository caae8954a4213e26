//! Two-account transfer.

use crate::account::AccountId;
use crate::decimal::Money;
use crate::error::{Result, ValidationError};
use crate::notification::NotificationService;
use crate::repository::AccountRepository;
use log::debug;

/// Moves money between two accounts and alerts either owner when a
/// threshold is crossed.
///
/// Both accounts are only persisted after the withdrawal and the pay-in
/// have succeeded. A failed pay-in drops the already-debited source
/// in memory without writing it; there is no rollback because nothing
/// durable happened.
///
/// The two writes are separate calls. A crash between them leaves the
/// source debited and the destination unchanged.
pub struct TransferMoney<R, N> {
    accounts: R,
    notifications: N,
}

impl<R: AccountRepository, N: NotificationService> TransferMoney<R, N> {
    pub fn new(accounts: R, notifications: N) -> Self {
        TransferMoney {
            accounts,
            notifications,
        }
    }

    /// Transfers `amount` from `from_account_id` to `to_account_id`.
    pub fn execute(
        &self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Money,
    ) -> Result<()> {
        // Two copies of one account would make the second write drop the first.
        if from_account_id == to_account_id {
            return Err(ValidationError::SameAccount(from_account_id).into());
        }

        let mut from = self.accounts.get_account_by_id(from_account_id)?;
        let mut to = self.accounts.get_account_by_id(to_account_id)?;

        from.withdraw(amount)?;
        to.pay_in(amount)?;

        if from.funds_low() {
            self.notifications.notify_funds_low(from.owner().email());
        }

        if to.approaching_pay_in_limit() {
            self.notifications
                .notify_approaching_pay_in_limit(to.owner().email());
        }

        debug!(
            "Transferred {} from account {} to account {}",
            amount, from_account_id, to_account_id
        );
        self.accounts.update(from)?;
        self.accounts.update(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Account, Owner};
    use crate::error::Error;
    use crate::repository::InMemoryAccountRepository;
    use std::cell::RefCell;
    use std::str::FromStr;
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    enum Sent {
        FundsLow(String),
        ApproachingLimit(String),
    }

    #[derive(Default)]
    struct RecordingNotifications {
        sent: RefCell<Vec<Sent>>,
    }

    impl NotificationService for RecordingNotifications {
        fn notify_funds_low(&self, email: &str) {
            self.sent.borrow_mut().push(Sent::FundsLow(email.to_string()));
        }

        fn notify_approaching_pay_in_limit(&self, email: &str) {
            self.sent
                .borrow_mut()
                .push(Sent::ApproachingLimit(email.to_string()));
        }
    }

    fn dec(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    struct Fixture {
        repository: InMemoryAccountRepository,
        notifications: RecordingNotifications,
        from: AccountId,
        to: AccountId,
    }

    impl Fixture {
        fn new(from: Account, to: Account) -> Self {
            let repository = InMemoryAccountRepository::new();
            let (from_id, to_id) = (from.id(), to.id());
            repository.insert(from);
            repository.insert(to);
            Fixture {
                repository,
                notifications: RecordingNotifications::default(),
                from: from_id,
                to: to_id,
            }
        }

        /// Source holds the full pay-in limit, destination is empty.
        fn standard() -> Self {
            let from = Account::with_balance(
                AccountId::new(),
                Arc::new(Owner::new("from@example.com")),
                Account::PAY_IN_LIMIT,
            )
            .unwrap();
            let to = Account::new(AccountId::new(), Arc::new(Owner::new("to@example.com")));
            Self::new(from, to)
        }

        fn transfer(&self, amount: Money) -> Result<()> {
            TransferMoney::new(&self.repository, &self.notifications)
                .execute(self.from, self.to, amount)
        }

        fn stored(&self, id: AccountId) -> Account {
            self.repository.get_account_by_id(id).unwrap()
        }
    }

    #[test]
    fn test_successful_transfer_updates_both_accounts() {
        let fixture = Fixture::standard();
        fixture.transfer(dec("5")).unwrap();

        let from = fixture.stored(fixture.from);
        assert_eq!(from.withdrawn(), dec("-5"));
        assert_eq!(from.balance(), dec("3995"));

        let to = fixture.stored(fixture.to);
        assert_eq!(to.paid_in(), dec("5"));
        assert_eq!(to.balance(), dec("5"));

        assert!(fixture.notifications.sent.borrow().is_empty());
    }

    #[test]
    fn test_full_limit_transfer_fires_both_notifications() {
        let fixture = Fixture::standard();
        fixture.transfer(Account::PAY_IN_LIMIT).unwrap();

        assert_eq!(
            *fixture.notifications.sent.borrow(),
            vec![
                Sent::FundsLow("from@example.com".to_string()),
                Sent::ApproachingLimit("to@example.com".to_string()),
            ]
        );
        assert_eq!(fixture.stored(fixture.from).balance(), Money::ZERO);
        assert_eq!(fixture.stored(fixture.to).paid_in(), Account::PAY_IN_LIMIT);
    }

    #[test]
    fn test_zero_transfer_changes_nothing() {
        let fixture = Fixture::standard();
        let before = (fixture.stored(fixture.from), fixture.stored(fixture.to));

        fixture.transfer(Money::ZERO).unwrap();

        assert!(fixture.notifications.sent.borrow().is_empty());
        assert_eq!(
            (fixture.stored(fixture.from), fixture.stored(fixture.to)),
            before
        );
    }

    #[test]
    fn test_only_destination_near_limit() {
        let from = Account::with_balance(
            AccountId::new(),
            Arc::new(Owner::new("from@example.com")),
            dec("2000"),
        )
        .unwrap();
        let to = Account::restore(
            AccountId::new(),
            Arc::new(Owner::new("to@example.com")),
            dec("3500"),
            Money::ZERO,
            dec("3500"),
        )
        .unwrap();
        let fixture = Fixture::new(from, to);

        fixture.transfer(dec("0.01")).unwrap();

        assert_eq!(
            *fixture.notifications.sent.borrow(),
            vec![Sent::ApproachingLimit("to@example.com".to_string())]
        );
    }

    #[test]
    fn test_insufficient_funds_aborts_before_pay_in() {
        let fixture = Fixture::standard();

        let err = fixture
            .transfer(Account::PAY_IN_LIMIT + dec("0.01"))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(ValidationError::InsufficientFunds { .. })
        ));
        assert_eq!(fixture.stored(fixture.from).balance(), Account::PAY_IN_LIMIT);
        assert_eq!(fixture.stored(fixture.to).paid_in(), Money::ZERO);
        assert!(fixture.notifications.sent.borrow().is_empty());
    }

    #[test]
    fn test_pay_in_failure_leaves_source_unpersisted() {
        let from = Account::with_balance(
            AccountId::new(),
            Arc::new(Owner::new("from@example.com")),
            dec("1000"),
        )
        .unwrap();
        let to = Account::restore(
            AccountId::new(),
            Arc::new(Owner::new("to@example.com")),
            dec("3990"),
            Money::ZERO,
            dec("3990"),
        )
        .unwrap();
        let fixture = Fixture::new(from, to);

        let err = fixture.transfer(dec("600")).unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(ValidationError::PayInLimitExceeded { .. })
        ));
        let from = fixture.stored(fixture.from);
        assert_eq!(from.balance(), dec("1000"));
        assert_eq!(from.withdrawn(), Money::ZERO);
        assert_eq!(fixture.stored(fixture.to).paid_in(), dec("3990"));
        assert!(fixture.notifications.sent.borrow().is_empty());
    }

    #[test]
    fn test_unknown_destination() {
        let fixture = Fixture::standard();
        let missing = AccountId::new();

        let err = TransferMoney::new(&fixture.repository, &fixture.notifications)
            .execute(fixture.from, missing, dec("1"))
            .unwrap_err();

        assert!(matches!(err, Error::AccountNotFound(id) if id == missing));
        assert_eq!(fixture.stored(fixture.from).balance(), Account::PAY_IN_LIMIT);
    }

    #[test]
    fn test_same_account_rejected() {
        let fixture = Fixture::standard();

        let err = TransferMoney::new(&fixture.repository, &fixture.notifications)
            .execute(fixture.from, fixture.from, dec("1"))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(ValidationError::SameAccount(_))
        ));
        assert_eq!(fixture.stored(fixture.from).balance(), Account::PAY_IN_LIMIT);
    }
}
