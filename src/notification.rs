//! Outbound alerts to account holders.

use log::info;
use std::rc::Rc;

/// Delivers alerts to an account holder's contact address.
///
/// Delivery is fire-and-forget: callers never observe the outcome.
pub trait NotificationService {
    /// The account balance dropped below the notification amount.
    fn notify_funds_low(&self, email: &str);

    /// Less than the notification amount of pay-in allowance is left.
    fn notify_approaching_pay_in_limit(&self, email: &str);
}

impl<T: NotificationService + ?Sized> NotificationService for &T {
    fn notify_funds_low(&self, email: &str) {
        (**self).notify_funds_low(email)
    }

    fn notify_approaching_pay_in_limit(&self, email: &str) {
        (**self).notify_approaching_pay_in_limit(email)
    }
}

impl<T: NotificationService + ?Sized> NotificationService for Rc<T> {
    fn notify_funds_low(&self, email: &str) {
        (**self).notify_funds_low(email)
    }

    fn notify_approaching_pay_in_limit(&self, email: &str) {
        (**self).notify_approaching_pay_in_limit(email)
    }
}

/// Emits every alert as an `info` log record.
///
/// Used by the CLI in place of a real email or SMS transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationService;

impl LogNotificationService {
    pub fn new() -> Self {
        LogNotificationService
    }
}

impl NotificationService for LogNotificationService {
    fn notify_funds_low(&self, email: &str) {
        info!(target: "moneybox::notification", "funds low: {}", email);
    }

    fn notify_approaching_pay_in_limit(&self, email: &str) {
        info!(
            target: "moneybox::notification",
            "approaching pay in limit: {}", email
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl NotificationService for Recorder {
        fn notify_funds_low(&self, email: &str) {
            self.calls.borrow_mut().push(format!("low:{}", email));
        }

        fn notify_approaching_pay_in_limit(&self, email: &str) {
            self.calls.borrow_mut().push(format!("limit:{}", email));
        }
    }

    fn send_both<N: NotificationService>(notifications: N) {
        notifications.notify_funds_low("a@example.com");
        notifications.notify_approaching_pay_in_limit("b@example.com");
    }

    #[test]
    fn test_references_forward_to_the_service() {
        let recorder = Recorder::default();
        send_both(&recorder);

        let shared = Rc::new(Recorder::default());
        send_both(Rc::clone(&shared));

        let expected = vec!["low:a@example.com", "limit:b@example.com"];
        assert_eq!(*recorder.calls.borrow(), expected);
        assert_eq!(*shared.calls.borrow(), expected);
    }

    #[test]
    fn test_log_service_does_not_panic_without_logger() {
        send_both(LogNotificationService::new());
    }
}
