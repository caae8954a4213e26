//! # Moneybox
//!
//! Account balance rules plus the two money-movement workflows that use
//! them: withdrawing from one account and transferring between two.
//!
//! ## Design Principles
//!
//! - **Exact decimal arithmetic**: every amount is a `rust_decimal` value
//! - **Atomic mutations**: a rejected withdrawal or pay-in changes nothing
//! - **Narrow collaborators**: storage and notification delivery sit behind
//!   the `AccountRepository` and `NotificationService` traits
//! - **Persist last**: use cases only write accounts once every mutation
//!   has succeeded
//!
//! ## Example
//!
//! ```
//! use moneybox::{
//!     Account, AccountId, AccountRepository, InMemoryAccountRepository,
//!     LogNotificationService, Money, Owner, WithdrawMoney,
//! };
//! use std::str::FromStr;
//! use std::sync::Arc;
//!
//! let repository = InMemoryAccountRepository::new();
//! let owner = Arc::new(Owner::new("holder@example.com"));
//! let account = Account::with_balance(AccountId::new(), owner, Money::from_cents(100_000)).unwrap();
//! let id = account.id();
//! repository.insert(account);
//!
//! let withdraw = WithdrawMoney::new(&repository, LogNotificationService::new());
//! withdraw.execute(id, Money::from_str("10").unwrap()).unwrap();
//!
//! let stored = repository.get_account_by_id(id).unwrap();
//! assert_eq!(stored.balance().to_string(), "990.00");
//! ```

pub mod account;
pub mod decimal;
pub mod error;
pub mod instruction;
pub mod notification;
pub mod processor;
pub mod repository;
pub mod transfer_money;
pub mod withdraw_money;

pub use account::{Account, AccountId, Owner};
pub use decimal::{Money, ParseMoneyError};
pub use error::{Error, Result, ValidationError};
pub use instruction::{Instruction, InstructionRecord};
pub use notification::{LogNotificationService, NotificationService};
pub use processor::{InstructionProcessor, ProcessingSummary};
pub use repository::{AccountRepository, InMemoryAccountRepository};
pub use transfer_money::TransferMoney;
pub use withdraw_money::WithdrawMoney;
