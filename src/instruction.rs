//! Money-movement instructions as read from CSV.

use crate::account::AccountId;
use crate::decimal::Money;
use serde::Deserialize;
use std::str::FromStr;

/// Raw instruction record as read from CSV.
///
/// `to` is only present for transfers.
#[derive(Debug, Deserialize)]
pub struct InstructionRecord {
    /// Instruction type: withdraw or transfer
    #[serde(rename = "type")]
    pub kind: String,

    /// Account the money leaves
    pub from: String,

    /// Account the money arrives in (transfers only)
    pub to: Option<String>,

    pub amount: Option<String>,
}

impl InstructionRecord {
    /// Parses the raw CSV record into a typed instruction.
    ///
    /// Returns `None` for an unknown type, a bad account id or a missing
    /// or invalid amount.
    pub fn parse(&self) -> Option<Instruction> {
        let kind = self.kind.trim().to_lowercase();
        let from = AccountId::from_str(&self.from).ok()?;
        let amount = self.parse_amount()?;

        match kind.as_str() {
            "withdraw" | "withdrawal" => Some(Instruction::Withdraw {
                account: from,
                amount,
            }),
            "transfer" => {
                let to = AccountId::from_str(self.to.as_deref()?).ok()?;
                Some(Instruction::Transfer { from, to, amount })
            }
            _ => None,
        }
    }

    fn parse_amount(&self) -> Option<Money> {
        let amount_str = self.amount.as_ref()?;
        let trimmed = amount_str.trim();
        if trimmed.is_empty() {
            return None;
        }
        Money::from_str(trimmed).ok()
    }
}

/// A parsed instruction ready to hand to a use case.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Take money out of a single account.
    Withdraw { account: AccountId, amount: Money },

    /// Move money from one account into another.
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Money,
    },
}
