//! Streams CSV instructions through the withdraw and transfer use cases.
//!
//! A row that cannot be parsed or is rejected by an account is logged and
//! skipped; only I/O failures stop processing.

use crate::error::Result;
use crate::instruction::{Instruction, InstructionRecord};
use crate::notification::NotificationService;
use crate::repository::AccountRepository;
use crate::transfer_money::TransferMoney;
use crate::withdraw_money::WithdrawMoney;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::io::Read;

/// Counts of instructions applied and rejected in one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSummary {
    pub applied: usize,
    pub rejected: usize,
}

/// Dispatches instructions to the use cases, in the order received.
pub struct InstructionProcessor<R, N> {
    withdraw: WithdrawMoney<R, N>,
    transfer: TransferMoney<R, N>,
}

impl<R, N> InstructionProcessor<R, N>
where
    R: AccountRepository + Clone,
    N: NotificationService + Clone,
{
    pub fn new(accounts: R, notifications: N) -> Self {
        InstructionProcessor {
            withdraw: WithdrawMoney::new(accounts.clone(), notifications.clone()),
            transfer: TransferMoney::new(accounts, notifications),
        }
    }

    /// Processes instructions from a CSV reader in streaming fashion.
    ///
    /// Records are read one at a time. Invalid or rejected records are
    /// logged at warn level and skipped.
    pub fn process_csv<Rd: Read>(&self, reader: Rd) -> Result<ProcessingSummary> {
        let mut summary = ProcessingSummary::default();
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<InstructionRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                    summary.rejected += 1;
                    continue;
                }
            };

            let Some(instruction) = record.parse() else {
                warn!("Row {}: Failed to parse instruction record", row_num);
                summary.rejected += 1;
                continue;
            };

            match self.apply(&instruction) {
                Ok(()) => {
                    debug!("Row {}: Applied {:?}", row_num, instruction);
                    summary.applied += 1;
                }
                Err(e) => {
                    warn!("Row {}: {}", row_num, e);
                    summary.rejected += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Runs a single instruction through its use case.
    pub fn apply(&self, instruction: &Instruction) -> Result<()> {
        match *instruction {
            Instruction::Withdraw { account, amount } => self.withdraw.execute(account, amount),
            Instruction::Transfer { from, to, amount } => self.transfer.execute(from, to, amount),
        }
    }
}
