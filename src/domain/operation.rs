use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::MovementKind;

/// One row of an operation feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deposit { amount: Decimal },
    Withdrawal { amount: Decimal },
    /// Historical movement replayed without business rules.
    Record {
        date: NaiveDate,
        amount: Decimal,
        kind: MovementKind,
    },
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Operation::Deposit { amount } => write!(f, "deposit,amount={}", amount),
            Operation::Withdrawal { amount } => write!(f, "withdrawal,amount={}", amount),
            Operation::Record { date, amount, kind } => {
                write!(f, "record_{},amount={},date={}", kind, amount, date)
            }
        }
    }
}
