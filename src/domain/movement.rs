use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{Account, AccountError, Clock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    Deposit,
    Withdrawal,
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MovementKind::Deposit => write!(f, "deposit"),
            MovementKind::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

/// A single credit or debit on an account. The amount is always positive,
/// direction lives in `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    date: NaiveDate,
    amount: Decimal,
    kind: MovementKind,
}

impl Movement {
    pub fn new(date: NaiveDate, amount: Decimal, kind: MovementKind) -> Self {
        Self { date, amount, kind }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> MovementKind {
        self.kind
    }

    pub fn is_deposit(&self) -> bool {
        self.kind == MovementKind::Deposit
    }

    /// Moves the balance of `account` and appends `self` to its history.
    /// The account is left untouched if the new balance is out of range.
    pub fn apply_to<C: Clock>(self, account: &mut Account<C>) -> Result<(), AccountError> {
        let balance = match self.kind {
            MovementKind::Deposit => account.balance.checked_add(self.amount),
            MovementKind::Withdrawal => account.balance.checked_sub(self.amount),
        }
        .ok_or(AccountError::BalanceOverflow {
            balance: account.balance,
            amount: self.amount,
        })?;

        account.balance = balance;
        tracing::debug!("applied {} movement", self);
        account.movements.push(self);
        Ok(())
    }
}

impl core::fmt::Display for Movement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{},{}", self.date, self.kind, self.amount)
    }
}
