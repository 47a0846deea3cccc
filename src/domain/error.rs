use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Business-rule rejections raised by [`crate::domain::Account`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("{amount}: amount must be a positive value")]
    NegativeAmount { amount: Decimal },

    #[error("already reached the maximum of {max} deposits")]
    TooManyDeposits { max: usize },

    #[error("cannot withdraw {amount}, balance is {balance}")]
    InsufficientFunds { balance: Decimal, amount: Decimal },

    #[error("moving {amount} would overflow balance {balance}")]
    BalanceOverflow { balance: Decimal, amount: Decimal },

    #[error("daily withdrawal limit of {limit} exceeded on {date}, remaining: {remaining}")]
    DailyWithdrawalLimit {
        limit: Decimal,
        remaining: Decimal,
        date: NaiveDate,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Ingestion failed with: {0}")]
    Ingestion(String),

    #[error("Operation rejected: {0}")]
    Account(#[from] AccountError),
}
