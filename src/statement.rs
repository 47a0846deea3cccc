use std::io::Write;

use serde::Serialize;

use crate::domain::amount::AMOUNT_DECIMALS;
use crate::domain::{Account, Clock, Error, StatementWriter};

/// Writes an account's history as `date,type,amount` rows followed by a
/// closing `balance,<value>` line.
pub struct CsvStatement<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvStatement<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, Error> {
        self.writer
            .into_inner()
            .map_err(|e| Error::IO(e.into_error()))
    }
}

impl CsvStatement<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

#[derive(Serialize)]
struct MovementRow {
    date: String,
    #[serde(rename = "type")]
    kind: String,
    amount: String,
}

impl<W: Write> StatementWriter for CsvStatement<W> {
    fn write_statement<C: Clock>(&mut self, account: &Account<C>) -> Result<(), Error> {
        self.writer.write_record(["date", "type", "amount"])?;
        for movement in account.movements() {
            self.writer.serialize(MovementRow {
                date: movement.date().to_string(),
                kind: movement.kind().to_string(),
                amount: format!("{:.4}", movement.amount().round_dp(AMOUNT_DECIMALS)),
            })?;
        }
        self.writer.write_record([
            "balance".to_string(),
            format!("{:.4}", account.balance().round_dp(AMOUNT_DECIMALS)),
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}
