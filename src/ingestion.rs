use std::io::Read;
use std::pin::Pin;

use chrono::NaiveDate;
use futures::stream::{self, Stream};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::amount::deserialize_amount;
use crate::domain::traits::OperationStream;
use crate::domain::{Error, MovementKind, Operation};

pub struct CsvReader<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvReader<R> {
    pub fn new(reader: R) -> Self {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        Self { reader: Some(rdr) }
    }
}

/// Internal shape used only for CSV deserialization.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    amount: Option<Decimal>,
    #[serde(default)]
    date: Option<String>,
}

impl TryFrom<CsvRow> for Operation {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let amount = row
            .amount
            .ok_or_else(|| Error::Ingestion(format!("Missing amount for {}", row.kind)))?;
        let date = row.date.as_deref().map(str::trim).filter(|d| !d.is_empty());

        let op = match (row.kind.trim().to_ascii_lowercase().as_str(), date) {
            ("deposit", None) => Operation::Deposit { amount },
            ("withdrawal", None) => Operation::Withdrawal { amount },
            ("record_deposit", Some(date)) => Operation::Record {
                date: parse_date(date)?,
                amount,
                kind: MovementKind::Deposit,
            },
            ("record_withdrawal", Some(date)) => Operation::Record {
                date: parse_date(date)?,
                amount,
                kind: MovementKind::Withdrawal,
            },
            ("deposit" | "withdrawal", Some(_)) => {
                return Err(Error::Ingestion(format!(
                    "Live {} cannot carry a date",
                    row.kind
                )));
            }
            ("record_deposit" | "record_withdrawal", None) => {
                return Err(Error::Ingestion(format!("Missing date for {}", row.kind)));
            }
            (other, _) => {
                return Err(Error::Ingestion(format!(
                    "Invalid operation type: {}",
                    other
                )));
            }
        };

        Ok(op)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| Error::Ingestion(format!("Invalid date {}: {}", s, e)))
}

impl<R: Read + Send + 'static> OperationStream for CsvReader<R> {
    type OpStream = Pin<Box<dyn Stream<Item = Result<Operation, Error>> + Send>>;

    fn stream(&mut self) -> Self::OpStream {
        let reader = match self.reader.take() {
            Some(r) => r,
            // Already consumed.
            None => return Box::pin(stream::empty()),
        };

        let iter = reader
            .into_deserialize::<CsvRow>()
            .map(|row_res| match row_res {
                Ok(row) => Operation::try_from(row),
                Err(e) => Err(Error::Ingestion(format!(
                    "CSV deserialization error: {}",
                    e
                ))),
            });

        Box::pin(stream::iter(iter))
    }
}
