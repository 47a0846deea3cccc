use std::{env, fs::File, path::Path};

use account_ledger::{
    dlq::StdErrDLQ,
    domain::{Account, Clock, Error, FixedClock, SystemClock, amount::parse_amount},
    engine::Engine,
    ingestion::CsvReader,
    statement::CsvStatement,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

const TODAY_ENV: &str = "LEDGER_TODAY";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let mut args = env::args().skip(1);

    let file_path = args
        .next()
        .ok_or("usage: account_ledger <operations.csv> [initial_balance]")?;
    let initial_balance = match args.next() {
        Some(raw) => parse_amount(&raw)
            .ok_or_else(|| Error::Ingestion(format!("Invalid initial balance: {}", raw)))?,
        None => Decimal::ZERO,
    };

    match env::var(TODAY_ENV) {
        Ok(raw) => {
            let today = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|e| Error::Ingestion(format!("Invalid {}={}: {}", TODAY_ENV, raw, e)))?;
            tracing::info!(%today, "clock pinned");
            run(Path::new(&file_path), FixedClock(today), initial_balance).await
        }
        Err(_) => run(Path::new(&file_path), SystemClock, initial_balance).await,
    }
}

async fn run<C: Clock>(
    file_path: &Path,
    clock: C,
    initial_balance: Decimal,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(file_path)?;

    let ingestion = CsvReader::new(file);
    let account = Account::with_clock(clock, initial_balance);

    let mut engine = Engine::new(ingestion, CsvStatement::stdout(), StdErrDLQ::default(), account);

    engine.process().await?;
    engine.flush()?;

    Ok(())
}
