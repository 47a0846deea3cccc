use crate::domain::{
    Account, Clock, Error, Operation,
    traits::{DeadLetterQueue, OperationStream, StatementWriter},
};

use futures::StreamExt;

#[derive(Debug)]
pub struct Engine<I, O, D, C>
where
    I: OperationStream,
    O: StatementWriter,
    D: DeadLetterQueue,
    C: Clock,
{
    ingestion: I,
    statement: O,
    dlq: D,
    account: Account<C>,
}

impl<I, O, D, C> Engine<I, O, D, C>
where
    I: OperationStream,
    O: StatementWriter,
    D: DeadLetterQueue,
    C: Clock,
{
    pub fn new(ingestion: I, statement: O, dlq: D, account: Account<C>) -> Self {
        Self {
            ingestion,
            statement,
            dlq,
            account,
        }
    }

    pub fn account(&self) -> &Account<C> {
        &self.account
    }

    pub async fn process(&mut self) -> Result<(), Error> {
        let mut res = self.ingestion.stream();
        let (mut applied, mut rejected) = (0usize, 0usize);

        while let Some(op) = res.next().await {
            let outcome = match op {
                Ok(op) => self.apply_operation(op).inspect_err(|error| {
                    tracing::warn!(%op, %error, "operation rejected");
                }),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => applied += 1,
                Err(e) => {
                    rejected += 1;
                    self.dlq.report(&e);
                }
            }
        }

        tracing::info!(applied, rejected, balance = %self.account.balance(), "feed processed");
        Ok(())
    }

    fn apply_operation(&mut self, op: Operation) -> Result<(), Error> {
        match op {
            Operation::Deposit { amount } => self.account.deposit(amount)?,
            Operation::Withdrawal { amount } => self.account.withdraw(amount)?,
            Operation::Record { date, amount, kind } => {
                self.account.record_movement(date, amount, kind)?
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.statement.write_statement(&self.account)
    }
}
