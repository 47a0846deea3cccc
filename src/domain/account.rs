use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{AccountError, Clock, Movement, MovementKind, SystemClock};

/// Deposits allowed over the lifetime of an account.
pub const MAX_DEPOSITS: usize = 3;

#[derive(Debug)]
pub struct Account<C: Clock = SystemClock> {
    pub(crate) balance: Decimal,
    pub(crate) movements: Vec<Movement>,
    daily_withdrawal_limit: Decimal,
    clock: C,
}

impl Account<SystemClock> {
    pub fn new() -> Self {
        Self::with_initial_balance(Decimal::ZERO)
    }

    pub fn with_initial_balance(balance: Decimal) -> Self {
        Self::with_clock(SystemClock, balance)
    }
}

impl Default for Account<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Account<C> {
    pub fn with_clock(clock: C, balance: Decimal) -> Self {
        Self {
            balance,
            movements: Vec::new(),
            daily_withdrawal_limit: Decimal::ONE_THOUSAND,
            clock,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn daily_withdrawal_limit(&self) -> Decimal {
        self.daily_withdrawal_limit
    }

    pub fn deposit_count(&self) -> usize {
        self.movements.iter().filter(|m| m.is_deposit()).count()
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        ensure_positive(amount)?;
        self.ensure_deposit_slot()?;

        Movement::new(self.clock.today(), amount, MovementKind::Deposit).apply_to(self)
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), AccountError> {
        let today = self.clock.today();

        ensure_positive(amount)?;
        self.ensure_funds(amount)?;
        self.ensure_daily_limit(amount, today)?;

        Movement::new(today, amount, MovementKind::Withdrawal).apply_to(self)
    }

    /// Replays a historical movement, e.g. when loading stored history.
    ///
    /// No business rule is checked here: amounts, the deposit cap, funds and
    /// the daily limit are all bypassed. Use [`Account::deposit`] and
    /// [`Account::withdraw`] for live operations. Fails only when the
    /// balance would leave the `Decimal` range.
    pub fn record_movement(
        &mut self,
        date: NaiveDate,
        amount: Decimal,
        kind: MovementKind,
    ) -> Result<(), AccountError> {
        Movement::new(date, amount, kind).apply_to(self)
    }

    /// Saturates at the `Decimal` bounds for histories replayed with huge amounts.
    pub fn total_withdrawn_on(&self, date: NaiveDate) -> Decimal {
        self.movements
            .iter()
            .filter(|m| !m.is_deposit() && m.date() == date)
            .fold(Decimal::ZERO, |total, m| total.saturating_add(m.amount()))
    }

    pub fn remaining_withdrawal_on(&self, date: NaiveDate) -> Decimal {
        self.daily_withdrawal_limit
            .saturating_sub(self.total_withdrawn_on(date))
    }

    fn ensure_deposit_slot(&self) -> Result<(), AccountError> {
        if self.deposit_count() >= MAX_DEPOSITS {
            return Err(AccountError::TooManyDeposits { max: MAX_DEPOSITS });
        }
        Ok(())
    }

    fn ensure_funds(&self, amount: Decimal) -> Result<(), AccountError> {
        let after = self
            .balance
            .checked_sub(amount)
            .ok_or(AccountError::BalanceOverflow {
                balance: self.balance,
                amount,
            })?;
        if after < Decimal::ZERO {
            return Err(AccountError::InsufficientFunds {
                balance: self.balance,
                amount,
            });
        }
        Ok(())
    }

    fn ensure_daily_limit(&self, amount: Decimal, date: NaiveDate) -> Result<(), AccountError> {
        let remaining = self.remaining_withdrawal_on(date);
        if amount > remaining {
            return Err(AccountError::DailyWithdrawalLimit {
                limit: self.daily_withdrawal_limit,
                remaining,
                date,
            });
        }
        Ok(())
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), AccountError> {
    if amount <= Decimal::ZERO {
        return Err(AccountError::NegativeAmount { amount });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FixedClock;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn account(balance: i64) -> Account<FixedClock> {
        Account::with_clock(FixedClock(today()), Decimal::from(balance))
    }

    #[test]
    fn deposit_on_new_account() {
        let mut account = account(0);
        account.deposit(Decimal::from(100)).unwrap();

        assert_eq!(account.balance(), Decimal::from(100));
        assert_eq!(account.movements().len(), 1);
        assert_eq!(account.movements()[0].date(), today());
        assert!(account.movements()[0].is_deposit());
    }

    #[test]
    fn withdraw_after_deposit() {
        let mut account = account(0);
        account.deposit(Decimal::from(100)).unwrap();
        account.withdraw(Decimal::from(50)).unwrap();

        assert_eq!(account.balance(), Decimal::from(50));
        assert_eq!(account.movements().len(), 2);
        assert_eq!(account.movements()[1].kind(), MovementKind::Withdrawal);
    }

    #[test]
    fn fractional_amounts_are_exact() {
        let mut account = account(0);
        account.deposit(Decimal::new(1, 1)).unwrap();
        account.deposit(Decimal::new(2, 1)).unwrap();

        assert_eq!(account.balance(), Decimal::new(3, 1));
    }

    #[test]
    fn withdraw_more_than_balance() {
        let mut account = account(100);
        let err = account.withdraw(Decimal::from(150)).unwrap_err();

        assert_eq!(
            err,
            AccountError::InsufficientFunds {
                balance: Decimal::from(100),
                amount: Decimal::from(150),
            }
        );
        assert_eq!(account.balance(), Decimal::from(100));
        assert!(account.movements().is_empty());
    }

    #[test]
    fn withdraw_entire_balance() {
        let mut account = account(100);
        account.withdraw(Decimal::from(100)).unwrap();
        assert_eq!(account.balance(), Decimal::ZERO);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let mut account = account(100);

        for amount in [Decimal::from(-5), Decimal::ZERO] {
            assert_eq!(
                account.deposit(amount),
                Err(AccountError::NegativeAmount { amount })
            );
            assert_eq!(
                account.withdraw(amount),
                Err(AccountError::NegativeAmount { amount })
            );
        }
        assert_eq!(account.balance(), Decimal::from(100));
        assert!(account.movements().is_empty());
    }

    #[test]
    fn negative_amount_checked_before_deposit_cap() {
        let mut account = account(0);
        for _ in 0..3 {
            account.deposit(Decimal::from(10)).unwrap();
        }

        assert_eq!(
            account.deposit(Decimal::from(-1)),
            Err(AccountError::NegativeAmount {
                amount: Decimal::from(-1)
            })
        );
        assert_eq!(account.movements().len(), 3);
    }

    #[test]
    fn insufficient_funds_checked_before_daily_limit() {
        let mut account = account(2000);
        account.withdraw(Decimal::from(1000)).unwrap();

        assert_eq!(
            account.withdraw(Decimal::from(1500)),
            Err(AccountError::InsufficientFunds {
                balance: Decimal::from(1000),
                amount: Decimal::from(1500),
            })
        );
        assert_eq!(account.balance(), Decimal::from(1000));
    }

    #[test]
    fn negative_amount_checked_before_funds() {
        let mut account = account(0);
        assert!(matches!(
            account.withdraw(Decimal::from(-1)),
            Err(AccountError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn fourth_deposit_is_rejected() {
        let mut account = account(0);
        for _ in 0..3 {
            account.deposit(Decimal::from(10)).unwrap();
        }
        let err = account.deposit(Decimal::from(10)).unwrap_err();

        assert_eq!(err, AccountError::TooManyDeposits { max: MAX_DEPOSITS });
        assert_eq!(account.balance(), Decimal::from(30));
        assert_eq!(account.movements().len(), 3);
    }

    #[test]
    fn deposit_cap_spans_days() {
        let mut account = account(0);
        let yesterday = today().pred_opt().unwrap();
        for _ in 0..3 {
            account
                .record_movement(yesterday, Decimal::ONE, MovementKind::Deposit)
                .unwrap();
        }

        assert!(matches!(
            account.deposit(Decimal::ONE),
            Err(AccountError::TooManyDeposits { .. })
        ));
    }

    #[test]
    fn daily_withdrawal_limit() {
        let mut account = account(2000);
        account.withdraw(Decimal::from(600)).unwrap();
        let err = account.withdraw(Decimal::from(500)).unwrap_err();

        assert_eq!(
            err,
            AccountError::DailyWithdrawalLimit {
                limit: Decimal::ONE_THOUSAND,
                remaining: Decimal::from(400),
                date: today(),
            }
        );
        assert_eq!(account.balance(), Decimal::from(1400));
        assert_eq!(account.movements().len(), 1);
    }

    #[test]
    fn withdrawal_up_to_limit_is_allowed() {
        let mut account = account(2000);
        account.withdraw(Decimal::from(600)).unwrap();
        account.withdraw(Decimal::from(400)).unwrap();

        assert_eq!(account.total_withdrawn_on(today()), Decimal::ONE_THOUSAND);
        assert_eq!(account.remaining_withdrawal_on(today()), Decimal::ZERO);
    }

    #[test]
    fn earlier_withdrawals_do_not_count_today() {
        let mut account = account(3000);
        let yesterday = today().pred_opt().unwrap();
        account
            .record_movement(yesterday, Decimal::from(900), MovementKind::Withdrawal)
            .unwrap();

        account.withdraw(Decimal::from(1000)).unwrap();
        assert_eq!(account.total_withdrawn_on(yesterday), Decimal::from(900));
        assert_eq!(account.total_withdrawn_on(today()), Decimal::from(1000));
    }

    #[test]
    fn total_withdrawn_ignores_deposits() {
        let mut account = account(500);
        account.deposit(Decimal::from(200)).unwrap();
        account.withdraw(Decimal::from(50)).unwrap();

        assert_eq!(account.total_withdrawn_on(today()), Decimal::from(50));
        assert_eq!(
            account.total_withdrawn_on(today().succ_opt().unwrap()),
            Decimal::ZERO
        );
    }

    #[test]
    fn record_movement_bypasses_rules() {
        let mut account = account(0);
        account
            .record_movement(today(), Decimal::from(5000), MovementKind::Withdrawal)
            .unwrap();

        assert_eq!(account.balance(), Decimal::from(-5000));
        assert_eq!(account.movements().len(), 1);
        assert_eq!(account.total_withdrawn_on(today()), Decimal::from(5000));
    }

    #[test]
    fn deposit_overflow_is_rejected() {
        let mut account = account(1);
        let err = account.deposit(Decimal::MAX).unwrap_err();

        assert_eq!(
            err,
            AccountError::BalanceOverflow {
                balance: Decimal::ONE,
                amount: Decimal::MAX,
            }
        );
        assert_eq!(account.balance(), Decimal::ONE);
        assert!(account.movements().is_empty());
    }

    #[test]
    fn withdraw_overflow_is_rejected() {
        let mut account = account(-1);

        assert!(matches!(
            account.withdraw(Decimal::MAX),
            Err(AccountError::BalanceOverflow { .. })
        ));
        assert_eq!(account.balance(), Decimal::from(-1));
        assert!(account.movements().is_empty());
    }

    #[test]
    fn record_movement_rejects_overflow_only() {
        let mut account = account(0);
        account
            .record_movement(today(), Decimal::MAX, MovementKind::Deposit)
            .unwrap();

        let err = account
            .record_movement(today(), Decimal::ONE, MovementKind::Deposit)
            .unwrap_err();
        assert!(matches!(err, AccountError::BalanceOverflow { .. }));
        assert_eq!(account.balance(), Decimal::MAX);
        assert_eq!(account.movements().len(), 1);

        account
            .record_movement(today(), Decimal::from(-7), MovementKind::Deposit)
            .unwrap();
        assert_eq!(account.balance(), Decimal::MAX - Decimal::from(7));
    }

    #[test]
    fn huge_recorded_withdrawals_saturate_daily_total() {
        let mut account = account(0);
        for kind in [
            MovementKind::Deposit,
            MovementKind::Withdrawal,
            MovementKind::Deposit,
            MovementKind::Withdrawal,
        ] {
            account
                .record_movement(today(), Decimal::MAX, kind)
                .unwrap();
        }
        account
            .record_movement(today(), Decimal::from(5), MovementKind::Deposit)
            .unwrap();

        assert_eq!(account.total_withdrawn_on(today()), Decimal::MAX);
        assert!(account.remaining_withdrawal_on(today()) < Decimal::ZERO);
        assert!(matches!(
            account.withdraw(Decimal::ONE),
            Err(AccountError::DailyWithdrawalLimit { .. })
        ));
    }

    #[test]
    fn balance_matches_history() {
        let mut account = account(250);
        account.deposit(Decimal::new(1999, 2)).unwrap();
        account.withdraw(Decimal::from(70)).unwrap();
        account
            .record_movement(today(), Decimal::from(3), MovementKind::Deposit)
            .unwrap();
        let _ = account.withdraw(Decimal::from(10_000));

        let net: Decimal = account
            .movements()
            .iter()
            .map(|m| if m.is_deposit() { m.amount() } else { -m.amount() })
            .sum();
        assert_eq!(account.balance(), Decimal::from(250) + net);
    }

    #[test]
    fn default_matches_new() {
        let account: Account = Account::default();
        assert_eq!(account.balance(), Account::new().balance());
        assert!(account.movements().is_empty());
    }

    #[test]
    fn system_clock_account_starts_empty() {
        let account = Account::new();
        assert_eq!(account.balance(), Decimal::ZERO);
        assert_eq!(account.daily_withdrawal_limit(), Decimal::ONE_THOUSAND);
        assert_eq!(account.deposit_count(), 0);
    }
}
