use anchor_lang::prelude::*;

use crate::errors::NumeraireError;
use crate::math::SafeMath;

/// Time-bounded allowance of new supply.
///
/// `remaining` grows by `refill_per_period` at each whole period boundary past
/// `last_refill_time`, never beyond `cap`, and shrinks only on mint. Refills are
/// applied lazily: readers call [`DisbursementPool::available_at`], writers call
/// [`DisbursementPool::refill`] before touching `remaining`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct DisbursementPool {
    pub remaining: u128,
    pub last_refill_time: i64,
    pub refill_per_period: u128,
    pub period_length: i64,
    pub cap: u128,
}

impl DisbursementPool {
    pub const SIZE: usize = 16 // remaining
        + 8   // last_refill_time
        + 16  // refill_per_period
        + 8   // period_length
        + 16; // cap

    pub fn new(
        initial: u128,
        refill_per_period: u128,
        period_length: i64,
        cap: u128,
        now: i64,
    ) -> Result<Self> {
        require!(period_length > 0, NumeraireError::InvalidSchedule);
        require!(initial <= cap, NumeraireError::InvalidSchedule);

        Ok(Self {
            remaining: initial,
            last_refill_time: now,
            refill_per_period,
            period_length,
            cap,
        })
    }

    /// Whole periods elapsed since the last refill. A clock reading behind
    /// `last_refill_time` counts as no time passing.
    fn elapsed_periods(&self, now: i64) -> Result<i64> {
        if now <= self.last_refill_time {
            return Ok(0);
        }
        now.safe_sub(self.last_refill_time)?
            .safe_div(self.period_length)
    }

    fn refilled_amount(&self, periods: i64) -> Result<u128> {
        if periods == 0 {
            return Ok(self.remaining);
        }
        // accrual saturates, the cap bounds the result
        let accrued = self
            .refill_per_period
            .checked_mul(periods as u128)
            .unwrap_or(u128::MAX);
        Ok(self.remaining.saturating_add(accrued).min(self.cap))
    }

    /// Amount that could be minted at `now` without mutating the pool.
    pub fn available_at(&self, now: i64) -> Result<u128> {
        let periods = self.elapsed_periods(now)?;
        self.refilled_amount(periods)
    }

    /// Apply every whole period that has elapsed up to `now`.
    pub fn refill(&mut self, now: i64) -> Result<()> {
        let periods = self.elapsed_periods(now)?;
        if periods == 0 {
            return Ok(());
        }
        self.remaining = self.refilled_amount(periods)?;
        self.last_refill_time = self
            .last_refill_time
            .safe_add(periods.safe_mul(self.period_length)?)?;
        Ok(())
    }

    pub fn consume(&mut self, amount: u128, now: i64) -> Result<()> {
        self.refill(now)?;
        require!(amount <= self.remaining, NumeraireError::ExceedsDisbursement);
        self.remaining = self.remaining.safe_sub(amount)?;
        Ok(())
    }

    /// Switch to a new schedule. Time already elapsed accrues at the old rate.
    pub fn reconfigure(
        &mut self,
        refill_per_period: u128,
        period_length: i64,
        cap: u128,
        now: i64,
    ) -> Result<()> {
        require!(period_length > 0, NumeraireError::InvalidSchedule);
        self.refill(now)?;

        self.refill_per_period = refill_per_period;
        self.period_length = period_length;
        self.cap = cap;
        self.remaining = self.remaining.min(cap);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    fn numerai_pool() -> DisbursementPool {
        DisbursementPool::new(
            INITIAL_DISBURSEMENT,
            WEEKLY_DISBURSEMENT,
            DISBURSEMENT_PERIOD,
            SUPPLY_CAP,
            1_000,
        )
        .unwrap()
    }

    #[test]
    fn no_refill_before_period_boundary() {
        let pool = numerai_pool();
        let almost = 1_000 + DISBURSEMENT_PERIOD - 1;
        assert_eq!(pool.available_at(almost).unwrap(), INITIAL_DISBURSEMENT);
    }

    #[test]
    fn refills_once_per_whole_period() {
        let mut pool = numerai_pool();
        let one_week = 1_000 + DISBURSEMENT_PERIOD;
        assert_eq!(
            pool.available_at(one_week).unwrap(),
            INITIAL_DISBURSEMENT + WEEKLY_DISBURSEMENT
        );

        // two and a half weeks accrue two refills, the half week carries over
        let later = 1_000 + DISBURSEMENT_PERIOD * 5 / 2;
        pool.refill(later).unwrap();
        assert_eq!(pool.remaining, INITIAL_DISBURSEMENT + 2 * WEEKLY_DISBURSEMENT);
        assert_eq!(pool.last_refill_time, 1_000 + 2 * DISBURSEMENT_PERIOD);
    }

    #[test]
    fn refill_never_exceeds_cap() {
        let mut pool = DisbursementPool::new(90, 25, 10, 100, 0).unwrap();
        pool.refill(1_000).unwrap();
        assert_eq!(pool.remaining, 100);
        assert_eq!(pool.available_at(i64::MAX).unwrap(), 100);
    }

    #[test]
    fn consume_is_bounded_by_remaining() {
        let mut pool = numerai_pool();
        assert_eq!(
            pool.consume(INITIAL_DISBURSEMENT + 1, 1_000).unwrap_err(),
            NumeraireError::ExceedsDisbursement.into()
        );
        pool.consume(INITIAL_DISBURSEMENT, 1_000).unwrap();
        assert_eq!(pool.remaining, 0);
    }

    #[test]
    fn clock_behind_last_refill_is_ignored() {
        let pool = numerai_pool();
        assert_eq!(pool.available_at(0).unwrap(), INITIAL_DISBURSEMENT);
    }

    #[test]
    fn reconfigure_accrues_old_rate_then_clamps() {
        let mut pool = DisbursementPool::new(50, 10, 100, 1_000, 0).unwrap();
        pool.reconfigure(1, 5, 55, 250).unwrap();
        // two old periods accrued (70), then clamped to the new cap
        assert_eq!(pool.remaining, 55);
        assert_eq!(pool.period_length, 5);
        assert_eq!(
            pool.reconfigure(1, 0, 55, 250).unwrap_err(),
            NumeraireError::InvalidSchedule.into()
        );
    }
}
