use anchor_lang::prelude::*;

use crate::errors::NumeraireError;
use crate::math::SafeMath;
use crate::state::{move_balance, Backend, Holder, Round};

/// Collateral locked by `staker` in one round. Keyed by
/// (tournament_id, round_id, staker).
#[account]
#[derive(Default)]
pub struct Stake {
    pub staker: Pubkey, // Default until first lock
    pub tournament_id: u64,
    pub round_id: u64,
    pub confidence: u8,
    pub amount: u128, // Currently escrowed
    pub successful: bool,
    pub resolved: bool,
    pub destroyed: bool,
    pub bump: u8,
}

impl Space for Stake {
    const INIT_SPACE: usize = 8      // Discriminator
        + 32    // staker: Pubkey
        + 8     // tournament_id
        + 8     // round_id
        + 1     // confidence
        + 16    // amount
        + 1     // successful
        + 1     // resolved
        + 1     // destroyed
        + 1;    // bump
}

impl Stake {
    pub fn exists(&self) -> bool {
        self.staker != Pubkey::default()
    }

    fn require_unsettled(&self) -> Result<()> {
        require!(!self.resolved, NumeraireError::StakeAlreadyResolved);
        require!(!self.destroyed, NumeraireError::StakeAlreadyDestroyed);
        Ok(())
    }

    /// Move `amount` from the staker's holder into escrow. Re-staking the same
    /// key adds to the amount and replaces the confidence.
    #[allow(clippy::too_many_arguments)]
    pub fn lock(
        &mut self,
        staker: &mut Holder,
        escrow: &mut Holder,
        round: &Round,
        amount: u128,
        confidence: u8,
        now: i64,
        bump: u8,
    ) -> Result<()> {
        require!(amount > 0, NumeraireError::ZeroAmount);
        round.require_open(now)?;
        self.require_unsettled()?;

        let total = self.amount.safe_add(amount)?;
        move_balance(staker, escrow, amount)?;

        if !self.exists() {
            self.staker = staker.owner;
            self.tournament_id = round.tournament_id;
            self.round_id = round.id;
            self.bump = bump;
        }
        self.amount = total;
        self.confidence = confidence;
        Ok(())
    }

    /// Return the escrowed amount to the staker. Returns the amount released.
    pub fn release(
        &mut self,
        staker: &mut Holder,
        escrow: &mut Holder,
        round: &Round,
        successful: bool,
        now: i64,
    ) -> Result<u128> {
        round.require_resolvable(now)?;
        require!(self.exists(), NumeraireError::StakeNotFound);
        self.require_unsettled()?;

        let amount = self.amount;
        move_balance(escrow, staker, amount)?;

        self.amount = 0;
        self.successful = successful;
        self.resolved = true;
        Ok(amount)
    }

    /// Burn the escrowed amount out of total supply. Returns the amount burned.
    pub fn destroy(
        &mut self,
        backend: &mut Backend,
        escrow: &mut Holder,
        round: &Round,
        now: i64,
    ) -> Result<u128> {
        round.require_resolvable(now)?;
        require!(self.exists(), NumeraireError::StakeNotFound);
        self.require_unsettled()?;

        let amount = self.amount;
        let supply = backend.total_supply.safe_sub(amount)?;
        escrow.debit(amount)?;
        backend.total_supply = supply;

        self.amount = 0;
        self.destroyed = true;
        Ok(amount)
    }
}

#[event]
pub struct Staked {
    pub staker: Pubkey,
    pub tournament_id: u64,
    pub round_id: u64,
    pub amount: u128,
    pub total: u128,
    pub confidence: u8,
    pub timestamp: i64,
}

#[event]
pub struct StakeReleased {
    pub staker: Pubkey,
    pub tournament_id: u64,
    pub round_id: u64,
    pub amount: u128,
    pub successful: bool,
    pub bonus_lamports: u64,
    pub timestamp: i64,
}

#[event]
pub struct StakeDestroyed {
    pub staker: Pubkey,
    pub tournament_id: u64,
    pub round_id: u64,
    pub amount: u128,
    pub timestamp: i64,
}
