use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::constants::{BACKEND_SEED, ESCROW_SEED, HOLDER_SEED, ROUND_SEED, STAKE_SEED};
use crate::state::{
    require_deposit_address, Backend, Holder, Round, Stake, StakeDestroyed, StakeReleased, Staked,
};

#[derive(Accounts)]
#[instruction(amount: u128, tournament_id: u64, round_id: u64)]
pub struct StakeTokens<'info> {
    #[account(mut)]
    pub staker: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    #[account(
        seeds = [
            ROUND_SEED,
            tournament_id.to_le_bytes().as_ref(),
            round_id.to_le_bytes().as_ref()
        ],
        bump = round.bump
    )]
    pub round: Account<'info, Round>,

    #[account(
        mut,
        seeds = [HOLDER_SEED, staker.key().as_ref()],
        bump = staker_holder.bump
    )]
    pub staker_holder: Account<'info, Holder>,

    #[account(
        mut,
        seeds = [ESCROW_SEED, backend.key().as_ref()],
        bump = escrow.bump
    )]
    pub escrow: Account<'info, Holder>,

    #[account(
        init_if_needed,
        payer = staker,
        space = Stake::INIT_SPACE,
        seeds = [
            STAKE_SEED,
            tournament_id.to_le_bytes().as_ref(),
            round_id.to_le_bytes().as_ref(),
            staker.key().as_ref()
        ],
        bump
    )]
    pub stake: Account<'info, Stake>,

    pub system_program: Program<'info, System>,
}

impl<'info> StakeTokens<'info> {
    pub fn stake(&mut self, amount: u128, confidence: u8, bumps: &StakeTokensBumps) -> Result<()> {
        self.backend.require_active()?;

        let now = Clock::get()?.unix_timestamp;
        self.stake.lock(
            &mut self.staker_holder,
            &mut self.escrow,
            &self.round,
            amount,
            confidence,
            now,
            bumps.stake,
        )?;

        emit!(Staked {
            staker: self.staker.key(),
            tournament_id: self.round.tournament_id,
            round_id: self.round.id,
            amount,
            total: self.stake.amount,
            confidence,
            timestamp: now,
        });
        Ok(())
    }
}

/// An owner stakes the balance of a deposit address.
#[derive(Accounts)]
#[instruction(amount: u128, tournament_id: u64, round_id: u64)]
pub struct StakeOnBehalf<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    /// CHECK: Synthetic deposit identity, validated in the handler
    pub staker: UncheckedAccount<'info>,

    #[account(
        seeds = [
            ROUND_SEED,
            tournament_id.to_le_bytes().as_ref(),
            round_id.to_le_bytes().as_ref()
        ],
        bump = round.bump
    )]
    pub round: Account<'info, Round>,

    #[account(
        mut,
        seeds = [HOLDER_SEED, staker.key().as_ref()],
        bump = staker_holder.bump
    )]
    pub staker_holder: Account<'info, Holder>,

    #[account(
        mut,
        seeds = [ESCROW_SEED, backend.key().as_ref()],
        bump = escrow.bump
    )]
    pub escrow: Account<'info, Holder>,

    #[account(
        init_if_needed,
        payer = owner,
        space = Stake::INIT_SPACE,
        seeds = [
            STAKE_SEED,
            tournament_id.to_le_bytes().as_ref(),
            round_id.to_le_bytes().as_ref(),
            staker.key().as_ref()
        ],
        bump
    )]
    pub stake: Account<'info, Stake>,

    pub system_program: Program<'info, System>,
}

impl<'info> StakeOnBehalf<'info> {
    pub fn stake_on_behalf(
        &mut self,
        amount: u128,
        confidence: u8,
        bumps: &StakeOnBehalfBumps,
    ) -> Result<()> {
        self.backend.require_active_owner(&self.owner.key())?;
        require_deposit_address(&self.staker.key())?;

        let now = Clock::get()?.unix_timestamp;
        self.stake.lock(
            &mut self.staker_holder,
            &mut self.escrow,
            &self.round,
            amount,
            confidence,
            now,
            bumps.stake,
        )?;

        emit!(Staked {
            staker: self.staker.key(),
            tournament_id: self.round.tournament_id,
            round_id: self.round.id,
            amount,
            total: self.stake.amount,
            confidence,
            timestamp: now,
        });
        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(tournament_id: u64, round_id: u64)]
pub struct ReleaseStake<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    /// CHECK: Staker identity, receives the optional lamport bonus
    #[account(mut)]
    pub staker: UncheckedAccount<'info>,

    #[account(
        seeds = [
            ROUND_SEED,
            tournament_id.to_le_bytes().as_ref(),
            round_id.to_le_bytes().as_ref()
        ],
        bump = round.bump
    )]
    pub round: Account<'info, Round>,

    #[account(
        mut,
        seeds = [
            STAKE_SEED,
            tournament_id.to_le_bytes().as_ref(),
            round_id.to_le_bytes().as_ref(),
            staker.key().as_ref()
        ],
        bump = stake.bump
    )]
    pub stake: Account<'info, Stake>,

    #[account(
        mut,
        seeds = [HOLDER_SEED, staker.key().as_ref()],
        bump = staker_holder.bump
    )]
    pub staker_holder: Account<'info, Holder>,

    #[account(
        mut,
        seeds = [ESCROW_SEED, backend.key().as_ref()],
        bump = escrow.bump
    )]
    pub escrow: Account<'info, Holder>,

    pub system_program: Program<'info, System>,
}

impl<'info> ReleaseStake<'info> {
    pub fn release_stake(&mut self, bonus_lamports: u64, successful: bool) -> Result<()> {
        self.backend.require_active_owner(&self.owner.key())?;

        let now = Clock::get()?.unix_timestamp;
        let amount = self.stake.release(
            &mut self.staker_holder,
            &mut self.escrow,
            &self.round,
            successful,
            now,
        )?;

        // Stake state is final before any lamports leave
        if bonus_lamports > 0 {
            let cpi_ctx = CpiContext::new(
                self.system_program.to_account_info(),
                system_program::Transfer {
                    from: self.owner.to_account_info(),
                    to: self.staker.to_account_info(),
                },
            );
            system_program::transfer(cpi_ctx, bonus_lamports)?;
        }

        msg!("Released {} to {}", amount, self.staker.key());

        emit!(StakeReleased {
            staker: self.staker.key(),
            tournament_id: self.round.tournament_id,
            round_id: self.round.id,
            amount,
            successful,
            bonus_lamports,
            timestamp: now,
        });
        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(tournament_id: u64, round_id: u64)]
pub struct DestroyStake<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [BACKEND_SEED],
        bump = backend.bump
    )]
    pub backend: Account<'info, Backend>,

    /// CHECK: Staker identity, only its key is used
    pub staker: UncheckedAccount<'info>,

    #[account(
        seeds = [
            ROUND_SEED,
            tournament_id.to_le_bytes().as_ref(),
            round_id.to_le_bytes().as_ref()
        ],
        bump = round.bump
    )]
    pub round: Account<'info, Round>,

    #[account(
        mut,
        seeds = [
            STAKE_SEED,
            tournament_id.to_le_bytes().as_ref(),
            round_id.to_le_bytes().as_ref(),
            staker.key().as_ref()
        ],
        bump = stake.bump
    )]
    pub stake: Account<'info, Stake>,

    #[account(
        mut,
        seeds = [ESCROW_SEED, backend.key().as_ref()],
        bump = escrow.bump
    )]
    pub escrow: Account<'info, Holder>,
}

impl<'info> DestroyStake<'info> {
    pub fn destroy_stake(&mut self) -> Result<()> {
        self.backend.require_active_owner(&self.owner.key())?;

        let now = Clock::get()?.unix_timestamp;
        let amount = self
            .stake
            .destroy(&mut self.backend, &mut self.escrow, &self.round, now)?;

        msg!("Destroyed {} staked by {}", amount, self.staker.key());

        emit!(StakeDestroyed {
            staker: self.staker.key(),
            tournament_id: self.round.tournament_id,
            round_id: self.round.id,
            amount,
            timestamp: now,
        });
        Ok(())
    }
}
