use anchor_lang::prelude::*;

use crate::constants::{BACKEND_SEED, HOLDER_SEED};
use crate::instructions::settle;
use crate::state::{require_deposit_address, require_recipient, Backend, Holder, Transferred};

/// Owners move funds out of deposit addresses, and only those.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    /// CHECK: Synthetic deposit identity, validated in the handler
    pub deposit: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [HOLDER_SEED, deposit.key().as_ref()],
        bump = from_holder.bump
    )]
    pub from_holder: Account<'info, Holder>,

    /// CHECK: Any identity can receive tokens, only its key is used
    pub recipient: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = owner,
        space = Holder::INIT_SPACE,
        seeds = [HOLDER_SEED, recipient.key().as_ref()],
        bump
    )]
    pub to_holder: Account<'info, Holder>,

    pub system_program: Program<'info, System>,
}

impl<'info> Withdraw<'info> {
    pub fn withdraw(&mut self, amount: u128, bumps: &WithdrawBumps) -> Result<()> {
        self.backend.require_active_owner(&self.owner.key())?;
        require_deposit_address(&self.deposit.key())?;
        require_recipient(&self.recipient.key())?;

        self.to_holder
            .init_if_empty(self.recipient.key(), bumps.to_holder);
        settle(&mut self.from_holder, &mut self.to_holder, amount)?;

        emit!(Transferred {
            from: self.deposit.key(),
            to: self.recipient.key(),
            amount,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}

/// Sweep a deposit address into the treasury.
#[derive(Accounts)]
pub struct TransferDeposit<'info> {
    pub owner: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    /// CHECK: Synthetic deposit identity, validated in the handler
    pub deposit: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [HOLDER_SEED, deposit.key().as_ref()],
        bump = from_holder.bump
    )]
    pub from_holder: Account<'info, Holder>,

    #[account(
        mut,
        seeds = [HOLDER_SEED, backend.key().as_ref()],
        bump = treasury.bump
    )]
    pub treasury: Account<'info, Holder>,
}

impl<'info> TransferDeposit<'info> {
    pub fn transfer_deposit(&mut self, amount: u128) -> Result<()> {
        self.backend.require_active_owner(&self.owner.key())?;
        require_deposit_address(&self.deposit.key())?;

        settle(&mut self.from_holder, &mut self.treasury, amount)?;

        emit!(Transferred {
            from: self.deposit.key(),
            to: self.backend.key(),
            amount,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}
