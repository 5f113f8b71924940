use anchor_lang::prelude::*;

use crate::constants::{BACKEND_SEED, HOLDER_SEED};
use crate::state::{Backend, Holder, Minted};

#[derive(Accounts)]
pub struct MintTokens<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [BACKEND_SEED],
        bump = backend.bump,
    )]
    pub backend: Account<'info, Backend>,

    #[account(
        mut,
        seeds = [HOLDER_SEED, backend.key().as_ref()],
        bump = treasury.bump
    )]
    pub treasury: Account<'info, Holder>,
}

impl<'info> MintTokens<'info> {
    pub fn mint(&mut self, amount: u128) -> Result<()> {
        self.backend.require_active_owner(&self.owner.key())?;

        let now = Clock::get()?.unix_timestamp;
        self.backend.mint(amount, now)?;
        self.treasury.credit(amount)?;

        emit!(Minted {
            amount,
            total_supply: self.backend.total_supply,
            remaining_disbursement: self.backend.disbursement.remaining,
            timestamp: now,
        });
        Ok(())
    }
}
