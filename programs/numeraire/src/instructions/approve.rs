use anchor_lang::prelude::*;

use crate::constants::{ALLOWANCE_SEED, BACKEND_SEED};
use crate::state::{Allowance, Approved, Backend};

#[derive(Accounts)]
pub struct Approve<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    /// CHECK: The spender being approved, only its key is used
    pub spender: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = owner,
        space = Allowance::INIT_SPACE,
        seeds = [ALLOWANCE_SEED, owner.key().as_ref(), spender.key().as_ref()],
        bump
    )]
    pub allowance: Account<'info, Allowance>,

    pub system_program: Program<'info, System>,
}

impl<'info> Approve<'info> {
    pub fn approve(&mut self, amount: u128, bumps: &ApproveBumps) -> Result<()> {
        self.backend.require_active()?;
        self.open(bumps);
        self.allowance.approve(amount)?;
        self.emit_approval()
    }

    /// Re-approve only if the current allowance still equals `expected`.
    pub fn change_approval(
        &mut self,
        expected: u128,
        amount: u128,
        bumps: &ApproveBumps,
    ) -> Result<()> {
        self.backend.require_active()?;
        self.open(bumps);
        self.allowance.change(expected, amount)?;
        self.emit_approval()
    }

    fn open(&mut self, bumps: &ApproveBumps) {
        let owner = self.owner.key();
        let spender = self.spender.key();
        self.allowance.init_if_empty(owner, spender, bumps.allowance);
    }

    fn emit_approval(&self) -> Result<()> {
        emit!(Approved {
            owner: self.owner.key(),
            spender: self.spender.key(),
            amount: self.allowance.amount,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}
