use anchor_lang::prelude::*;

use crate::constants::{ALLOWANCE_SEED, BACKEND_SEED, HOLDER_SEED};
use crate::errors::NumeraireError;
use crate::state::{move_balance, require_recipient, Allowance, Backend, Holder, Transferred};

/// Move `amount` between two holder accounts, which may be the same account
/// loaded twice.
pub(crate) fn settle(
    from: &mut Account<'_, Holder>,
    to: &mut Account<'_, Holder>,
    amount: u128,
) -> Result<()> {
    if from.key() == to.key() {
        require!(amount <= from.balance, NumeraireError::InsufficientBalance);
        return Ok(());
    }
    move_balance(from, to, amount)
}

#[derive(Accounts)]
pub struct TransferTokens<'info> {
    #[account(mut)]
    pub sender: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    #[account(
        mut,
        seeds = [HOLDER_SEED, sender.key().as_ref()],
        bump = from_holder.bump
    )]
    pub from_holder: Account<'info, Holder>,

    /// CHECK: Any identity can receive tokens, only its key is used
    pub recipient: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = sender,
        space = Holder::INIT_SPACE,
        seeds = [HOLDER_SEED, recipient.key().as_ref()],
        bump
    )]
    pub to_holder: Account<'info, Holder>,

    pub system_program: Program<'info, System>,
}

impl<'info> TransferTokens<'info> {
    pub fn transfer(&mut self, amount: u128, bumps: &TransferTokensBumps) -> Result<()> {
        self.backend.require_active()?;
        require_recipient(&self.recipient.key())?;

        self.to_holder
            .init_if_empty(self.recipient.key(), bumps.to_holder);
        settle(&mut self.from_holder, &mut self.to_holder, amount)?;

        emit!(Transferred {
            from: self.sender.key(),
            to: self.recipient.key(),
            amount,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}

#[derive(Accounts)]
pub struct TransferFrom<'info> {
    #[account(mut)]
    pub spender: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    /// CHECK: The approving owner, only its key is used
    pub owner: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [ALLOWANCE_SEED, owner.key().as_ref(), spender.key().as_ref()],
        bump = allowance.bump
    )]
    pub allowance: Account<'info, Allowance>,

    #[account(
        mut,
        seeds = [HOLDER_SEED, owner.key().as_ref()],
        bump = from_holder.bump
    )]
    pub from_holder: Account<'info, Holder>,

    /// CHECK: Any identity can receive tokens, only its key is used
    pub recipient: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = spender,
        space = Holder::INIT_SPACE,
        seeds = [HOLDER_SEED, recipient.key().as_ref()],
        bump
    )]
    pub to_holder: Account<'info, Holder>,

    pub system_program: Program<'info, System>,
}

impl<'info> TransferFrom<'info> {
    pub fn transfer_from(&mut self, amount: u128, bumps: &TransferFromBumps) -> Result<()> {
        self.backend.require_active()?;
        require_recipient(&self.recipient.key())?;
        require!(
            amount <= self.from_holder.balance,
            NumeraireError::InsufficientBalance
        );

        self.allowance.consume(amount)?;
        self.to_holder
            .init_if_empty(self.recipient.key(), bumps.to_holder);
        settle(&mut self.from_holder, &mut self.to_holder, amount)?;

        emit!(Transferred {
            from: self.owner.key(),
            to: self.recipient.key(),
            amount,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}
