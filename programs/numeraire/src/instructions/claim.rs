use anchor_lang::prelude::*;

use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::constants::BACKEND_SEED;
use crate::errors::NumeraireError;
use crate::state::{Backend, TokensClaimed};

/// Recover foreign SPL tokens sent to the backend by mistake.
#[derive(Accounts)]
pub struct ClaimTokens<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    pub mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        constraint = vault.mint == mint.key(),
        constraint = vault.owner == backend.key()
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = mint,
        associated_token::authority = owner
    )]
    pub destination: InterfaceAccount<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> ClaimTokens<'info> {
    pub fn claim_tokens(&mut self) -> Result<()> {
        self.backend.require_active_owner(&self.owner.key())?;
        let mint_authority: Option<Pubkey> = self.mint.mint_authority.into();
        Backend::check_claimable(
            &self.backend.key(),
            &self.mint.key(),
            mint_authority.as_ref(),
        )?;

        let amount = self.vault.amount;
        require!(amount > 0, NumeraireError::ZeroAmount);

        let cpi_accounts = TransferChecked {
            from: self.vault.to_account_info(),
            mint: self.mint.to_account_info(),
            to: self.destination.to_account_info(),
            authority: self.backend.to_account_info(),
        };
        let backend_seeds = &[BACKEND_SEED, &[self.backend.bump]];
        let signer = &[&backend_seeds[..]];
        let cpi_ctx =
            CpiContext::new_with_signer(self.token_program.to_account_info(), cpi_accounts, signer);

        transfer_checked(cpi_ctx, amount, self.mint.decimals)?;

        emit!(TokensClaimed {
            mint: self.mint.key(),
            destination: self.destination.key(),
            amount,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}
