use anchor_lang::prelude::*;

use crate::constants::{BACKEND_SEED, ESCROW_SEED, HOLDER_SEED};
use crate::state::{Backend, GenesisConfig, Holder};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = Backend::INIT_SPACE,
        seeds = [BACKEND_SEED],
        bump
    )]
    pub backend: Account<'info, Backend>,

    #[account(
        init,
        payer = payer,
        space = Holder::INIT_SPACE,
        seeds = [HOLDER_SEED, backend.key().as_ref()],
        bump
    )]
    pub treasury: Account<'info, Holder>,

    #[account(
        init,
        payer = payer,
        space = Holder::INIT_SPACE,
        seeds = [ESCROW_SEED, backend.key().as_ref()],
        bump
    )]
    pub escrow: Account<'info, Holder>,

    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    pub fn initialize(&mut self, config: GenesisConfig, bumps: &InitializeBumps) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;

        // This program starts out as the active logic implementation
        self.backend
            .set_inner(Backend::genesis(config, crate::ID, now, bumps.backend)?);
        self.treasury
            .set_inner(Holder::open(self.backend.key(), bumps.treasury));
        self.escrow
            .set_inner(Holder::open(self.backend.key(), bumps.escrow));

        msg!(
            "Ledger initialized with {} owners, {} required",
            self.backend.owners.len(),
            self.backend.required
        );
        Ok(())
    }
}

/// Read-only view over the backend.
#[derive(Accounts)]
pub struct ReadBackend<'info> {
    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,
}

impl<'info> ReadBackend<'info> {
    pub fn mintable(&self) -> Result<u128> {
        self.backend.mintable(Clock::get()?.unix_timestamp)
    }
}
