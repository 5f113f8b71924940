use anchor_lang::prelude::*;

use crate::constants::{BACKEND_SEED, HOLDER_SEED, OPERATION_SEED};
use crate::errors::NumeraireError;
use crate::instructions::settle;
use crate::state::{
    Backend, Confirmation, Holder, Operation, OperationExecuted, OperationKind, Revoked, Stopped,
    Transferred,
};

/// One owner's confirmation of a backend-only governance operation. The
/// operation account is addressed by the descriptor digest.
#[derive(Accounts)]
#[instruction(digest: [u8; 32])]
pub struct Govern<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [BACKEND_SEED],
        bump = backend.bump
    )]
    pub backend: Account<'info, Backend>,

    #[account(
        init_if_needed,
        payer = owner,
        space = Operation::INIT_SPACE,
        seeds = [OPERATION_SEED, digest.as_ref()],
        bump
    )]
    pub operation: Account<'info, Operation>,

    pub system_program: Program<'info, System>,
}

impl<'info> Govern<'info> {
    pub fn govern(
        &mut self,
        digest: [u8; 32],
        kind: OperationKind,
        bumps: &GovernBumps,
    ) -> Result<()> {
        require!(
            !matches!(kind, OperationKind::NumeraiTransfer { .. }),
            NumeraireError::OperationMismatch
        );
        self.backend.check(&kind)?;

        let owner = self.owner.key();
        let executed = self.operation.confirm(
            &self.backend,
            &owner,
            digest,
            kind.clone(),
            bumps.operation,
        )?;

        emit!(Confirmation {
            owner,
            digest,
            executed,
        });

        if executed {
            let now = Clock::get()?.unix_timestamp;
            self.backend.execute(&kind, now)?;
            emit!(OperationExecuted {
                digest,
                kind,
                timestamp: now,
            });
        }
        Ok(())
    }
}

/// Multisig-gated payout from the treasury.
#[derive(Accounts)]
#[instruction(digest: [u8; 32], recipient: Pubkey)]
pub struct NumeraiTransfer<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    #[account(
        init_if_needed,
        payer = owner,
        space = Operation::INIT_SPACE,
        seeds = [OPERATION_SEED, digest.as_ref()],
        bump
    )]
    pub operation: Account<'info, Operation>,

    #[account(
        mut,
        seeds = [HOLDER_SEED, backend.key().as_ref()],
        bump = treasury.bump
    )]
    pub treasury: Account<'info, Holder>,

    #[account(
        init_if_needed,
        payer = owner,
        space = Holder::INIT_SPACE,
        seeds = [HOLDER_SEED, recipient.as_ref()],
        bump
    )]
    pub to_holder: Account<'info, Holder>,

    pub system_program: Program<'info, System>,
}

impl<'info> NumeraiTransfer<'info> {
    pub fn numerai_transfer(
        &mut self,
        digest: [u8; 32],
        recipient: Pubkey,
        amount: u128,
        bumps: &NumeraiTransferBumps,
    ) -> Result<()> {
        let kind = OperationKind::NumeraiTransfer {
            to: recipient,
            amount,
        };
        self.backend.check(&kind)?;

        let owner = self.owner.key();
        let executed = self.operation.confirm(
            &self.backend,
            &owner,
            digest,
            kind.clone(),
            bumps.operation,
        )?;

        emit!(Confirmation {
            owner,
            digest,
            executed,
        });

        if executed {
            let now = Clock::get()?.unix_timestamp;
            self.to_holder.init_if_empty(recipient, bumps.to_holder);
            settle(&mut self.treasury, &mut self.to_holder, amount)?;

            emit!(Transferred {
                from: self.backend.key(),
                to: recipient,
                amount,
                timestamp: now,
            });
            emit!(OperationExecuted {
                digest,
                kind,
                timestamp: now,
            });
        }
        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(digest: [u8; 32])]
pub struct Revoke<'info> {
    pub owner: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    #[account(
        mut,
        seeds = [OPERATION_SEED, digest.as_ref()],
        bump = operation.bump
    )]
    pub operation: Account<'info, Operation>,
}

impl<'info> Revoke<'info> {
    pub fn revoke(&mut self, digest: [u8; 32]) -> Result<()> {
        let owner = self.owner.key();
        self.operation.revoke(&self.backend, &owner)?;

        emit!(Revoked { owner, digest });
        Ok(())
    }
}

#[derive(Accounts)]
pub struct EmergencyStop<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [BACKEND_SEED],
        bump = backend.bump
    )]
    pub backend: Account<'info, Backend>,
}

impl<'info> EmergencyStop<'info> {
    pub fn emergency_stop(&mut self) -> Result<()> {
        self.backend.emergency_stop(&self.owner.key())?;

        emit!(Stopped {
            by: self.owner.key(),
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}
