use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;

use crate::constants::MAX_OWNERS;
use crate::errors::NumeraireError;
use crate::math::SafeMath;
use crate::state::Backend;

/// A privileged call that needs `Backend::required` owner confirmations.
/// Operations are identified by the descriptor itself; the digest only derives
/// the account address.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum OperationKind {
    ChangeShareable { owners: Vec<Pubkey>, required: u8 },
    ChangeDelegate { delegate: Pubkey },
    ChangeDisbursement {
        refill_per_period: u128,
        period_length: i64,
        cap: u128,
    },
    Release,
    DisableStopping,
    DisableContractUpgradability,
    NumeraiTransfer { to: Pubkey, amount: u128 },
}

impl OperationKind {
    // ChangeShareable at MAX_OWNERS is the largest variant
    pub const MAX_SIZE: usize = 1 + 4 + 32 * MAX_OWNERS + 1;

    pub fn digest(&self) -> Result<[u8; 32]> {
        let mut data = Vec::with_capacity(Self::MAX_SIZE);
        self.serialize(&mut data)
            .map_err(|_| error!(NumeraireError::SerializationFailed))?;
        Ok(hash(&data).to_bytes())
    }
}

#[account]
pub struct Operation {
    pub digest: [u8; 32], // Zero until first confirmation
    pub kind: OperationKind,
    pub confirmations: Vec<Pubkey>,
    pub generation: u64, // Owner generation the confirmations belong to
    pub executions: u64,
    pub bump: u8,
}

impl Space for Operation {
    const INIT_SPACE: usize = 8      // Discriminator
        + 32    // digest
        + OperationKind::MAX_SIZE
        + 4 + 32 * MAX_OWNERS // confirmations
        + 8     // generation
        + 8     // executions
        + 1;    // bump
}

impl Operation {
    pub fn pending(kind: OperationKind, digest: [u8; 32], generation: u64, bump: u8) -> Self {
        Self {
            digest,
            kind,
            confirmations: Vec::new(),
            generation,
            executions: 0,
            bump,
        }
    }

    /// Record `owner`'s confirmation of `kind`. Returns `true` exactly when this
    /// confirmation reaches the threshold; the confirmations are then cleared so
    /// the same descriptor must be confirmed afresh to run again.
    pub fn confirm(
        &mut self,
        backend: &Backend,
        owner: &Pubkey,
        digest: [u8; 32],
        kind: OperationKind,
        bump: u8,
    ) -> Result<bool> {
        backend.require_owner(owner)?;
        require!(kind.digest()? == digest, NumeraireError::OperationMismatch);

        if self.digest != digest {
            *self = Self::pending(kind, digest, backend.owner_generation, bump);
        }
        self.drop_stale(backend);

        require!(
            !self.confirmations.contains(owner),
            NumeraireError::AlreadyConfirmed
        );
        self.confirmations.push(*owner);

        if self.confirmations.len() < backend.required as usize {
            msg!(
                "Confirmation {}/{} by {}",
                self.confirmations.len(),
                backend.required,
                owner
            );
            return Ok(false);
        }

        self.confirmations.clear();
        self.executions = self.executions.safe_add(1)?;
        Ok(true)
    }

    pub fn revoke(&mut self, backend: &Backend, owner: &Pubkey) -> Result<()> {
        backend.require_owner(owner)?;
        self.drop_stale(backend);
        let before = self.confirmations.len();
        self.confirmations.retain(|k| k != owner);
        require!(
            self.confirmations.len() < before,
            NumeraireError::NotConfirmed
        );
        Ok(())
    }

    /// Confirmations given under a previous owner set no longer count.
    fn drop_stale(&mut self, backend: &Backend) {
        if self.generation != backend.owner_generation {
            self.confirmations.clear();
            self.generation = backend.owner_generation;
        }
    }

    pub fn has_confirmed(&self, backend: &Backend, owner: &Pubkey) -> bool {
        self.generation == backend.owner_generation && self.confirmations.contains(owner)
    }
}

#[event]
pub struct Confirmation {
    pub owner: Pubkey,
    pub digest: [u8; 32],
    pub executed: bool,
}

#[event]
pub struct Revoked {
    pub owner: Pubkey,
    pub digest: [u8; 32],
}

#[event]
pub struct OperationExecuted {
    pub digest: [u8; 32],
    pub kind: OperationKind,
    pub timestamp: i64,
}
