use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::NumeraireError;
use crate::math::SafeMath;
use crate::state::{require_recipient, DisbursementPool, OperationKind};

/// Parameters the ledger is created with.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct GenesisConfig {
    pub owners: Vec<Pubkey>,
    pub required: u8,
    pub initial_disbursement: u128,
    pub refill_per_period: u128,
    pub period_length: i64,
    pub disbursement_cap: u128,
    pub supply_cap: u128,
}

impl GenesisConfig {
    /// Production issuance schedule with the given owner set.
    pub fn numerai(owners: Vec<Pubkey>, required: u8) -> Self {
        Self {
            owners,
            required,
            initial_disbursement: INITIAL_DISBURSEMENT,
            refill_per_period: WEEKLY_DISBURSEMENT,
            period_length: DISBURSEMENT_PERIOD,
            disbursement_cap: SUPPLY_CAP,
            supply_cap: SUPPLY_CAP,
        }
    }
}

/// The stable entry point's storage: owner set, lifecycle latches, the active
/// logic pointer, total supply and the disbursement pool.
#[account]
pub struct Backend {
    pub owners: Vec<Pubkey>,
    pub required: u8,
    pub owner_generation: u64, // Bumped on every owner-set change
    pub delegate: Pubkey,      // Active logic implementation, default = none
    pub stopped: bool,
    pub stoppable: bool,
    pub upgradable: bool,
    pub total_supply: u128,
    pub supply_cap: u128,
    pub disbursement: DisbursementPool,
    pub deploy_time: i64,
    pub bump: u8,
}

impl Space for Backend {
    const INIT_SPACE: usize = 8      // Discriminator
        + 4 + 32 * MAX_OWNERS // owners: Vec<Pubkey>
        + 1     // required
        + 8     // owner_generation
        + 32    // delegate
        + 1     // stopped
        + 1     // stoppable
        + 1     // upgradable
        + 16    // total_supply
        + 16    // supply_cap
        + DisbursementPool::SIZE
        + 8     // deploy_time
        + 1;    // bump
}

impl Backend {
    pub fn genesis(config: GenesisConfig, delegate: Pubkey, now: i64, bump: u8) -> Result<Self> {
        Self::validate_owner_set(&config.owners, config.required)?;
        require!(
            config.disbursement_cap <= config.supply_cap
                && config.initial_disbursement <= config.supply_cap,
            NumeraireError::InvalidSchedule
        );
        let disbursement = DisbursementPool::new(
            config.initial_disbursement,
            config.refill_per_period,
            config.period_length,
            config.disbursement_cap,
            now,
        )?;

        Ok(Self {
            owners: config.owners,
            required: config.required,
            owner_generation: 0,
            delegate,
            stopped: false,
            stoppable: true,
            upgradable: true,
            total_supply: 0,
            supply_cap: config.supply_cap,
            disbursement,
            deploy_time: now,
            bump,
        })
    }

    pub fn validate_owner_set(owners: &[Pubkey], required: u8) -> Result<()> {
        require!(
            !owners.is_empty() && owners.len() <= MAX_OWNERS,
            NumeraireError::InvalidOwnerSet
        );
        require!(
            required >= 1 && (required as usize) <= owners.len(),
            NumeraireError::InvalidOwnerSet
        );
        for (i, owner) in owners.iter().enumerate() {
            require!(*owner != Pubkey::default(), NumeraireError::InvalidOwnerSet);
            require!(!owners[..i].contains(owner), NumeraireError::InvalidOwnerSet);
        }
        Ok(())
    }

    pub fn is_owner(&self, key: &Pubkey) -> bool {
        self.owners.contains(key)
    }

    pub fn require_owner(&self, key: &Pubkey) -> Result<()> {
        require!(self.is_owner(key), NumeraireError::CallerNotAuthorized);
        Ok(())
    }

    pub fn require_running(&self) -> Result<()> {
        require!(!self.stopped, NumeraireError::ContractStopped);
        Ok(())
    }

    /// Gate for every value-moving operation: not stopped, and this program is
    /// the logic implementation governance currently points at.
    pub fn require_active(&self) -> Result<()> {
        self.require_running()?;
        require_keys_eq!(self.delegate, crate::ID, NumeraireError::InactiveLogic);
        Ok(())
    }

    /// Owner-only operations that move value or write the directory.
    pub fn require_active_owner(&self, key: &Pubkey) -> Result<()> {
        self.require_active()?;
        self.require_owner(key)
    }

    pub fn mintable(&self, now: i64) -> Result<u128> {
        let headroom = self.supply_cap.saturating_sub(self.total_supply);
        Ok(self.disbursement.available_at(now)?.min(headroom))
    }

    /// Increase total supply by `amount`; the caller credits the treasury.
    pub fn mint(&mut self, amount: u128, now: i64) -> Result<()> {
        require!(amount > 0, NumeraireError::ZeroAmount);
        require!(amount <= self.mintable(now)?, NumeraireError::ExceedsDisbursement);

        let supply = self.total_supply.safe_add(amount)?;
        self.disbursement.consume(amount, now)?;
        self.total_supply = supply;

        msg!(
            "Minted {}, {} left in disbursement",
            amount,
            self.disbursement.remaining
        );
        Ok(())
    }

    pub fn emergency_stop(&mut self, caller: &Pubkey) -> Result<()> {
        self.require_owner(caller)?;
        require!(self.stoppable, NumeraireError::StoppingDisabled);
        require!(!self.stopped, NumeraireError::ContractStopped);
        self.stopped = true;
        msg!("Emergency stop by {}", caller);
        Ok(())
    }

    /// Preconditions of a governance operation, checked before a confirmation
    /// is recorded and again at execution.
    pub fn check(&self, kind: &OperationKind) -> Result<()> {
        match kind {
            OperationKind::ChangeShareable { owners, required } => {
                Self::validate_owner_set(owners, *required)
            }
            OperationKind::ChangeDelegate { .. } => {
                require!(self.upgradable, NumeraireError::UpgradabilityDisabled);
                Ok(())
            }
            OperationKind::ChangeDisbursement {
                period_length, cap, ..
            } => {
                require!(
                    *period_length > 0 && *cap <= self.supply_cap,
                    NumeraireError::InvalidSchedule
                );
                Ok(())
            }
            OperationKind::Release => {
                require!(self.stopped, NumeraireError::NotStopped);
                Ok(())
            }
            OperationKind::DisableStopping | OperationKind::DisableContractUpgradability => Ok(()),
            OperationKind::NumeraiTransfer { to, amount } => {
                self.require_active()?;
                require!(*amount > 0, NumeraireError::ZeroAmount);
                require_recipient(to)
            }
        }
    }

    /// Apply a fully confirmed operation that only touches backend state.
    pub fn execute(&mut self, kind: &OperationKind, now: i64) -> Result<()> {
        self.check(kind)?;
        match kind {
            OperationKind::ChangeShareable { owners, required } => {
                self.owners = owners.clone();
                self.required = *required;
                self.owner_generation = self.owner_generation.safe_add(1)?;
            }
            OperationKind::ChangeDelegate { delegate } => {
                self.delegate = *delegate;
            }
            OperationKind::ChangeDisbursement {
                refill_per_period,
                period_length,
                cap,
            } => {
                self.disbursement
                    .reconfigure(*refill_per_period, *period_length, *cap, now)?;
            }
            OperationKind::Release => {
                self.stopped = false;
            }
            OperationKind::DisableStopping => {
                self.stoppable = false;
            }
            OperationKind::DisableContractUpgradability => {
                self.upgradable = false;
            }
            OperationKind::NumeraiTransfer { .. } => {
                return err!(NumeraireError::OperationMismatch);
            }
        }
        msg!("Executed {:?}", kind);
        Ok(())
    }

    /// Any asset may be recovered except the ledger's own token: the backend
    /// address itself, or a mint the backend controls.
    pub fn check_claimable(
        backend_key: &Pubkey,
        mint: &Pubkey,
        mint_authority: Option<&Pubkey>,
    ) -> Result<()> {
        require_keys_neq!(*mint, *backend_key, NumeraireError::CannotClaimOwnToken);
        require!(
            mint_authority != Some(backend_key),
            NumeraireError::CannotClaimOwnToken
        );
        Ok(())
    }
}

#[event]
pub struct Minted {
    pub amount: u128,
    pub total_supply: u128,
    pub remaining_disbursement: u128,
    pub timestamp: i64,
}

#[event]
pub struct Stopped {
    pub by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct TokensClaimed {
    pub mint: Pubkey,
    pub destination: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(owners: usize, required: u8) -> Backend {
        let owners = (0..owners).map(|_| Pubkey::new_unique()).collect();
        Backend::genesis(GenesisConfig::numerai(owners, required), crate::ID, 0, 255).unwrap()
    }

    #[test]
    fn owner_set_validation() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        Backend::validate_owner_set(&[a, b], 2).unwrap();
        for (owners, required) in [
            (vec![], 1),
            (vec![a, b], 0),
            (vec![a, b], 3),
            (vec![a, a], 1),
            (vec![a, Pubkey::default()], 1),
        ] {
            assert_eq!(
                Backend::validate_owner_set(&owners, required).unwrap_err(),
                NumeraireError::InvalidOwnerSet.into()
            );
        }
    }

    #[test]
    fn mint_is_bounded_by_disbursement() {
        let mut b = backend(2, 2);
        assert_eq!(b.mintable(0).unwrap(), INITIAL_DISBURSEMENT);
        assert_eq!(
            b.mint(INITIAL_DISBURSEMENT + 1, 0).unwrap_err(),
            NumeraireError::ExceedsDisbursement.into()
        );
        assert_eq!(b.total_supply, 0);
        b.mint(INITIAL_DISBURSEMENT, 0).unwrap();
        assert_eq!(b.total_supply, INITIAL_DISBURSEMENT);
        assert_eq!(b.mintable(0).unwrap(), 0);
        assert_eq!(b.mintable(DISBURSEMENT_PERIOD).unwrap(), WEEKLY_DISBURSEMENT);
    }

    #[test]
    fn mint_is_bounded_by_supply_cap() {
        let mut b = backend(1, 1);
        b.total_supply = SUPPLY_CAP - 10;
        assert_eq!(b.mintable(0).unwrap(), 10);
        assert_eq!(b.mint(11, 0).unwrap_err(), NumeraireError::ExceedsDisbursement.into());
    }

    #[test]
    fn stop_requires_owner_and_stoppable() {
        let mut b = backend(2, 2);
        let owner = b.owners[0];
        assert_eq!(
            b.emergency_stop(&Pubkey::new_unique()).unwrap_err(),
            NumeraireError::CallerNotAuthorized.into()
        );
        b.emergency_stop(&owner).unwrap();
        assert_eq!(b.require_active().unwrap_err(), NumeraireError::ContractStopped.into());
        assert_eq!(b.emergency_stop(&owner).unwrap_err(), NumeraireError::ContractStopped.into());

        b.execute(&OperationKind::Release, 0).unwrap();
        b.execute(&OperationKind::DisableStopping, 0).unwrap();
        assert_eq!(b.emergency_stop(&owner).unwrap_err(), NumeraireError::StoppingDisabled.into());
    }

    #[test]
    fn release_requires_stopped() {
        let b = backend(2, 2);
        assert_eq!(b.check(&OperationKind::Release).unwrap_err(), NumeraireError::NotStopped.into());
    }

    #[test]
    fn delegate_pointer_gates_logic_until_upgrades_disabled() {
        let mut b = backend(2, 2);
        b.require_active().unwrap();

        b.execute(&OperationKind::ChangeDelegate { delegate: Pubkey::default() }, 0).unwrap();
        assert_eq!(b.require_active().unwrap_err(), NumeraireError::InactiveLogic.into());

        b.execute(&OperationKind::ChangeDelegate { delegate: crate::ID }, 0).unwrap();
        b.execute(&OperationKind::DisableContractUpgradability, 0).unwrap();
        assert_eq!(
            b.execute(&OperationKind::ChangeDelegate { delegate: Pubkey::new_unique() }, 0)
                .unwrap_err(),
            NumeraireError::UpgradabilityDisabled.into()
        );
        assert_eq!(b.delegate, crate::ID);
    }

    #[test]
    fn active_owner_checks_lifecycle_before_caller() {
        let mut b = backend(2, 2);
        let owner = b.owners[0];
        let stranger = Pubkey::new_unique();
        b.require_active_owner(&owner).unwrap();
        assert_eq!(
            b.require_active_owner(&stranger).unwrap_err(),
            NumeraireError::CallerNotAuthorized.into()
        );

        b.stopped = true;
        assert_eq!(
            b.require_active_owner(&stranger).unwrap_err(),
            NumeraireError::ContractStopped.into()
        );
        assert_eq!(
            b.require_active_owner(&owner).unwrap_err(),
            NumeraireError::ContractStopped.into()
        );

        b.stopped = false;
        b.delegate = Pubkey::new_unique();
        assert_eq!(
            b.require_active_owner(&owner).unwrap_err(),
            NumeraireError::InactiveLogic.into()
        );
    }

    #[test]
    fn own_token_is_not_claimable() {
        let backend_key = Pubkey::new_unique();
        let foreign = Pubkey::new_unique();
        Backend::check_claimable(&backend_key, &foreign, Some(&Pubkey::new_unique())).unwrap();
        Backend::check_claimable(&backend_key, &foreign, None).unwrap();
        assert_eq!(
            Backend::check_claimable(&backend_key, &backend_key, None).unwrap_err(),
            NumeraireError::CannotClaimOwnToken.into()
        );
        assert_eq!(
            Backend::check_claimable(&backend_key, &foreign, Some(&backend_key)).unwrap_err(),
            NumeraireError::CannotClaimOwnToken.into()
        );
    }
}
