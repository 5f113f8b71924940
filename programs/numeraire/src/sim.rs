//! Host-side ledger that runs the same state transitions as the program over
//! in-memory tables, with a controllable clock.
//!
//! Every write runs as a transaction: the whole state is cloned on entry and
//! restored if the operation fails, so a rejected call never leaves a trace.
//! `caller` plays the role of the transaction signer.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::constants::{BACKEND_SEED, DECIMALS, ESCROW_SEED, NAME, SYMBOL};
use crate::errors::NumeraireError;
use crate::math::SafeMath;
use crate::state::{
    move_balance, require_deposit_address, require_recipient, Allowance, Backend, GenesisConfig,
    Holder, Operation, OperationKind, Round, Stake, Tournament,
};

/// Stakes are keyed by (tournament, round, staker).
pub type StakeKey = (u64, u64, Pubkey);

#[derive(Clone)]
pub struct Numeraire {
    backend_key: Pubkey,
    backend: Backend,
    escrow: Holder,
    holders: BTreeMap<Pubkey, Holder>,
    allowances: BTreeMap<(Pubkey, Pubkey), Allowance>,
    tournaments: BTreeMap<u64, Tournament>,
    rounds: BTreeMap<(u64, u64), Round>,
    stakes: BTreeMap<StakeKey, Stake>,
    operations: BTreeMap<[u8; 32], Operation>,
    bonuses: BTreeMap<Pubkey, u64>,
    foreign: BTreeMap<(Pubkey, Pubkey), u64>, // (holder, mint) -> amount
    now: i64,
}

/// Full copy of the ledger, restored with [`Numeraire::revert`].
#[derive(Clone)]
pub struct Snapshot(Numeraire);

impl Numeraire {
    pub fn new(config: GenesisConfig, now: i64) -> Result<Self> {
        let (backend_key, bump) = Pubkey::find_program_address(&[BACKEND_SEED], &crate::ID);
        let (_, escrow_bump) =
            Pubkey::find_program_address(&[ESCROW_SEED, backend_key.as_ref()], &crate::ID);
        let backend = Backend::genesis(config, crate::ID, now, bump)?;

        let mut holders = BTreeMap::new();
        holders.insert(backend_key, Holder::open(backend_key, 0));

        Ok(Self {
            backend_key,
            backend,
            escrow: Holder::open(backend_key, escrow_bump),
            holders,
            allowances: BTreeMap::new(),
            tournaments: BTreeMap::new(),
            rounds: BTreeMap::new(),
            stakes: BTreeMap::new(),
            operations: BTreeMap::new(),
            bonuses: BTreeMap::new(),
            foreign: BTreeMap::new(),
            now,
        })
    }

    fn transact<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let before = self.clone();
        let out = op(self);
        if out.is_err() {
            *self = before;
        }
        out
    }

    // ============= CLOCK AND SNAPSHOTS =============

    pub fn now(&self) -> i64 {
        self.now
    }

    pub fn advance_time(&mut self, secs: u64) {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        self.now = self.now.saturating_add(secs);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.clone())
    }

    pub fn revert(&mut self, snapshot: Snapshot) {
        *self = snapshot.0;
    }

    // ============= READS =============

    pub fn name(&self) -> &'static str {
        NAME
    }

    pub fn symbol(&self) -> &'static str {
        SYMBOL
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    /// Identity of the treasury holder.
    pub fn treasury(&self) -> Pubkey {
        self.backend_key
    }

    pub fn balance_of(&self, key: &Pubkey) -> u128 {
        self.holders.get(key).map_or(0, |h| h.balance)
    }

    pub fn escrowed(&self) -> u128 {
        self.escrow.balance
    }

    pub fn total_supply(&self) -> u128 {
        self.backend.total_supply
    }

    /// Every holder balance plus escrow. Equals `total_supply` at all times.
    pub fn sum_of_balances(&self) -> u128 {
        self.holders
            .values()
            .fold(self.escrow.balance, |acc, h| acc.saturating_add(h.balance))
    }

    pub fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .map_or(0, |a| a.amount)
    }

    pub fn mintable(&self) -> Result<u128> {
        self.backend.mintable(self.now)
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn owners(&self) -> &[Pubkey] {
        &self.backend.owners
    }

    pub fn is_owner(&self, key: &Pubkey) -> bool {
        self.backend.is_owner(key)
    }

    pub fn delegate(&self) -> Pubkey {
        self.backend.delegate
    }

    pub fn stopped(&self) -> bool {
        self.backend.stopped
    }

    pub fn tournament(&self, id: u64) -> Option<&Tournament> {
        self.tournaments.get(&id)
    }

    pub fn round(&self, tournament_id: u64, round_id: u64) -> Option<&Round> {
        self.rounds.get(&(tournament_id, round_id))
    }

    /// Round ids of a tournament in creation order.
    pub fn rounds_of(&self, tournament_id: u64) -> &[u64] {
        self.tournaments
            .get(&tournament_id)
            .map(|t| t.round_ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_stake(&self, tournament_id: u64, round_id: u64, staker: &Pubkey) -> Option<&Stake> {
        self.stakes.get(&(tournament_id, round_id, *staker))
    }

    pub fn operation(&self, kind: &OperationKind) -> Option<&Operation> {
        let digest = kind.digest().ok()?;
        self.operations.get(&digest)
    }

    pub fn has_confirmed(&self, kind: &OperationKind, owner: &Pubkey) -> bool {
        self.operation(kind)
            .is_some_and(|op| op.has_confirmed(&self.backend, owner))
    }

    /// Lamports paid out as release bonuses to `staker`.
    pub fn bonus_paid(&self, staker: &Pubkey) -> u64 {
        self.bonuses.get(staker).copied().unwrap_or(0)
    }

    pub fn foreign_balance(&self, holder: &Pubkey, mint: &Pubkey) -> u64 {
        self.foreign.get(&(*holder, *mint)).copied().unwrap_or(0)
    }

    // ============= LEDGER =============

    fn holder(&self, key: &Pubkey) -> Holder {
        self.holders
            .get(key)
            .cloned()
            .unwrap_or_else(|| Holder::open(*key, 0))
    }

    fn settle(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        let mut source = self.holder(from);
        if from == to {
            require!(amount <= source.balance, NumeraireError::InsufficientBalance);
            return Ok(());
        }
        let mut dest = self.holder(to);
        move_balance(&mut source, &mut dest, amount)?;
        self.holders.insert(*from, source);
        self.holders.insert(*to, dest);
        Ok(())
    }

    pub fn transfer(&mut self, caller: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        self.transact(|l| {
            l.backend.require_active()?;
            require_recipient(to)?;
            l.settle(caller, to, amount)
        })
    }

    fn allowance_entry(&mut self, owner: &Pubkey, spender: &Pubkey) -> &mut Allowance {
        self.allowances
            .entry((*owner, *spender))
            .or_insert_with(|| Allowance::open(*owner, *spender, 0))
    }

    pub fn approve(&mut self, caller: &Pubkey, spender: &Pubkey, amount: u128) -> Result<()> {
        self.transact(|l| {
            l.backend.require_active()?;
            l.allowance_entry(caller, spender).approve(amount)
        })
    }

    pub fn change_approval(
        &mut self,
        caller: &Pubkey,
        spender: &Pubkey,
        expected: u128,
        amount: u128,
    ) -> Result<()> {
        self.transact(|l| {
            l.backend.require_active()?;
            l.allowance_entry(caller, spender).change(expected, amount)
        })
    }

    pub fn transfer_from(
        &mut self,
        caller: &Pubkey,
        owner: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> Result<()> {
        self.transact(|l| {
            l.backend.require_active()?;
            require_recipient(to)?;
            require!(
                amount <= l.balance_of(owner),
                NumeraireError::InsufficientBalance
            );
            l.allowance_entry(owner, caller).consume(amount)?;
            l.settle(owner, to, amount)
        })
    }

    pub fn mint(&mut self, caller: &Pubkey, amount: u128) -> Result<()> {
        self.transact(|l| {
            l.backend.require_active_owner(caller)?;
            l.backend.mint(amount, l.now)?;
            let treasury = l.backend_key;
            l.holders
                .entry(treasury)
                .or_insert_with(|| Holder::open(treasury, 0))
                .credit(amount)
        })
    }

    /// One owner's confirmation of a treasury payout. Returns `true` when this
    /// confirmation executed the transfer.
    pub fn numerai_transfer(&mut self, caller: &Pubkey, to: &Pubkey, amount: u128) -> Result<bool> {
        self.transact(|l| {
            let kind = OperationKind::NumeraiTransfer { to: *to, amount };
            l.backend.check(&kind)?;
            let executed = l.confirm(caller, kind)?;
            if executed {
                let treasury = l.backend_key;
                l.settle(&treasury, to, amount)?;
            }
            Ok(executed)
        })
    }

    pub fn withdraw(
        &mut self,
        caller: &Pubkey,
        deposit: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> Result<()> {
        self.transact(|l| {
            l.backend.require_active_owner(caller)?;
            require_deposit_address(deposit)?;
            require_recipient(to)?;
            l.settle(deposit, to, amount)
        })
    }

    pub fn transfer_deposit(&mut self, caller: &Pubkey, deposit: &Pubkey, amount: u128) -> Result<()> {
        self.transact(|l| {
            l.backend.require_active_owner(caller)?;
            require_deposit_address(deposit)?;
            let treasury = l.backend_key;
            l.settle(deposit, &treasury, amount)
        })
    }

    // ============= TOURNAMENTS =============

    pub fn create_tournament(&mut self, caller: &Pubkey, id: u64) -> Result<()> {
        self.transact(|l| {
            l.backend.require_active_owner(caller)?;
            let mut tournament = l.tournaments.get(&id).cloned().unwrap_or_default();
            tournament.create(id, *caller, l.now, 0)?;
            l.tournaments.insert(id, tournament);
            Ok(())
        })
    }

    pub fn create_round(
        &mut self,
        caller: &Pubkey,
        tournament_id: u64,
        round_id: u64,
        end_time: Option<i64>,
        resolution_time: i64,
    ) -> Result<()> {
        self.transact(|l| {
            l.backend.require_active_owner(caller)?;
            let mut tournament = l.tournaments.get(&tournament_id).cloned().unwrap_or_default();
            let mut round = l
                .rounds
                .get(&(tournament_id, round_id))
                .cloned()
                .unwrap_or_default();
            round.create(
                &mut tournament,
                round_id,
                end_time,
                resolution_time,
                *caller,
                l.now,
                0,
            )?;
            l.tournaments.insert(tournament_id, tournament);
            l.rounds.insert((tournament_id, round_id), round);
            Ok(())
        })
    }

    // ============= STAKES =============

    fn existing_round(&self, tournament_id: u64, round_id: u64) -> Result<Round> {
        require!(
            self.tournaments.contains_key(&tournament_id),
            NumeraireError::TournamentNotFound
        );
        self.rounds
            .get(&(tournament_id, round_id))
            .cloned()
            .ok_or_else(|| error!(NumeraireError::RoundNotFound))
    }

    fn lock(
        &mut self,
        staker: &Pubkey,
        amount: u128,
        tournament_id: u64,
        round_id: u64,
        confidence: u8,
    ) -> Result<()> {
        let round = self.existing_round(tournament_id, round_id)?;
        let key = (tournament_id, round_id, *staker);
        let mut stake = self.stakes.get(&key).cloned().unwrap_or_default();
        let mut holder = self.holder(staker);

        stake.lock(&mut holder, &mut self.escrow, &round, amount, confidence, self.now, 0)?;

        self.holders.insert(*staker, holder);
        self.stakes.insert(key, stake);
        Ok(())
    }

    pub fn stake(
        &mut self,
        caller: &Pubkey,
        amount: u128,
        tournament_id: u64,
        round_id: u64,
        confidence: u8,
    ) -> Result<()> {
        self.transact(|l| {
            l.backend.require_active()?;
            l.lock(caller, amount, tournament_id, round_id, confidence)
        })
    }

    pub fn stake_on_behalf(
        &mut self,
        caller: &Pubkey,
        staker: &Pubkey,
        amount: u128,
        tournament_id: u64,
        round_id: u64,
        confidence: u8,
    ) -> Result<()> {
        self.transact(|l| {
            l.backend.require_active_owner(caller)?;
            require_deposit_address(staker)?;
            l.lock(staker, amount, tournament_id, round_id, confidence)
        })
    }

    /// Returns the amount handed back to the staker.
    pub fn release_stake(
        &mut self,
        caller: &Pubkey,
        staker: &Pubkey,
        bonus_lamports: u64,
        tournament_id: u64,
        round_id: u64,
        successful: bool,
    ) -> Result<u128> {
        self.transact(|l| {
            l.backend.require_active_owner(caller)?;
            let round = l.existing_round(tournament_id, round_id)?;
            let key = (tournament_id, round_id, *staker);
            let mut stake = l.stakes.get(&key).cloned().unwrap_or_default();
            let mut holder = l.holder(staker);

            let amount = stake.release(&mut holder, &mut l.escrow, &round, successful, l.now)?;
            l.holders.insert(*staker, holder);
            l.stakes.insert(key, stake);

            if bonus_lamports > 0 {
                let paid = l.bonuses.entry(*staker).or_insert(0);
                *paid = paid.safe_add(bonus_lamports)?;
            }
            Ok(amount)
        })
    }

    /// Returns the amount burned.
    pub fn destroy_stake(
        &mut self,
        caller: &Pubkey,
        staker: &Pubkey,
        tournament_id: u64,
        round_id: u64,
    ) -> Result<u128> {
        self.transact(|l| {
            l.backend.require_active_owner(caller)?;
            let round = l.existing_round(tournament_id, round_id)?;
            let key = (tournament_id, round_id, *staker);
            let mut stake = l.stakes.get(&key).cloned().unwrap_or_default();

            let amount = stake.destroy(&mut l.backend, &mut l.escrow, &round, l.now)?;
            l.stakes.insert(key, stake);
            Ok(amount)
        })
    }

    // ============= GOVERNANCE =============

    fn confirm(&mut self, caller: &Pubkey, kind: OperationKind) -> Result<bool> {
        let digest = kind.digest()?;
        let mut op = self
            .operations
            .get(&digest)
            .cloned()
            .unwrap_or_else(|| Operation::pending(kind.clone(), [0; 32], 0, 0));
        let executed = op.confirm(&self.backend, caller, digest, kind, 0)?;
        self.operations.insert(digest, op);
        Ok(executed)
    }

    /// Record `caller`'s confirmation of a backend operation, executing it when
    /// the threshold is reached. Returns whether it executed.
    pub fn govern(&mut self, caller: &Pubkey, kind: OperationKind) -> Result<bool> {
        self.transact(|l| {
            require!(
                !matches!(kind, OperationKind::NumeraiTransfer { .. }),
                NumeraireError::OperationMismatch
            );
            l.backend.check(&kind)?;
            let executed = l.confirm(caller, kind.clone())?;
            if executed {
                l.backend.execute(&kind, l.now)?;
            }
            Ok(executed)
        })
    }

    pub fn change_shareable(
        &mut self,
        caller: &Pubkey,
        owners: Vec<Pubkey>,
        required: u8,
    ) -> Result<bool> {
        self.govern(caller, OperationKind::ChangeShareable { owners, required })
    }

    pub fn change_delegate(&mut self, caller: &Pubkey, delegate: Pubkey) -> Result<bool> {
        self.govern(caller, OperationKind::ChangeDelegate { delegate })
    }

    pub fn change_disbursement(
        &mut self,
        caller: &Pubkey,
        refill_per_period: u128,
        period_length: i64,
        cap: u128,
    ) -> Result<bool> {
        self.govern(
            caller,
            OperationKind::ChangeDisbursement {
                refill_per_period,
                period_length,
                cap,
            },
        )
    }

    pub fn release(&mut self, caller: &Pubkey) -> Result<bool> {
        self.govern(caller, OperationKind::Release)
    }

    pub fn disable_stopping(&mut self, caller: &Pubkey) -> Result<bool> {
        self.govern(caller, OperationKind::DisableStopping)
    }

    pub fn disable_contract_upgradability(&mut self, caller: &Pubkey) -> Result<bool> {
        self.govern(caller, OperationKind::DisableContractUpgradability)
    }

    pub fn revoke(&mut self, caller: &Pubkey, kind: &OperationKind) -> Result<()> {
        self.transact(|l| {
            l.backend.require_owner(caller)?;
            let digest = kind.digest()?;
            let op = l
                .operations
                .get_mut(&digest)
                .ok_or_else(|| error!(NumeraireError::NotConfirmed))?;
            op.revoke(&l.backend, caller)
        })
    }

    pub fn emergency_stop(&mut self, caller: &Pubkey) -> Result<()> {
        self.transact(|l| l.backend.emergency_stop(caller))
    }

    // ============= FOREIGN ASSETS =============

    /// Credit the backend with `amount` of a foreign SPL mint, as a stray
    /// transfer would.
    pub fn receive_foreign(&mut self, mint: &Pubkey, amount: u64) -> Result<()> {
        let held = self.foreign.entry((self.backend_key, *mint)).or_insert(0);
        *held = held.safe_add(amount)?;
        Ok(())
    }

    /// Sweep the backend's whole balance of `mint` to `caller`.
    pub fn claim_tokens(
        &mut self,
        caller: &Pubkey,
        mint: &Pubkey,
        mint_authority: Option<&Pubkey>,
    ) -> Result<u64> {
        self.transact(|l| {
            l.backend.require_active_owner(caller)?;
            Backend::check_claimable(&l.backend_key, mint, mint_authority)?;
            let amount = l
                .foreign
                .remove(&(l.backend_key, *mint))
                .unwrap_or(0);
            require!(amount > 0, NumeraireError::ZeroAmount);
            let held = l.foreign.entry((*caller, *mint)).or_insert(0);
            *held = held.safe_add(amount)?;
            Ok(amount)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::INITIAL_DISBURSEMENT;

    fn ledger() -> (Numeraire, Pubkey, Pubkey) {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let l = Numeraire::new(GenesisConfig::numerai(vec![a, b], 2), 1_000).unwrap();
        (l, a, b)
    }

    #[test]
    fn failed_execution_rolls_back_the_confirmation() {
        let (mut l, a, b) = ledger();
        let user = Pubkey::new_unique();
        let kind = OperationKind::NumeraiTransfer { to: user, amount: 100 };

        assert!(!l.numerai_transfer(&a, &user, 100).unwrap());
        // treasury is empty, so the executing confirmation fails as a whole
        assert_eq!(
            l.numerai_transfer(&b, &user, 100).unwrap_err(),
            NumeraireError::InsufficientBalance.into()
        );
        assert!(l.has_confirmed(&kind, &a));
        assert!(!l.has_confirmed(&kind, &b));

        l.mint(&a, 100).unwrap();
        assert!(l.numerai_transfer(&b, &user, 100).unwrap());
        assert_eq!(l.balance_of(&user), 100);
        assert_eq!(l.balance_of(&l.treasury()), 0);
    }

    #[test]
    fn snapshot_restores_every_table() {
        let (mut l, a, _) = ledger();
        let snap = l.snapshot();
        l.mint(&a, INITIAL_DISBURSEMENT).unwrap();
        l.create_tournament(&a, 1).unwrap();
        l.advance_time(10);

        l.revert(snap);
        assert_eq!(l.total_supply(), 0);
        assert!(l.tournament(1).is_none());
        assert_eq!(l.now(), 1_000);
        assert_eq!(l.mintable().unwrap(), INITIAL_DISBURSEMENT);
    }

    #[test]
    fn treasury_is_the_backend_holder() {
        let (mut l, a, _) = ledger();
        l.mint(&a, 7).unwrap();
        assert_eq!(l.balance_of(&l.treasury()), 7);
        assert_eq!(l.sum_of_balances(), l.total_supply());
    }
}
