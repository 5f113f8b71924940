#![allow(unexpected_cfgs)]
use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod instructions;
pub mod math;
pub mod state;

#[cfg(not(target_os = "solana"))]
pub mod sim;

use crate::instructions::*;
use crate::state::*;

declare_id!("4GvLubQxBBh77zji9VuGAkZNGJTLrqcdJM14TUbj8sdU");

#[program]
pub mod numeraire {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, config: GenesisConfig) -> Result<()> {
        ctx.accounts.initialize(config, &ctx.bumps)?;
        Ok(())
    }

    pub fn get_mintable(ctx: Context<ReadBackend>) -> Result<u128> {
        ctx.accounts.mintable()
    }

    // ============= LEDGER =============

    pub fn transfer(ctx: Context<TransferTokens>, amount: u128) -> Result<()> {
        ctx.accounts.transfer(amount, &ctx.bumps)?;
        Ok(())
    }

    pub fn approve(ctx: Context<Approve>, amount: u128) -> Result<()> {
        ctx.accounts.approve(amount, &ctx.bumps)?;
        Ok(())
    }

    pub fn change_approval(ctx: Context<Approve>, expected: u128, amount: u128) -> Result<()> {
        ctx.accounts.change_approval(expected, amount, &ctx.bumps)?;
        Ok(())
    }

    pub fn transfer_from(ctx: Context<TransferFrom>, amount: u128) -> Result<()> {
        ctx.accounts.transfer_from(amount, &ctx.bumps)?;
        Ok(())
    }

    pub fn mint(ctx: Context<MintTokens>, amount: u128) -> Result<()> {
        ctx.accounts.mint(amount)?;
        Ok(())
    }

    pub fn numerai_transfer(
        ctx: Context<NumeraiTransfer>,
        digest: [u8; 32],
        recipient: Pubkey,
        amount: u128,
    ) -> Result<()> {
        ctx.accounts
            .numerai_transfer(digest, recipient, amount, &ctx.bumps)?;
        Ok(())
    }

    pub fn withdraw(ctx: Context<Withdraw>, amount: u128) -> Result<()> {
        ctx.accounts.withdraw(amount, &ctx.bumps)?;
        Ok(())
    }

    pub fn transfer_deposit(ctx: Context<TransferDeposit>, amount: u128) -> Result<()> {
        ctx.accounts.transfer_deposit(amount)?;
        Ok(())
    }

    // ============= TOURNAMENTS =============

    pub fn create_tournament(ctx: Context<CreateTournament>, tournament_id: u64) -> Result<()> {
        ctx.accounts.create_tournament(tournament_id, &ctx.bumps)?;
        Ok(())
    }

    pub fn create_round(
        ctx: Context<CreateRound>,
        _tournament_id: u64,
        round_id: u64,
        end_time: Option<i64>,
        resolution_time: i64,
    ) -> Result<()> {
        ctx.accounts
            .create_round(round_id, end_time, resolution_time, &ctx.bumps)?;
        Ok(())
    }

    // ============= STAKES =============

    pub fn stake(
        ctx: Context<StakeTokens>,
        amount: u128,
        _tournament_id: u64,
        _round_id: u64,
        confidence: u8,
    ) -> Result<()> {
        ctx.accounts.stake(amount, confidence, &ctx.bumps)?;
        Ok(())
    }

    pub fn stake_on_behalf(
        ctx: Context<StakeOnBehalf>,
        amount: u128,
        _tournament_id: u64,
        _round_id: u64,
        confidence: u8,
    ) -> Result<()> {
        ctx.accounts.stake_on_behalf(amount, confidence, &ctx.bumps)?;
        Ok(())
    }

    pub fn release_stake(
        ctx: Context<ReleaseStake>,
        _tournament_id: u64,
        _round_id: u64,
        bonus_lamports: u64,
        successful: bool,
    ) -> Result<()> {
        ctx.accounts.release_stake(bonus_lamports, successful)?;
        Ok(())
    }

    pub fn destroy_stake(
        ctx: Context<DestroyStake>,
        _tournament_id: u64,
        _round_id: u64,
    ) -> Result<()> {
        ctx.accounts.destroy_stake()?;
        Ok(())
    }

    // ============= GOVERNANCE =============

    pub fn change_shareable(
        ctx: Context<Govern>,
        digest: [u8; 32],
        owners: Vec<Pubkey>,
        required: u8,
    ) -> Result<()> {
        let kind = OperationKind::ChangeShareable { owners, required };
        ctx.accounts.govern(digest, kind, &ctx.bumps)?;
        Ok(())
    }

    pub fn change_delegate(ctx: Context<Govern>, digest: [u8; 32], delegate: Pubkey) -> Result<()> {
        let kind = OperationKind::ChangeDelegate { delegate };
        ctx.accounts.govern(digest, kind, &ctx.bumps)?;
        Ok(())
    }

    pub fn change_disbursement(
        ctx: Context<Govern>,
        digest: [u8; 32],
        refill_per_period: u128,
        period_length: i64,
        cap: u128,
    ) -> Result<()> {
        let kind = OperationKind::ChangeDisbursement {
            refill_per_period,
            period_length,
            cap,
        };
        ctx.accounts.govern(digest, kind, &ctx.bumps)?;
        Ok(())
    }

    pub fn release(ctx: Context<Govern>, digest: [u8; 32]) -> Result<()> {
        ctx.accounts
            .govern(digest, OperationKind::Release, &ctx.bumps)?;
        Ok(())
    }

    pub fn disable_stopping(ctx: Context<Govern>, digest: [u8; 32]) -> Result<()> {
        ctx.accounts
            .govern(digest, OperationKind::DisableStopping, &ctx.bumps)?;
        Ok(())
    }

    pub fn disable_contract_upgradability(ctx: Context<Govern>, digest: [u8; 32]) -> Result<()> {
        ctx.accounts
            .govern(digest, OperationKind::DisableContractUpgradability, &ctx.bumps)?;
        Ok(())
    }

    pub fn revoke(ctx: Context<Revoke>, digest: [u8; 32]) -> Result<()> {
        ctx.accounts.revoke(digest)?;
        Ok(())
    }

    pub fn emergency_stop(ctx: Context<EmergencyStop>) -> Result<()> {
        ctx.accounts.emergency_stop()?;
        Ok(())
    }

    pub fn claim_tokens(ctx: Context<ClaimTokens>) -> Result<()> {
        ctx.accounts.claim_tokens()?;
        Ok(())
    }
}
