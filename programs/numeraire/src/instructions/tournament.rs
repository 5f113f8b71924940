use anchor_lang::prelude::*;

use crate::constants::{BACKEND_SEED, ROUND_SEED, TOURNAMENT_SEED};
use crate::state::{Backend, Round, RoundCreated, Tournament, TournamentCreated};

#[derive(Accounts)]
#[instruction(tournament_id: u64)]
pub struct CreateTournament<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    #[account(
        init_if_needed,
        payer = authority,
        space = Tournament::space(0),
        seeds = [TOURNAMENT_SEED, tournament_id.to_le_bytes().as_ref()],
        bump
    )]
    pub tournament: Account<'info, Tournament>,

    pub system_program: Program<'info, System>,
}

impl<'info> CreateTournament<'info> {
    pub fn create_tournament(
        &mut self,
        tournament_id: u64,
        bumps: &CreateTournamentBumps,
    ) -> Result<()> {
        self.backend.require_active_owner(&self.authority.key())?;

        let now = Clock::get()?.unix_timestamp;
        self.tournament
            .create(tournament_id, self.authority.key(), now, bumps.tournament)?;

        emit!(TournamentCreated {
            tournament_id,
            creation_time: now,
        });
        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(tournament_id: u64, round_id: u64)]
pub struct CreateRound<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [BACKEND_SEED], bump = backend.bump)]
    pub backend: Account<'info, Backend>,

    // Grows by one round id per call
    #[account(
        mut,
        seeds = [TOURNAMENT_SEED, tournament_id.to_le_bytes().as_ref()],
        bump = tournament.bump,
        realloc = Tournament::space(tournament.round_ids.len() + 1),
        realloc::payer = authority,
        realloc::zero = false,
    )]
    pub tournament: Account<'info, Tournament>,

    #[account(
        init_if_needed,
        payer = authority,
        space = Round::INIT_SPACE,
        seeds = [
            ROUND_SEED,
            tournament_id.to_le_bytes().as_ref(),
            round_id.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub round: Account<'info, Round>,

    pub system_program: Program<'info, System>,
}

impl<'info> CreateRound<'info> {
    pub fn create_round(
        &mut self,
        round_id: u64,
        end_time: Option<i64>,
        resolution_time: i64,
        bumps: &CreateRoundBumps,
    ) -> Result<()> {
        self.backend.require_active_owner(&self.authority.key())?;

        let now = Clock::get()?.unix_timestamp;
        self.round.create(
            &mut self.tournament,
            round_id,
            end_time,
            resolution_time,
            self.authority.key(),
            now,
            bumps.round,
        )?;

        emit!(RoundCreated {
            tournament_id: self.tournament.id,
            round_id,
            end_time,
            resolution_time,
            creation_time: now,
        });
        Ok(())
    }
}
