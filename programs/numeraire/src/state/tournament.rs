use anchor_lang::prelude::*;

use crate::errors::NumeraireError;

#[account]
#[derive(Default)]
pub struct Tournament {
    pub id: u64,
    pub creator: Pubkey, // Default until created
    pub creation_time: i64,
    pub round_ids: Vec<u64>, // Insertion ordered
    pub bump: u8,
}

impl Tournament {
    pub const BASE_SPACE: usize = 8 // discriminator
        + 8    // id
        + 32   // creator
        + 8    // creation_time
        + 4    // round_ids: Vec<u64> length prefix
        + 1;   // bump

    pub fn space(rounds: usize) -> usize {
        Self::BASE_SPACE + rounds * 8
    }

    pub fn is_created(&self) -> bool {
        self.creator != Pubkey::default()
    }

    pub fn create(&mut self, id: u64, creator: Pubkey, now: i64, bump: u8) -> Result<()> {
        require!(!self.is_created(), NumeraireError::TournamentExists);
        self.id = id;
        self.creator = creator;
        self.creation_time = now;
        self.round_ids = Vec::new();
        self.bump = bump;
        Ok(())
    }

    pub fn require_created(&self) -> Result<()> {
        require!(self.is_created(), NumeraireError::TournamentNotFound);
        Ok(())
    }

    pub fn has_round(&self, round_id: u64) -> bool {
        self.round_ids.contains(&round_id)
    }

    fn register_round(&mut self, round_id: u64) -> Result<()> {
        require!(!self.has_round(round_id), NumeraireError::RoundExists);
        self.round_ids.push(round_id);
        Ok(())
    }
}

#[account]
#[derive(Default)]
pub struct Round {
    pub tournament_id: u64,
    pub id: u64,
    pub creator: Pubkey, // Default until created
    pub creation_time: i64,
    pub end_time: Option<i64>,
    pub resolution_time: i64,
    pub bump: u8,
}

impl Space for Round {
    const INIT_SPACE: usize = 8      // Discriminator
        + 8     // tournament_id
        + 8     // id
        + 32    // creator
        + 8     // creation_time
        + 1 + 8 // end_time: Option<i64>
        + 8     // resolution_time
        + 1;    // bump
}

impl Round {
    pub fn is_created(&self) -> bool {
        self.creator != Pubkey::default()
    }

    /// Create `round_id` under `tournament`. The tournament must exist and must
    /// not already list the round; an end time, when given, must precede the
    /// resolution time.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        tournament: &mut Tournament,
        round_id: u64,
        end_time: Option<i64>,
        resolution_time: i64,
        creator: Pubkey,
        now: i64,
        bump: u8,
    ) -> Result<()> {
        tournament.require_created()?;
        require!(!self.is_created(), NumeraireError::RoundExists);
        if let Some(end) = end_time {
            require!(end < resolution_time, NumeraireError::InvalidWindow);
        }
        tournament.register_round(round_id)?;

        self.tournament_id = tournament.id;
        self.id = round_id;
        self.creator = creator;
        self.creation_time = now;
        self.end_time = end_time;
        self.resolution_time = resolution_time;
        self.bump = bump;
        Ok(())
    }

    pub fn require_created(&self) -> Result<()> {
        require!(self.is_created(), NumeraireError::RoundNotFound);
        Ok(())
    }

    /// Staking closes at the end time, or at resolution when no end time is set.
    pub fn close_time(&self) -> i64 {
        self.end_time.unwrap_or(self.resolution_time)
    }

    pub fn require_open(&self, now: i64) -> Result<()> {
        self.require_created()?;
        require!(now < self.close_time(), NumeraireError::RoundClosed);
        Ok(())
    }

    pub fn require_resolvable(&self, now: i64) -> Result<()> {
        self.require_created()?;
        require!(now >= self.resolution_time, NumeraireError::TooEarlyToResolve);
        Ok(())
    }
}

#[event]
pub struct TournamentCreated {
    pub tournament_id: u64,
    pub creation_time: i64,
}

#[event]
pub struct RoundCreated {
    pub tournament_id: u64,
    pub round_id: u64,
    pub end_time: Option<i64>,
    pub resolution_time: i64,
    pub creation_time: i64,
}
