use anchor_lang::prelude::*;

use crate::constants::MAX_DEPOSIT_ID;
use crate::errors::NumeraireError;
use crate::math::SafeMath;

#[account]
pub struct Holder {
    pub owner: Pubkey, // Identity whose balance this is
    pub balance: u128,
    pub bump: u8,
}

impl Space for Holder {
    const INIT_SPACE: usize = 8      // Discriminator
        + 32    // owner: Pubkey
        + 16    // balance: u128
        + 1;    // bump: u8
}

impl Holder {
    pub fn open(owner: Pubkey, bump: u8) -> Self {
        Self {
            owner,
            balance: 0,
            bump,
        }
    }

    /// Fill in a freshly created (zeroed) holder account. No-op on an
    /// existing one.
    pub fn init_if_empty(&mut self, owner: Pubkey, bump: u8) {
        if self.owner == Pubkey::default() {
            self.owner = owner;
            self.bump = bump;
        }
    }

    pub fn credit(&mut self, amount: u128) -> Result<()> {
        self.balance = self.balance.safe_add(amount)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u128) -> Result<()> {
        require!(amount <= self.balance, NumeraireError::InsufficientBalance);
        self.balance = self.balance.safe_sub(amount)?;
        Ok(())
    }
}

/// Move `amount` between two distinct holders. Both new balances are computed
/// before either is written.
pub fn move_balance(from: &mut Holder, to: &mut Holder, amount: u128) -> Result<()> {
    require!(amount <= from.balance, NumeraireError::InsufficientBalance);
    let from_balance = from.balance.safe_sub(amount)?;
    let to_balance = to.balance.safe_add(amount)?;

    from.balance = from_balance;
    to.balance = to_balance;
    Ok(())
}

#[account]
pub struct Allowance {
    pub owner: Pubkey,
    pub spender: Pubkey,
    pub amount: u128,
    pub bump: u8,
}

impl Space for Allowance {
    const INIT_SPACE: usize = 8      // Discriminator
        + 32    // owner: Pubkey
        + 32    // spender: Pubkey
        + 16    // amount: u128
        + 1;    // bump: u8
}

impl Allowance {
    pub fn open(owner: Pubkey, spender: Pubkey, bump: u8) -> Self {
        Self {
            owner,
            spender,
            amount: 0,
            bump,
        }
    }

    pub fn init_if_empty(&mut self, owner: Pubkey, spender: Pubkey, bump: u8) {
        if self.owner == Pubkey::default() {
            self.owner = owner;
            self.spender = spender;
            self.bump = bump;
        }
    }

    /// A non-zero allowance can only be set from zero; use
    /// [`Allowance::change`] to move between two non-zero values.
    pub fn approve(&mut self, amount: u128) -> Result<()> {
        require!(
            amount == 0 || self.amount == 0,
            NumeraireError::NonZeroAllowance
        );
        self.amount = amount;
        Ok(())
    }

    pub fn change(&mut self, expected: u128, amount: u128) -> Result<()> {
        require!(self.amount == expected, NumeraireError::AllowanceMismatch);
        self.amount = amount;
        Ok(())
    }

    pub fn consume(&mut self, amount: u128) -> Result<()> {
        require!(amount <= self.amount, NumeraireError::InsufficientAllowance);
        self.amount = self.amount.safe_sub(amount)?;
        Ok(())
    }
}

// ============= DEPOSIT ADDRESSES =============

pub fn deposit_address(id: u32) -> Pubkey {
    let mut bytes = [0u8; 32];
    bytes[28..].copy_from_slice(&id.to_be_bytes());
    Pubkey::new_from_array(bytes)
}

pub fn is_deposit_address(key: &Pubkey) -> bool {
    let bytes = key.to_bytes();
    if bytes[..28].iter().any(|b| *b != 0) {
        return false;
    }
    let id = u32::from_be_bytes([bytes[28], bytes[29], bytes[30], bytes[31]]);
    id != 0 && id < MAX_DEPOSIT_ID
}

pub fn require_deposit_address(key: &Pubkey) -> Result<()> {
    require!(is_deposit_address(key), NumeraireError::NotDepositAddress);
    Ok(())
}

pub fn require_recipient(key: &Pubkey) -> Result<()> {
    require_keys_neq!(*key, Pubkey::default(), NumeraireError::InvalidRecipient);
    Ok(())
}

#[event]
pub struct Transferred {
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u128,
    pub timestamp: i64,
}

#[event]
pub struct Approved {
    pub owner: Pubkey,
    pub spender: Pubkey,
    pub amount: u128,
    pub timestamp: i64,
}
