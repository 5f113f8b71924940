#![allow(dead_code)]

use anchor_lang::prelude::Pubkey;
use numeraire::constants::ONE_NMR;
use numeraire::sim::Numeraire;
use numeraire::state::GenesisConfig;

pub const GENESIS: i64 = 1_700_000_000;

pub struct Fixture {
    pub ledger: Numeraire,
    pub a: Pubkey,
    pub b: Pubkey,
}

/// Two owners, both required, production issuance schedule.
pub fn two_of_two() -> Fixture {
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    let ledger = Numeraire::new(GenesisConfig::numerai(vec![a, b], 2), GENESIS).unwrap();
    Fixture { ledger, a, b }
}

impl Fixture {
    /// Mint `amount` base units and pay them out of the treasury to `to`.
    pub fn fund(&mut self, to: &Pubkey, amount: u128) {
        let (a, b) = (self.a, self.b);
        self.ledger.mint(&a, amount).unwrap();
        assert!(!self.ledger.numerai_transfer(&a, to, amount).unwrap());
        assert!(self.ledger.numerai_transfer(&b, to, amount).unwrap());
    }

    pub fn fund_nmr(&mut self, to: &Pubkey, whole: u128) {
        self.fund(to, whole * ONE_NMR);
    }

    /// Confirm a governance call from both owners.
    pub fn both<T>(&mut self, mut call: impl FnMut(&mut Numeraire, &Pubkey) -> T) -> (T, T) {
        let (a, b) = (self.a, self.b);
        let first = call(&mut self.ledger, &a);
        let second = call(&mut self.ledger, &b);
        (first, second)
    }

    pub fn assert_conserved(&self) {
        assert_eq!(self.ledger.sum_of_balances(), self.ledger.total_supply());
    }
}
