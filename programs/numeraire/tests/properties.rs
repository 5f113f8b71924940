mod common;

use anchor_lang::prelude::Pubkey;
use common::{two_of_two, Fixture, GENESIS};
use numeraire::sim::Numeraire;
use proptest::prelude::*;

const USERS: usize = 4;

#[derive(Clone, Debug)]
enum Action {
    Mint(u128),
    Transfer { from: usize, to: usize, amount: u128 },
    Approve { owner: usize, spender: usize, amount: u128 },
    TransferFrom { spender: usize, owner: usize, to: usize, amount: u128 },
    Stake { who: usize, amount: u128, confidence: u8 },
    Release { who: usize },
    Destroy { who: usize },
    Advance(u64),
    Stop,
    Resume,
}

fn action() -> impl Strategy<Value = Action> {
    let user = 0..USERS;
    let amount = 0u128..2_000_000;
    prop_oneof![
        2 => amount.clone().prop_map(Action::Mint),
        5 => (user.clone(), user.clone(), amount.clone())
            .prop_map(|(from, to, amount)| Action::Transfer { from, to, amount }),
        2 => (user.clone(), user.clone(), amount.clone())
            .prop_map(|(owner, spender, amount)| Action::Approve { owner, spender, amount }),
        3 => (user.clone(), user.clone(), user.clone(), amount.clone()).prop_map(
            |(spender, owner, to, amount)| Action::TransferFrom { spender, owner, to, amount }
        ),
        4 => (user.clone(), amount, any::<u8>())
            .prop_map(|(who, amount, confidence)| Action::Stake { who, amount, confidence }),
        2 => user.clone().prop_map(|who| Action::Release { who }),
        2 => user.prop_map(|who| Action::Destroy { who }),
        2 => (0u64..8_000).prop_map(Action::Advance),
        1 => Just(Action::Stop),
        1 => Just(Action::Resume),
    ]
}

struct World {
    f: Fixture,
    users: Vec<Pubkey>,
}

impl World {
    fn new() -> Self {
        let mut f = two_of_two();
        let a = f.a;
        f.ledger.create_tournament(&a, 1).unwrap();
        f.ledger
            .create_round(&a, 1, 1, Some(GENESIS + 10_000), GENESIS + 20_000)
            .unwrap();
        let users: Vec<Pubkey> = (0..USERS).map(|_| Pubkey::new_unique()).collect();
        for user in &users {
            f.fund(user, 1_000_000);
        }
        Self { f, users }
    }

    fn ledger(&mut self) -> &mut Numeraire {
        &mut self.f.ledger
    }

    /// Everything a caller can observe about the ledger.
    fn fingerprint(&self) -> Vec<u128> {
        let l = &self.f.ledger;
        let mut out = vec![
            l.total_supply(),
            l.escrowed(),
            l.balance_of(&l.treasury()),
            l.mintable().unwrap(),
            l.stopped() as u128,
            l.now() as u128,
        ];
        for owner in &self.users {
            out.push(l.balance_of(owner));
            for spender in &self.users {
                out.push(l.allowance(owner, spender));
            }
            let (amount, resolved, destroyed) = l
                .get_stake(1, 1, owner)
                .map_or((0, false, false), |s| (s.amount, s.resolved, s.destroyed));
            out.extend([amount, resolved as u128, destroyed as u128]);
        }
        out
    }

    fn apply(&mut self, action: &Action) -> bool {
        let (a, b) = (self.f.a, self.f.b);
        let u = self.users.clone();
        match *action {
            Action::Mint(amount) => self.ledger().mint(&a, amount).is_ok(),
            Action::Transfer { from, to, amount } => {
                self.ledger().transfer(&u[from], &u[to], amount).is_ok()
            }
            Action::Approve { owner, spender, amount } => {
                self.ledger().approve(&u[owner], &u[spender], amount).is_ok()
            }
            Action::TransferFrom { spender, owner, to, amount } => self
                .ledger()
                .transfer_from(&u[spender], &u[owner], &u[to], amount)
                .is_ok(),
            Action::Stake { who, amount, confidence } => {
                self.ledger().stake(&u[who], amount, 1, 1, confidence).is_ok()
            }
            Action::Release { who } => self
                .ledger()
                .release_stake(&a, &u[who], 0, 1, 1, true)
                .is_ok(),
            Action::Destroy { who } => self.ledger().destroy_stake(&b, &u[who], 1, 1).is_ok(),
            Action::Advance(secs) => {
                self.ledger().advance_time(secs);
                true
            }
            Action::Stop => self.ledger().emergency_stop(&a).is_ok(),
            Action::Resume => {
                // both confirmations land together or the first one is revoked
                let first = self.ledger().release(&a).is_ok();
                let second = self.ledger().release(&b).is_ok();
                if first && !second {
                    let _ = self.ledger().revoke(&a, &numeraire::state::OperationKind::Release);
                }
                first && second
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn balances_always_sum_to_supply(actions in prop::collection::vec(action(), 1..48)) {
        let mut world = World::new();
        for action in &actions {
            world.apply(action);
            prop_assert_eq!(world.f.ledger.sum_of_balances(), world.f.ledger.total_supply());
        }
    }

    #[test]
    fn rejected_operations_change_nothing(actions in prop::collection::vec(action(), 1..48)) {
        let mut world = World::new();
        for action in &actions {
            if matches!(action, Action::Advance(_) | Action::Resume) {
                world.apply(action);
                continue;
            }
            let before = world.fingerprint();
            if !world.apply(action) {
                prop_assert_eq!(world.fingerprint(), before, "{:?} left a trace", action);
            }
        }
    }

    #[test]
    fn mint_succeeds_iff_within_mintable(amount in 1u128..4_000_000, wait in 0u64..2_000_000) {
        let mut world = World::new();
        world.ledger().advance_time(wait);
        let mintable = world.f.ledger.mintable().unwrap();
        let a = world.f.a;
        let minted = world.ledger().mint(&a, amount * 1_000_000_000_000_000_000).is_ok();
        prop_assert_eq!(minted, amount * 1_000_000_000_000_000_000 <= mintable);
    }
}
