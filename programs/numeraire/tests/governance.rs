mod common;

use anchor_lang::prelude::Pubkey;
use common::{two_of_two, GENESIS};
use numeraire::errors::NumeraireError;
use numeraire::sim::Numeraire;
use numeraire::state::{GenesisConfig, OperationKind};

#[test]
fn operation_executes_only_at_threshold() {
    let mut f = two_of_two();
    let (a, b) = (f.a, f.b);

    assert!(!f.ledger.disable_contract_upgradability(&a).unwrap());
    assert!(f.ledger.backend().upgradable);
    assert!(f.ledger.disable_contract_upgradability(&b).unwrap());
    assert!(!f.ledger.backend().upgradable);
}

#[test]
fn revoked_confirmation_does_not_count() {
    let mut f = two_of_two();
    let (a, b) = (f.a, f.b);
    let kind = OperationKind::DisableStopping;

    f.ledger.disable_stopping(&a).unwrap();
    assert!(f.ledger.has_confirmed(&kind, &a));
    f.ledger.revoke(&a, &kind).unwrap();
    assert!(!f.ledger.has_confirmed(&kind, &a));

    assert!(!f.ledger.disable_stopping(&b).unwrap());
    assert!(f.ledger.backend().stoppable);

    assert_eq!(
        f.ledger.revoke(&a, &kind).unwrap_err(),
        NumeraireError::NotConfirmed.into()
    );
    assert_eq!(
        f.ledger.revoke(&a, &OperationKind::Release).unwrap_err(),
        NumeraireError::NotConfirmed.into()
    );
}

#[test]
fn strangers_cannot_confirm_or_revoke() {
    let mut f = two_of_two();
    let stranger = Pubkey::new_unique();
    assert_eq!(
        f.ledger.disable_stopping(&stranger).unwrap_err(),
        NumeraireError::CallerNotAuthorized.into()
    );
    assert_eq!(
        f.ledger
            .revoke(&stranger, &OperationKind::DisableStopping)
            .unwrap_err(),
        NumeraireError::CallerNotAuthorized.into()
    );
    assert!(f.ledger.operation(&OperationKind::DisableStopping).is_none());
}

#[test]
fn emergency_stop_and_release() {
    let mut f = two_of_two();
    let (a, b) = (f.a, f.b);
    let user = Pubkey::new_unique();
    f.fund(&user, 100);
    f.ledger.create_tournament(&a, 1).unwrap();
    f.ledger.create_round(&a, 1, 1, None, GENESIS + 100).unwrap();

    assert_eq!(
        f.ledger.release(&a).unwrap_err(),
        NumeraireError::NotStopped.into()
    );

    f.ledger.emergency_stop(&a).unwrap();
    assert!(f.ledger.stopped());
    assert_eq!(f.ledger.mint(&a, 1).unwrap_err(), NumeraireError::ContractStopped.into());
    assert_eq!(
        f.ledger.transfer(&user, &a, 1).unwrap_err(),
        NumeraireError::ContractStopped.into()
    );
    assert_eq!(
        f.ledger.stake(&user, 1, 1, 1, 0).unwrap_err(),
        NumeraireError::ContractStopped.into()
    );

    assert!(!f.ledger.release(&a).unwrap());
    assert!(f.ledger.stopped());
    assert!(f.ledger.release(&b).unwrap());
    assert!(!f.ledger.stopped());

    f.ledger.mint(&a, 1).unwrap();
    f.ledger.transfer(&user, &a, 1).unwrap();
    f.ledger.stake(&user, 1, 1, 1, 0).unwrap();
}

#[test]
fn stop_release_cycle_repeats() {
    let mut f = two_of_two();
    for _ in 0..2 {
        let a = f.a;
        f.ledger.emergency_stop(&a).unwrap();
        let (first, second) = f.both(|l, o| l.release(o).unwrap());
        assert!(!first && second);
        assert!(!f.ledger.stopped());
    }
    let executions = f
        .ledger
        .operation(&OperationKind::Release)
        .unwrap()
        .executions;
    assert_eq!(executions, 2);
}

#[test]
fn disable_stopping_is_permanent() {
    let mut f = two_of_two();
    let a = f.a;
    f.both(|l, o| l.disable_stopping(o).unwrap());

    assert_eq!(
        f.ledger.emergency_stop(&a).unwrap_err(),
        NumeraireError::StoppingDisabled.into()
    );
    assert!(!f.ledger.stopped());
}

#[test]
fn changing_delegate_deactivates_this_logic() {
    let mut f = two_of_two();
    let (a, b) = (f.a, f.b);
    let user = Pubkey::new_unique();
    f.fund(&user, 10);

    let successor = Pubkey::new_unique();
    f.both(|l, o| l.change_delegate(o, successor).unwrap());
    assert_eq!(f.ledger.delegate(), successor);
    assert_eq!(
        f.ledger.transfer(&user, &a, 1).unwrap_err(),
        NumeraireError::InactiveLogic.into()
    );
    assert_eq!(f.ledger.mint(&a, 1).unwrap_err(), NumeraireError::InactiveLogic.into());

    // governance itself keeps working and can point back here
    f.ledger.change_delegate(&a, numeraire::ID).unwrap();
    assert!(f.ledger.change_delegate(&b, numeraire::ID).unwrap());
    assert_eq!(f.ledger.delegate(), numeraire::ID);
    f.ledger.transfer(&user, &a, 1).unwrap();
}

#[test]
fn upgradability_can_be_disabled() {
    let mut f = two_of_two();
    let a = f.a;
    f.both(|l, o| l.disable_contract_upgradability(o).unwrap());

    assert_eq!(
        f.ledger
            .change_delegate(&a, Pubkey::new_unique())
            .unwrap_err(),
        NumeraireError::UpgradabilityDisabled.into()
    );
    assert_eq!(f.ledger.delegate(), numeraire::ID);
}

#[test]
fn owner_change_invalidates_pending_confirmations() {
    let mut f = two_of_two();
    let (a, b) = (f.a, f.b);
    let c = Pubkey::new_unique();
    let pending = OperationKind::DisableStopping;

    f.ledger.disable_stopping(&a).unwrap();
    f.both(|l, o| l.change_shareable(o, vec![a, b, c], 2).unwrap());
    assert_eq!(f.ledger.owners(), &[a, b, c]);
    assert!(f.ledger.is_owner(&c));

    assert!(!f.ledger.has_confirmed(&pending, &a));
    assert!(!f.ledger.disable_stopping(&c).unwrap());
    assert!(f.ledger.disable_stopping(&a).unwrap());
    assert!(!f.ledger.backend().stoppable);
}

#[test]
fn removed_owner_loses_authority() {
    let mut f = two_of_two();
    let (a, b) = (f.a, f.b);
    f.both(|l, o| l.change_shareable(o, vec![a], 1).unwrap());

    assert!(!f.ledger.is_owner(&b));
    assert_eq!(
        f.ledger.mint(&b, 1).unwrap_err(),
        NumeraireError::CallerNotAuthorized.into()
    );
    // a single owner now executes alone
    assert!(f.ledger.disable_stopping(&a).unwrap());
}

#[test]
fn invalid_owner_sets_are_rejected() {
    let mut f = two_of_two();
    let (a, b) = (f.a, f.b);
    for (owners, required) in [
        (vec![], 1),
        (vec![a, b], 3),
        (vec![a, b], 0),
        (vec![a, a], 1),
        ((0..11).map(|_| Pubkey::new_unique()).collect(), 1),
    ] {
        assert_eq!(
            f.ledger.change_shareable(&a, owners, required).unwrap_err(),
            NumeraireError::InvalidOwnerSet.into()
        );
    }

    assert!(Numeraire::new(GenesisConfig::numerai(vec![a], 2), GENESIS).is_err());
}

#[test]
fn governance_runs_while_stopped() {
    let mut f = two_of_two();
    let (a, c) = (f.a, Pubkey::new_unique());
    f.ledger.emergency_stop(&a).unwrap();

    let (first, second) = f.both(|l, o| l.change_shareable(o, vec![a, c], 1).unwrap());
    assert!(!first && second);
    assert!(f.ledger.stopped());
    assert!(f.ledger.release(&c).unwrap());
    assert!(!f.ledger.stopped());
}
