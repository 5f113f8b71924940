use anchor_lang::prelude::*;

#[error_code]
pub enum NumeraireError {
    // Arithmetic
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
    #[msg("Arithmetic underflow")]
    ArithmeticUnderflow,
    #[msg("Division by zero")]
    DivisionByZero,

    // Validation
    #[msg("Amount must be greater than 0")]
    ZeroAmount,
    #[msg("Recipient is the reserved zero address")]
    InvalidRecipient,
    #[msg("Round end time must be before its resolution time")]
    InvalidWindow,
    #[msg("Invalid disbursement schedule")]
    InvalidSchedule,
    #[msg("Invalid owner set or threshold")]
    InvalidOwnerSet,
    #[msg("Address is not a deposit address")]
    NotDepositAddress,
    #[msg("Failed to encode operation descriptor")]
    SerializationFailed,

    // Authorization
    #[msg("Caller is not authorized")]
    CallerNotAuthorized,
    #[msg("This program is not the active logic implementation")]
    InactiveLogic,
    #[msg("Owner already confirmed this operation")]
    AlreadyConfirmed,
    #[msg("Owner has not confirmed this operation")]
    NotConfirmed,
    #[msg("Operation descriptor does not match its digest")]
    OperationMismatch,

    // Resources
    #[msg("Insufficient balance")]
    InsufficientBalance,
    #[msg("Insufficient allowance")]
    InsufficientAllowance,
    #[msg("Current allowance does not match the expected amount")]
    AllowanceMismatch,
    #[msg("Allowance must be reset to 0 before approving a new amount")]
    NonZeroAllowance,
    #[msg("Amount exceeds the mintable disbursement")]
    ExceedsDisbursement,
    #[msg("The ledger's own token cannot be claimed")]
    CannotClaimOwnToken,

    // Lifecycle
    #[msg("Contract is stopped")]
    ContractStopped,
    #[msg("Contract is not stopped")]
    NotStopped,
    #[msg("Emergency stopping has been disabled")]
    StoppingDisabled,
    #[msg("Contract upgradability has been disabled")]
    UpgradabilityDisabled,

    // Tournaments and stakes
    #[msg("Tournament already exists")]
    TournamentExists,
    #[msg("Tournament not found")]
    TournamentNotFound,
    #[msg("Round already exists")]
    RoundExists,
    #[msg("Round not found")]
    RoundNotFound,
    #[msg("Round is closed for staking")]
    RoundClosed,
    #[msg("Round cannot be resolved before its resolution time")]
    TooEarlyToResolve,
    #[msg("Stake not found")]
    StakeNotFound,
    #[msg("Stake already resolved")]
    StakeAlreadyResolved,
    #[msg("Stake already destroyed")]
    StakeAlreadyDestroyed,
}
