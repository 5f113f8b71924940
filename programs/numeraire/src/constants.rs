// ============= SEEDS =============
pub const BACKEND_SEED: &[u8] = b"backend";
pub const HOLDER_SEED: &[u8] = b"holder";
pub const ESCROW_SEED: &[u8] = b"escrow";
pub const ALLOWANCE_SEED: &[u8] = b"allowance";
pub const TOURNAMENT_SEED: &[u8] = b"tournament";
pub const ROUND_SEED: &[u8] = b"round";
pub const STAKE_SEED: &[u8] = b"stake";
pub const OPERATION_SEED: &[u8] = b"operation";

// ============= TOKEN METADATA =============
pub const NAME: &str = "Numeraire";
pub const SYMBOL: &str = "NMR";
pub const DECIMALS: u8 = 18;

// ============= ISSUANCE =============
/// Amounts are `u128` base units rather than 256-bit words. The supply cap
/// is below 2^85, so every balance, allowance and stake fits with room to
/// spare, and anything larger fails as `ArithmeticOverflow`.
pub const ONE_NMR: u128 = 1_000_000_000_000_000_000;
pub const SUPPLY_CAP: u128 = 21_000_000 * ONE_NMR;
pub const INITIAL_DISBURSEMENT: u128 = 1_500_000 * ONE_NMR;
pub const WEEKLY_DISBURSEMENT: u128 = 96_153_846_153_846_153_846_153; // 5M NMR / 52
pub const DISBURSEMENT_PERIOD: i64 = 7 * 24 * 60 * 60;

// ============= GOVERNANCE =============
pub const MAX_OWNERS: usize = 10;

// Deposit addresses are ids in (0, MAX_DEPOSIT_ID) packed into the tail of a zero key.
pub const MAX_DEPOSIT_ID: u32 = 1_000_000;
