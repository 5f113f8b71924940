pub mod approve;
pub mod claim;
pub mod deposit;
pub mod governance;
pub mod initialize;
pub mod mint;
pub mod stake;
pub mod tournament;
pub mod transfer;

pub use approve::*;
pub use claim::*;
pub use deposit::*;
pub use governance::*;
pub use initialize::*;
pub use mint::*;
pub use stake::*;
pub use tournament::*;
pub use transfer::*;
