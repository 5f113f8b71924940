pub mod backend;
pub mod disbursement;
pub mod holder;
pub mod operation;
pub mod stake;
pub mod tournament;

pub use backend::*;
pub use disbursement::*;
pub use holder::*;
pub use operation::*;
pub use stake::*;
pub use tournament::*;
