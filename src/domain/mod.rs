mod balance;
mod draft;
mod money;
mod transaction;

pub use balance::*;
pub use draft::*;
pub use money::*;
pub use transaction::*;
