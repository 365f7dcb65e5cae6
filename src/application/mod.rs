// Application layer: the stateful ledger and the session front ends talk to.

pub mod error;
mod ledger;
mod notify;
mod reporting;
mod session;

pub use error::*;
pub use ledger::*;
pub use notify::*;
pub use reporting::*;
pub use session::*;
