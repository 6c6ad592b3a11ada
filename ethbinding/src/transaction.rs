//! Implementation of the wrappers that generated contract methods are built
//! from: plain calls that merge transaction options with binding defaults,
//! and transactions that are additionally synchronized until mined.

pub mod call;
pub mod confirm;

pub use self::call::CallWrapper;
pub use self::confirm::{Confirmation, ConfirmWrapper, SyncParams};
