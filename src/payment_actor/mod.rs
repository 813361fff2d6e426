//! Ledger of checkout attempts, one entry per receipt.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
