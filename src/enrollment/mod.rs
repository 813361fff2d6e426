//! The four-step enrollment wizard: profile, plan, payment, confirmation.

mod error;
mod flow;
mod step;

pub use error::*;
pub use flow::*;
pub use step::*;
