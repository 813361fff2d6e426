//! Session store: the signed-in user and token, owned by one actor and
//! mirrored to storage on every change.

mod client;
mod error;
mod messages;
mod service;
mod storage;

pub use client::*;
pub use error::*;
pub use messages::*;
pub use service::*;
pub use storage::*;
