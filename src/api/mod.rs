//! REST client for the course platform backend, grouped by resource.

mod auth;
mod client;
mod courses;
mod dto;
mod error;
mod payments;

pub use client::*;
pub use error::*;
pub use payments::*;

#[cfg(test)]
pub(crate) mod test_server;
