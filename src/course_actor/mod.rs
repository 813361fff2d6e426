//! Catalog-specific logic: course records, refresh patches, and plan quotes.

mod actions;
mod dtos;
pub mod entity;
pub mod error;

pub use actions::*;
pub use dtos::*;
pub use error::*;
