//! # Value Types
//!
//! The vocabulary shared by every operation: account names, assets, and the
//! empty extension vector. Each type knows how to write itself to the wire
//! and read itself back; rule checking is left to [`crate::validation`].

pub mod account;
pub mod asset;
pub mod extensions;

pub use account::AccountName;
pub use asset::{Asset, AssetSymbol};
pub use extensions::Extensions;
