// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Steem Protocol: Client Library
//!
//! Everything a client needs to turn user intent into bytes a Steem node
//! accepts: the operation model, the canonical binary encoding, authority
//! resolution, business-rule validation, and transaction assembly up to the
//! signing digest. Networking and key handling stay outside.
//!
//! ## Architecture
//!
//! - **codec**: varints, fixed-width integers, strings, assets.
//! - **types**: account names, assets, extensions.
//! - **operation**: the closed set of user and virtual operations.
//! - **authority**: which accounts must sign, and at which level.
//! - **validation**: rule checks with a per-call skip set.
//! - **transaction**: header, builder, digest, id, and signing hand-off.
//! - **crypto**: SHA-256 helpers.
//! - **config**: chain constants and the [`ChainConfig`] value.
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use steem_protocol::config::ChainConfig;
//! use steem_protocol::operation::Transfer;
//! use steem_protocol::transaction::{TransactionBuilder, TransactionHeader};
//!
//! let chain = ChainConfig::mainnet();
//! let header = TransactionHeader::new(12_345, 0xdead_beef, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
//!
//! let tx = TransactionBuilder::new(header)
//!     .chain(chain.clone())
//!     .operation(Transfer::new("alice", "bob", chain.token(1_000), "thanks"))
//!     .build()
//!     .unwrap();
//!
//! let request = tx.signing_request(&chain);
//! assert_eq!(request.required.len(), 1);
//! assert_eq!(tx.id().len(), 40);
//! ```

pub mod authority;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod operation;
pub mod transaction;
pub mod types;
pub mod validation;

pub use config::ChainConfig;
pub use error::{ProtocolError, Result};
