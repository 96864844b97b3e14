//! Typed HTTP client for the remote document store.
//!
//! The store exposes named tables of JSON documents. Every operation is a
//! remote call; nothing is cached locally. Partial updates send only the
//! fields present in the serialized patch, so callers control exactly which
//! attributes a write touches.

mod client;
mod error;

pub use client::{DocStore, Table};
pub use error::StoreError;
