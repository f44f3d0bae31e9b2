//! dc-rest: DuraStore REST adapter for the simple API example
//!
//! This crate provides implementations of the StoreManager and ContentStore
//! traits from dc-core over HTTP. It is the only crate that talks to the
//! network.

pub mod client;
mod documents;

pub use client::{RestContentStore, StoreManagerClient};
