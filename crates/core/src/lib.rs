//! dc-core: Core library for the DuraStore simple API example
//!
//! This crate provides the pieces the example program is built from:
//! - Connection configuration and credentials
//! - The ContentStore / StoreManager traits
//! - Content id generation and local checksums
//! - A lazy, paginated content listing
//!
//! This crate is independent of the HTTP client used to reach the store,
//! so the orchestration can be tested against in-memory stores.

pub mod config;
pub mod content;
pub mod credential;
pub mod error;
pub mod listing;
pub mod traits;

pub use config::{ConnectionConfig, DEFAULT_CONTEXT, DEFAULT_PORT};
pub use content::{ensure_content_file, file_md5, generate_content_id, open_content_file};
pub use credential::Credential;
pub use error::{Error, Result};
pub use listing::{CONTENT_CHUNK_SIZE, list_content_ids};
pub use traits::{
    ContentReader, ContentStore, ListingRequest, NewContent, Properties, StorageAccount,
    StoreManager,
};
