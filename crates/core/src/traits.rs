//! ContentStore and StoreManager trait definitions
//!
//! These traits define the interface the example program needs from a
//! content store. They decouple the orchestration from the HTTP client,
//! and can be mocked or replaced by in-memory stores for testing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::credential::Credential;
use crate::error::Result;
use crate::listing::CONTENT_CHUNK_SIZE;

/// String properties attached to a space or content item
pub type Properties = BTreeMap<String, String>;

/// Byte stream handed to [`ContentStore::add_content`]
pub type ContentReader = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// A storage provider account behind a store manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAccount {
    /// Account identifier
    pub id: String,

    /// Provider type, e.g. `AMAZON_S3`
    pub provider_type: String,

    /// Whether this is the primary account
    pub primary: bool,
}

/// One page of a space content listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    /// Only return ids starting with this prefix
    pub prefix: Option<String>,

    /// Maximum number of ids in the page
    pub max_results: u32,

    /// Return ids after this one
    pub marker: Option<String>,
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self {
            prefix: None,
            max_results: CONTENT_CHUNK_SIZE,
            marker: None,
        }
    }
}

/// Content item to be added to a space
///
/// The byte stream itself is passed next to this description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContent {
    /// Content id within the space
    pub content_id: String,

    /// Exact length of the byte stream
    pub length: u64,

    /// MIME type; the store picks a default when absent
    pub mime_type: Option<String>,

    /// Expected MD5 checksum; the store computes one when absent
    pub checksum: Option<String>,

    /// Custom properties stored with the content
    pub properties: Option<Properties>,
}

impl NewContent {
    /// Describe content with only an id and a length
    pub fn new(content_id: impl Into<String>, length: u64) -> Self {
        Self {
            content_id: content_id.into(),
            length,
            mime_type: None,
            checksum: None,
            properties: None,
        }
    }
}

/// Operations on one content store
///
/// Implemented by the REST adapter; can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// List the ids of all spaces visible to the logged-in user, in store order
    async fn list_spaces(&self) -> Result<Vec<String>>;

    /// Get the properties of a space
    async fn space_properties(&self, space_id: &str) -> Result<Properties>;

    /// Fetch one page of content ids from a space
    ///
    /// Use [`crate::list_content_ids`] for a complete listing.
    async fn space_contents_chunk(
        &self,
        space_id: &str,
        request: &ListingRequest,
    ) -> Result<Vec<String>>;

    /// Add content to a space, returning the checksum computed by the store
    async fn add_content(
        &self,
        space_id: &str,
        content: NewContent,
        body: ContentReader,
    ) -> Result<String>;

    /// Delete a content item from a space
    async fn delete_content(&self, space_id: &str, content_id: &str) -> Result<()>;
}

/// Authenticated access to the content stores of one host
#[async_trait]
pub trait StoreManager: Send + Sync {
    type Store: ContentStore;

    /// Log in with the given credential
    async fn login(&mut self, credential: &Credential) -> Result<()>;

    /// List the storage accounts available to the logged-in user
    async fn storage_accounts(&self) -> Result<Vec<StorageAccount>>;

    /// Get a handle to the primary content store
    async fn primary_content_store(&self) -> Result<Self::Store>;
}
