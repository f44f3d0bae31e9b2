//! REST client implementation
//!
//! Speaks the storage REST API over reqwest and implements the StoreManager
//! and ContentStore traits from dc-core.

use async_trait::async_trait;
use dc_core::{
    ConnectionConfig, ContentReader, ContentStore, Credential, Error, ListingRequest, NewContent,
    Properties, Result, StorageAccount, StoreManager,
};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Client, Method, RequestBuilder, Response, StatusCode};
use tokio_util::io::ReaderStream;
use url::Url;

use crate::documents;

/// Prefix of the headers carrying space and content properties
const PROPERTY_HEADER_PREFIX: &str = "x-dura-meta-";

/// Header carrying the MD5 checksum of stored content
const CONTENT_MD5: &str = "content-md5";

/// Append path segments to the API base URL
fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("Base URL cannot have a path: {base_url}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn authorize(request: RequestBuilder, credential: &Credential) -> RequestBuilder {
    request.basic_auth(credential.username(), Some(credential.password()))
}

async fn send(request: RequestBuilder) -> Result<Response> {
    request.send().await.map_err(|e| Error::Network(e.to_string()))
}

/// Map a non-success response onto the error taxonomy
async fn check_status(response: Response, subject: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(%status, subject, body = %body, "Request failed");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Auth(format!("{subject}: {status}"))
        }
        StatusCode::NOT_FOUND => Error::NotFound(subject.to_string()),
        StatusCode::CONFLICT => Error::Conflict(format!("{subject}: {body}")),
        _ if body.is_empty() => Error::Network(format!("{subject}: {status}")),
        _ => Error::Network(format!("{subject}: {status}: {body}")),
    })
}

async fn fetch_storage_accounts(
    http: &Client,
    base_url: &Url,
    credential: &Credential,
) -> Result<Vec<StorageAccount>> {
    let url = endpoint(base_url, &["stores"])?;
    let response = send(authorize(http.get(url), credential)).await?;
    let response = check_status(response, "Storage accounts").await?;
    let body = response
        .text()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;
    documents::parse_storage_accounts(&body)
}

/// Store manager for one host
///
/// Holds the credential after a successful login and hands out content
/// store handles sharing the same HTTP client.
#[derive(Debug)]
pub struct StoreManagerClient {
    http: Client,
    base_url: Url,
    credential: Option<Credential>,
}

impl StoreManagerClient {
    /// Create a store manager for the given connection; no request is made
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let http = Client::builder()
            .user_agent(concat!("dc-rest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {e}")))?;

        tracing::debug!(base_url = %base_url, "Created store manager client");

        Ok(Self {
            http,
            base_url,
            credential: None,
        })
    }

    fn credential(&self) -> Result<&Credential> {
        self.credential
            .as_ref()
            .ok_or_else(|| Error::Auth("Not logged in".into()))
    }
}

#[async_trait]
impl StoreManager for StoreManagerClient {
    type Store = RestContentStore;

    async fn login(&mut self, credential: &Credential) -> Result<()> {
        // Listing the storage accounts is the cheapest authenticated call.
        let accounts = fetch_storage_accounts(&self.http, &self.base_url, credential).await?;
        tracing::info!(
            username = credential.username(),
            accounts = accounts.len(),
            "Logged in"
        );
        self.credential = Some(credential.clone());
        Ok(())
    }

    async fn storage_accounts(&self) -> Result<Vec<StorageAccount>> {
        fetch_storage_accounts(&self.http, &self.base_url, self.credential()?).await
    }

    async fn primary_content_store(&self) -> Result<RestContentStore> {
        let credential = self.credential()?.clone();
        let account = self
            .storage_accounts()
            .await?
            .into_iter()
            .find(|account| account.primary)
            .ok_or_else(|| Error::NotFound("Primary storage account".into()))?;

        tracing::debug!(
            account_id = %account.id,
            provider = %account.provider_type,
            "Using primary content store"
        );

        Ok(RestContentStore {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            credential,
            account,
        })
    }
}

/// Content store handle backed by the REST API
#[derive(Debug, Clone)]
pub struct RestContentStore {
    http: Client,
    base_url: Url,
    credential: Credential,
    account: StorageAccount,
}

impl RestContentStore {
    /// Storage account this store operates on
    pub fn account(&self) -> &StorageAccount {
        &self.account
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "Sending request");
        authorize(self.http.request(method, url), &self.credential)
    }

    async fn read_body(response: Response) -> Result<String> {
        response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))
    }
}

fn property_headers(properties: &Properties) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (key, value) in properties {
        let name = HeaderName::try_from(format!("{PROPERTY_HEADER_PREFIX}{key}"))
            .map_err(|_| Error::General(format!("Invalid property name: {key}")))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|_| Error::General(format!("Invalid value for property {key}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn checksum_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_MD5)
        .or_else(|| headers.get(ETAG))
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl ContentStore for RestContentStore {
    async fn list_spaces(&self) -> Result<Vec<String>> {
        let url = endpoint(&self.base_url, &["spaces"])?;
        let response = send(self.request(Method::GET, url)).await?;
        let response = check_status(response, "Spaces").await?;
        documents::parse_spaces(&Self::read_body(response).await?)
    }

    async fn space_properties(&self, space_id: &str) -> Result<Properties> {
        let url = endpoint(&self.base_url, &[space_id])?;
        let response = send(self.request(Method::HEAD, url)).await?;
        let response = check_status(response, &format!("Space {space_id}")).await?;

        let properties = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let key = name.as_str().strip_prefix(PROPERTY_HEADER_PREFIX)?;
                let value = value.to_str().ok()?;
                Some((key.to_string(), value.to_string()))
            })
            .collect();

        Ok(properties)
    }

    async fn space_contents_chunk(
        &self,
        space_id: &str,
        request: &ListingRequest,
    ) -> Result<Vec<String>> {
        let mut url = endpoint(&self.base_url, &[space_id])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("maxResults", &request.max_results.to_string());
            if let Some(prefix) = &request.prefix {
                query.append_pair("prefix", prefix);
            }
            if let Some(marker) = &request.marker {
                query.append_pair("marker", marker);
            }
        }

        let response = send(self.request(Method::GET, url)).await?;
        let response = check_status(response, &format!("Space {space_id}")).await?;
        documents::parse_space_contents(&Self::read_body(response).await?)
    }

    async fn add_content(
        &self,
        space_id: &str,
        content: NewContent,
        body: ContentReader,
    ) -> Result<String> {
        let url = endpoint(&self.base_url, &[space_id, &content.content_id])?;
        let subject = format!("Content {space_id}/{}", content.content_id);

        let mut request = self
            .request(Method::PUT, url)
            .header(CONTENT_LENGTH, content.length);
        if let Some(mime_type) = &content.mime_type {
            request = request.header(CONTENT_TYPE, mime_type);
        }
        if let Some(checksum) = &content.checksum {
            request = request.header(CONTENT_MD5, checksum);
        }
        if let Some(properties) = &content.properties {
            request = request.headers(property_headers(properties)?);
        }

        let request = request.body(Body::wrap_stream(ReaderStream::new(body)));
        let response = check_status(send(request).await?, &subject).await?;

        let checksum = checksum_header(response.headers())
            .ok_or_else(|| Error::Protocol(format!("{subject}: store returned no checksum")))?;

        tracing::info!(
            space_id,
            content_id = %content.content_id,
            length = content.length,
            checksum = %checksum,
            "Content added"
        );

        Ok(checksum)
    }

    async fn delete_content(&self, space_id: &str, content_id: &str) -> Result<()> {
        let url = endpoint(&self.base_url, &[space_id, content_id])?;
        let response = send(self.request(Method::DELETE, url)).await?;
        check_status(response, &format!("Content {space_id}/{content_id}")).await?;

        tracing::info!(space_id, content_id, "Content deleted");
        Ok(())
    }
}
