//! XML documents returned by the storage REST API

use dc_core::{Error, Result, StorageAccount};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SpacesDocument {
    #[serde(rename = "space", default)]
    spaces: Vec<SpaceElement>,
}

#[derive(Debug, Deserialize)]
struct SpaceElement {
    #[serde(rename = "@id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpaceContentsDocument {
    #[serde(rename = "item", default)]
    items: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StorageAccountsDocument {
    #[serde(rename = "storageAcct", default)]
    accounts: Vec<StorageAccountElement>,
}

#[derive(Debug, Deserialize)]
struct StorageAccountElement {
    #[serde(rename = "@isPrimary", default)]
    is_primary: Option<String>,
    id: String,
    #[serde(rename = "storageProviderType")]
    provider_type: String,
}

/// Parse `<spaces><space id=".."/>..</spaces>`
pub(crate) fn parse_spaces(body: &str) -> Result<Vec<String>> {
    let document: SpacesDocument = quick_xml::de::from_str(body)
        .map_err(|e| Error::Protocol(format!("Malformed spaces document: {e}")))?;
    Ok(document.spaces.into_iter().map(|s| s.id).collect())
}

/// Parse `<space id=".."><item>..</item>..</space>`
pub(crate) fn parse_space_contents(body: &str) -> Result<Vec<String>> {
    let document: SpaceContentsDocument = quick_xml::de::from_str(body)
        .map_err(|e| Error::Protocol(format!("Malformed space contents document: {e}")))?;
    Ok(document.items)
}

/// Parse `<storageProviderAccounts><storageAcct isPrimary="true">..</storageAcct>..`
pub(crate) fn parse_storage_accounts(body: &str) -> Result<Vec<StorageAccount>> {
    let document: StorageAccountsDocument = quick_xml::de::from_str(body)
        .map_err(|e| Error::Protocol(format!("Malformed storage accounts document: {e}")))?;

    Ok(document
        .accounts
        .into_iter()
        .map(|account| StorageAccount {
            primary: matches!(account.is_primary.as_deref(), Some("true" | "1")),
            id: account.id,
            provider_type: account.provider_type,
        })
        .collect())
}
