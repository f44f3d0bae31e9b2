//! The example sequence
//!
//! Log in, list spaces, list the target space, store a file, list again,
//! delete the file, list a final time. Every step must succeed; the first
//! failure ends the run without any compensating cleanup.

use std::path::Path;

use dc_core::{
    ContentStore, Credential, Error, NewContent, Result, StoreManager, ensure_content_file,
    file_md5, generate_content_id, list_content_ids, open_content_file,
};
use futures::TryStreamExt;
use jiff::Timestamp;

use super::Cli;
use crate::output::{Formatter, ProgressBar};

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Spaces visible to the user, in store order
    pub spaces: Vec<String>,

    /// Id the file was stored under
    pub content_id: String,

    /// Checksum returned by the store
    pub checksum: String,

    /// Target space contents before the upload
    pub before_upload: Vec<String>,

    /// Target space contents after the upload
    pub after_upload: Vec<String>,

    /// Target space contents after the delete
    pub after_delete: Vec<String>,
}

/// Run the example sequence against a store manager
pub async fn run<M>(manager: &mut M, cli: &Cli, formatter: &Formatter) -> Result<RunReport>
where
    M: StoreManager,
{
    let space_id = cli.space_id.as_str();

    formatter.println(&format!(
        "Running Simple API Example with parameters:\nhost={}\nuser name={}\nspace name={}\ncontent path={}",
        cli.host,
        cli.username,
        space_id,
        cli.content.display()
    ));

    // Fail on a missing file before any request is made.
    ensure_content_file(&cli.content).await?;

    formatter.println("Setting up tool...");
    manager
        .login(&Credential::new(&cli.username, &cli.password))
        .await?;
    let store = manager.primary_content_store().await?;
    tracing::info!(host = %cli.host, "Connected to primary content store");

    formatter.banner("Spaces Listing");
    let spaces = print_spaces(&store, formatter).await?;

    formatter.banner(&format!(
        "Content Listing of {space_id} - before file is added"
    ));
    let before_upload = print_content_listing(&store, space_id, formatter).await?;

    formatter.banner(&format!(
        "Storing file at path {}",
        cli.content.display()
    ));
    let (content_id, checksum) = store_file(&store, space_id, &cli.content, formatter).await?;

    formatter.banner(&format!(
        "Content Listing of {space_id} - after file is added"
    ));
    let after_upload = print_content_listing(&store, space_id, formatter).await?;

    store.delete_content(space_id, &content_id).await?;

    formatter.banner(&format!(
        "Content Listing of {space_id} - after file is deleted"
    ));
    let after_delete = print_content_listing(&store, space_id, formatter).await?;

    formatter.println("\n\nSimple API Example process complete.");

    Ok(RunReport {
        spaces,
        content_id,
        checksum,
        before_upload,
        after_upload,
        after_delete,
    })
}

/// Print every space with its properties
async fn print_spaces<S>(store: &S, formatter: &Formatter) -> Result<Vec<String>>
where
    S: ContentStore + ?Sized,
{
    let spaces = store.list_spaces().await?;
    for space_id in &spaces {
        formatter.println(&format!("Space Name: {space_id}"));
        let properties = store.space_properties(space_id).await?;
        for (key, value) in &properties {
            formatter.println(&format!("{key}: {value}"));
        }
        formatter.println("---");
    }
    Ok(spaces)
}

/// Print the content ids of a space, unfiltered
async fn print_content_listing<S>(
    store: &S,
    space_id: &str,
    formatter: &Formatter,
) -> Result<Vec<String>>
where
    S: ContentStore + ?Sized,
{
    let mut listed = Vec::new();
    let mut contents = list_content_ids(store, space_id, None);
    while let Some(content_id) = contents.try_next().await? {
        formatter.println(&content_id);
        listed.push(content_id);
    }
    Ok(listed)
}

/// Upload a local file and report the checksum the store returns
///
/// Returns the generated content id and the store's checksum. A checksum
/// shaped like an MD5 digest must match the local file; any other
/// store-defined hash is reported and accepted as is.
async fn store_file<S>(
    store: &S,
    space_id: &str,
    path: &Path,
    formatter: &Formatter,
) -> Result<(String, String)>
where
    S: ContentStore + ?Sized,
{
    let length = ensure_content_file(path).await?;
    let local_checksum = file_md5(path).await?;
    let content_id = generate_content_id(path, Timestamp::now())?;

    tracing::info!(
        space_id,
        content_id = %content_id,
        size = %humansize::format_size(length, humansize::BINARY),
        "Storing file"
    );

    // The file is owned by the request body and closed when the upload ends,
    // whether it succeeded or not.
    let checksum = {
        let file = open_content_file(path).await?;
        let progress = ProgressBar::new(formatter.config(), length);
        let body = progress.wrap_reader(file);
        let result = store
            .add_content(space_id, NewContent::new(&content_id, length), body)
            .await;
        progress.finish_and_clear();
        result?
    };

    formatter.println(&format!("Content added with checksum: {checksum}"));

    if !is_md5_hex(&checksum) {
        tracing::warn!(
            content_id = %content_id,
            checksum = %checksum,
            "Store checksum is not an MD5 digest, skipping local comparison"
        );
    } else if !checksum.eq_ignore_ascii_case(&local_checksum) {
        return Err(Error::ChecksumMismatch {
            local: local_checksum,
            remote: checksum,
        });
    }

    Ok((content_id, checksum))
}

fn is_md5_hex(value: &str) -> bool {
    value.len() == 32 && value.bytes().all(|b| b.is_ascii_hexdigit())
}
