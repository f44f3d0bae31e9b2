//! Paginated content listing
//!
//! Stores return content ids a page at a time. [`list_content_ids`] turns the
//! pages into one lazy stream; each call starts a fresh listing.

use std::collections::VecDeque;

use futures::stream::{self, BoxStream, StreamExt};

use crate::error::Result;
use crate::traits::{ContentStore, ListingRequest};

/// Number of content ids requested per page
pub const CONTENT_CHUNK_SIZE: u32 = 1000;

struct ListingState {
    request: ListingRequest,
    buffered: VecDeque<String>,
    exhausted: bool,
}

/// Lazily list the content ids of a space, optionally filtered by prefix
///
/// Pages are fetched on demand; the last id of a page is the marker for the
/// next one. A page shorter than requested ends the listing.
pub fn list_content_ids<'a, S>(
    store: &'a S,
    space_id: &'a str,
    prefix: Option<&'a str>,
) -> BoxStream<'a, Result<String>>
where
    S: ContentStore + ?Sized,
{
    let state = ListingState {
        request: ListingRequest {
            prefix: prefix.map(str::to_string),
            ..Default::default()
        },
        buffered: VecDeque::new(),
        exhausted: false,
    };

    stream::try_unfold(state, move |state| next_content_id(store, space_id, state)).boxed()
}

async fn next_content_id<S>(
    store: &S,
    space_id: &str,
    mut state: ListingState,
) -> Result<Option<(String, ListingState)>>
where
    S: ContentStore + ?Sized,
{
    loop {
        if let Some(content_id) = state.buffered.pop_front() {
            return Ok(Some((content_id, state)));
        }
        if state.exhausted {
            return Ok(None);
        }

        let page = store.space_contents_chunk(space_id, &state.request).await?;
        tracing::debug!(
            space_id = %space_id,
            marker = ?state.request.marker,
            count = page.len(),
            "Fetched content page"
        );

        state.exhausted = page.is_empty() || page.len() < state.request.max_results as usize;
        state.request.marker = page.last().cloned();
        state.buffered.extend(page);
    }
}
