//! Cursor-based pagination shared by every list-style remote call.
//!
//! A [`Page`] carries the items of one response together with the continuation
//! token the service handed back. [`paginate`] turns a page-fetching closure into a
//! lazy stream of pages, so a caller that only needs the first few items can stop
//! early with [`take_items`] instead of walking the whole listing.
//!
//! The loop ends when the service returns no token (or an empty one), or when the
//! returned token was already sent once. CloudWatch Logs `GetLogEvents` keeps handing
//! back its forward token at the end of a stream, so presence alone does not mean
//! more pages exist; no cursor is ever requested twice.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Result;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::collections::HashSet;
use std::future::Future;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// A page with no continuation token.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }
}

struct PagerState<F> {
    fetch: F,
    cursor: Option<String>,
    /// Cursors already sent to the service
    sent: HashSet<String>,
    finished: bool,
}

/// Decide whether a page whose continuation token is `next` is the final one,
/// given the cursors already sent.
fn is_final_page(sent: &HashSet<String>, next: Option<&str>) -> bool {
    match next {
        None => true,
        Some("") => true,
        Some(next) => sent.contains(next),
    }
}

/// Lazily walk a paginated listing, one page per poll of the returned stream.
///
/// `fetch` is called with `None` for the first page and with the previous page's
/// token afterwards. The first error ends the stream.
pub fn paginate<'a, T, F, Fut>(fetch: F) -> BoxStream<'a, Result<Vec<T>>>
where
    T: Send + 'a,
    F: FnMut(Option<String>) -> Fut + Send + 'a,
    Fut: Future<Output = Result<Page<T>>> + Send + 'a,
{
    let state = PagerState {
        fetch,
        cursor: None,
        sent: HashSet::new(),
        finished: false,
    };

    stream::try_unfold(state, |mut state| async move {
        if state.finished {
            return Ok::<_, anyhow::Error>(None);
        }

        let used = state.cursor.take();
        if let Some(cursor) = &used {
            state.sent.insert(cursor.clone());
        }
        let page = (state.fetch)(used.clone()).await?;

        state.finished = is_final_page(&state.sent, page.next_cursor.as_deref());
        if state.finished {
            trace_trace!("Pagination finished (last cursor: {:?})", used);
        }
        state.cursor = page.next_cursor;

        Ok(Some((page.items, state)))
    })
    .boxed()
}

/// Drain every page and concatenate the items in page order.
///
/// Any page error aborts the walk; items gathered so far are dropped.
pub async fn collect_all<T>(pages: BoxStream<'_, Result<Vec<T>>>) -> Result<Vec<T>> {
    pages.try_concat().await
}

/// Gather at most `limit` items, requesting no further pages once enough are in hand.
pub async fn take_items<T>(
    mut pages: BoxStream<'_, Result<Vec<T>>>,
    limit: usize,
) -> Result<Vec<T>> {
    let mut items = Vec::new();
    while items.len() < limit {
        match pages.try_next().await? {
            Some(page) => items.extend(page),
            None => break,
        }
    }
    items.truncate(limit);
    Ok(items)
}
