//! Following bundle `next` links.
//!
//! [`pages`] is a lazy stream that fetches one page per poll and follows the
//! first link with relation `next` until a page has none. [`fetch_all`]
//! drains it into a [`ResourceCollection`].
//!
//! Nothing bounds the number of pages unless a [`PageLimit`] is given: a
//! server that always returns a `next` link is followed forever.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_util::TryStreamExt;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::fhir::{Page, ResourceCollection};
use crate::traits::FhirConnection;
use crate::types::SearchUrl;
use crate::{Error, Result};

/// Cap on the number of pages a fetch may follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageLimit {
    /// Follow `next` links until the server stops sending them.
    #[default]
    Unbounded,
    /// Fail with [`Error::PageLimitExceeded`] instead of fetching page `n + 1`.
    AtMost(usize),
}

impl From<Option<usize>> for PageLimit {
    fn from(limit: Option<usize>) -> Self {
        limit.map_or(PageLimit::Unbounded, PageLimit::AtMost)
    }
}

/// Lazy stream of bundle pages.
pub struct Pages<'a> {
    inner: Pin<Box<dyn Stream<Item = Result<Page>> + Send + 'a>>,
}

impl Stream for Pages<'_> {
    type Item = Result<Page>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Stream the pages starting at `start`.
///
/// The stream ends after the first page without a `next` link, or after
/// yielding the first error.
pub fn pages<'a, C>(conn: &'a C, start: Url, limit: PageLimit) -> Pages<'a>
where
    C: FhirConnection + ?Sized,
{
    let stream = async_stream::stream! {
        let mut next = Some(start);
        let mut fetched = 0usize;

        while let Some(url) = next.take() {
            if let PageLimit::AtMost(max) = limit {
                if fetched >= max {
                    yield Err(Error::PageLimitExceeded { limit: max });
                    break;
                }
            }

            debug!(%url, page = fetched + 1, "Fetching page");
            let page = match conn.fetch_page(&url).await {
                Ok(page) => page,
                Err(e) => {
                    yield Err(e);
                    break;
                }
            };
            fetched += 1;

            let link = page.next_link().map(|link| conn.resolve(link)).transpose();
            yield Ok(page);

            match link {
                Ok(link) => next = link,
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    };

    Pages {
        inner: Box::pin(stream),
    }
}

/// Fetch every page starting at `start` and collect the resources in
/// page-then-entry order.
#[instrument(skip(conn, limit), fields(%start))]
pub async fn fetch_all<C>(conn: &C, start: Url, limit: PageLimit) -> Result<ResourceCollection>
where
    C: FhirConnection + ?Sized,
{
    let mut stream = pages(conn, start, limit);
    let mut collection = ResourceCollection::new();

    while let Some(page) = stream.try_next().await? {
        let entries = page.len();
        let skipped = collection.extend_from_page(page);
        if skipped > 0 {
            warn!(skipped, "Skipped bundle entries without a resource");
        }
        info!(
            page = collection.pages(),
            entries,
            total = collection.len(),
            "Fetched page"
        );
    }

    Ok(collection)
}

/// Resolve a preset search against the connection's FHIR root and fetch it.
pub async fn fetch_search<C>(
    conn: &C,
    search: &SearchUrl,
    limit: PageLimit,
) -> Result<ResourceCollection>
where
    C: FhirConnection + ?Sized,
{
    let start = conn.resolve(&search.to_reference())?;
    fetch_all(conn, start, limit).await
}
