//! Pagination Cursor Protocol
//!
//! Turns single page responses into `(items, next marker)` and chains them
//! into one lazy, forward-only stream. Pages are fetched strictly in
//! sequence because the marker for page N+1 is only known from page N.

use super::descriptor::{Envelope, ResourceDescriptor};
use super::fallback::Operation;
use super::query::QueryOptions;
use crate::error::{Error, Result};
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// One backend page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Present iff exactly one more request continues the listing
    pub next_marker: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_marker: None,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next_marker.is_none()
    }
}

impl Page<Value> {
    /// Decode a raw list response per descriptor. An empty body is an empty
    /// final page.
    pub fn decode(descriptor: &ResourceDescriptor, body: Option<Value>) -> Result<Self> {
        let Some(body) = body else {
            return Ok(Page::last(Vec::new()));
        };

        let next_marker = match descriptor.list_envelope {
            Envelope::Wrapped => next_marker(&body, &descriptor.links_key()),
            Envelope::Bare => None,
        };
        let items = descriptor.unwrap_list(body)?;

        Ok(Page { items, next_marker })
    }

    /// Deserialize every item into `T`
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<Page<T>> {
        let items = self
            .items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<T>, _>>()?;

        Ok(Page {
            items,
            next_marker: self.next_marker,
        })
    }
}

/// Find the `rel="next"` link under `links_key` and pull `marker` out of its href
pub fn next_marker(body: &Value, links_key: &str) -> Option<String> {
    let href = body
        .get(links_key)?
        .as_array()?
        .iter()
        .find(|link| link.get("rel").and_then(|r| r.as_str()) == Some("next"))?
        .get("href")?
        .as_str()?;

    let marker = marker_from_href(href);
    if marker.is_none() {
        tracing::warn!("Next link carries no marker, ending listing: {}", href);
    }
    marker
}

/// Extract the `marker` query parameter from an absolute or relative href
pub fn marker_from_href(href: &str) -> Option<String> {
    let url = match url::Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url::Url::parse("http://localhost/").ok()?.join(href).ok()?
        }
        Err(_) => return None,
    };

    url.query_pairs()
        .find(|(key, _)| key == "marker")
        .map(|(_, value)| value.into_owned())
        .filter(|marker| !marker.is_empty())
}

/// A lazy sequence of items spanning as many pages as the backend returns.
///
/// Nothing is fetched until the stream is polled, and no further page is
/// requested once the consumer stops pulling.
pub struct PagedSequence<T> {
    inner: BoxStream<'static, Result<T>>,
}

impl<T: Send + 'static> PagedSequence<T> {
    /// Drain every page into one vector
    pub async fn try_collect_all(self) -> Result<Vec<T>> {
        self.try_collect().await
    }

    /// Transform each item, keeping laziness
    pub fn map_items<U, F>(self, f: F) -> PagedSequence<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        PagedSequence {
            inner: self.inner.map_ok(f).boxed(),
        }
    }
}

impl<T> Stream for PagedSequence<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

enum Cursor {
    Next { options: QueryOptions, page: usize },
    Done,
}

/// Chain pages produced by `fetch` into one [`PagedSequence`].
///
/// `fetch` receives the options for each page: the caller's options for the
/// first, then the same options with `marker` replaced. A 404 on any page
/// ends the sequence as if exhausted; every other error is yielded once and
/// the sequence stops.
pub fn paged<T, F, Fut>(options: QueryOptions, fetch: F) -> PagedSequence<T>
where
    T: Send + 'static,
    F: FnMut(QueryOptions) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Page<T>>> + Send + 'static,
{
    let start = Cursor::Next { options, page: 0 };

    let pages = stream::try_unfold((start, fetch), |(cursor, mut fetch)| async move {
        let Cursor::Next { options, page } = cursor else {
            return Ok(None);
        };

        match fetch(options.clone()).await {
            Ok(result) => {
                let next = match result.next_marker.as_deref() {
                    Some(marker) => Cursor::Next {
                        options: options.with_marker(marker),
                        page: page + 1,
                    },
                    None => Cursor::Done,
                };
                Ok(Some((result.items, (next, fetch))))
            }
            Err(e) if Operation::List.fallback().recovers(&e) => {
                if page > 0 {
                    tracing::warn!("Page {} vanished mid-listing, ending early: {}", page, e);
                } else {
                    tracing::debug!("Collection absent, listing is empty: {}", e);
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    });

    PagedSequence {
        inner: pages
            .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, Error>)))
            .try_flatten()
            .boxed(),
    }
}
