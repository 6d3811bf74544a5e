// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The pagination engine.

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::client::Fetch;
use super::page::{Collection, Page, PageResult};
use super::url::set_query_param;
use super::Error;

/// Iteration over a collection split across several responses.
///
/// A pager is created per list call and holds the transport, the URL of the
/// first page (already carrying any caller-supplied query filters) and a
/// constructor wrapping each raw response into the page type of the target
/// resource. Construction performs no I/O; the requests happen inside the
/// iteration methods, one at a time, strictly in page order.
///
/// Nothing is shared between pagers. Several pagers may run concurrently
/// against one transport as long as the transport allows it.
pub struct Pager<P> {
    pub(crate) client: Arc<dyn Fetch>,
    pub(crate) initial_url: Url,
    pub(crate) create_page: Box<dyn Fn(PageResult) -> P + Send + Sync>,
}

impl<P> fmt::Debug for Pager<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Pager")
            .field("client", &self.client)
            .field("initial_url", &self.initial_url)
            .finish()
    }
}

impl<P> Pager<P>
where
    P: Page,
{
    /// Create a pager over the collection at `initial_url`.
    pub fn new<C, F>(client: C, initial_url: Url, create_page: F) -> Pager<P>
    where
        C: Fetch + 'static,
        F: Fn(PageResult) -> P + Send + Sync + 'static,
    {
        Pager {
            client: Arc::new(client),
            initial_url,
            create_page: Box::new(create_page),
        }
    }

    /// Set the page size on the initial URL.
    ///
    /// Marker-based pagination only continues past the first page when a
    /// limit is in effect.
    pub fn with_limit(mut self, limit: usize) -> Pager<P> {
        self.initial_url = set_query_param(self.initial_url, "limit", &limit.to_string());
        self
    }

    pub(crate) async fn fetch_one(&self, url: Url) -> Result<P, Error> {
        trace!("Fetching a page from {}", url);
        let raw = self.client.fetch(url).await?;
        Ok((self.create_page)(raw))
    }

    /// Invoke `visitor` for every non-empty page, in fetch order.
    ///
    /// The visitor decides whether to continue to the next page. The first
    /// transport, decode or visitor error stops the iteration and becomes
    /// its result; nothing is retried and no further requests are made. An
    /// empty page ends the iteration normally without being visited.
    pub async fn each_page<V>(&self, mut visitor: V) -> Result<(), Error>
    where
        V: FnMut(&P) -> Result<bool, Error>,
    {
        let mut url = Some(self.initial_url.clone());
        let mut pages = 0usize;
        while let Some(current) = url.take() {
            let page = self.fetch_one(current).await?;
            if page.is_empty()? {
                break;
            }
            pages += 1;
            if !visitor(&page)? {
                debug!("Iteration stopped by the visitor after {} page(s)", pages);
                return Ok(());
            }
            url = page.next_page_url()?;
        }
        debug!("Collection exhausted after {} page(s)", pages);
        Ok(())
    }

    /// Fetch every page of the collection into memory.
    ///
    /// The pages come back in fetch order. The whole collection is
    /// materialized at once; not suitable for collections of unbounded size.
    pub async fn all_pages(&self) -> Result<Vec<P>, Error>
    where
        P: Clone,
    {
        let mut pages = Vec::new();
        self.each_page(|page| {
            pages.push(page.clone());
            Ok(true)
        })
        .await?;
        Ok(pages)
    }

    /// Fetch every page and concatenate the deserialized items.
    ///
    /// Items keep the order the server returned them in. Like
    /// [all_pages](Pager::all_pages), this materializes the whole
    /// collection.
    pub async fn all_items<T>(&self) -> Result<Vec<T>, Error>
    where
        P: Collection,
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        self.each_page(|page| {
            items.extend(page.items::<T>()?);
            Ok(true)
        })
        .await?;
        Ok(items)
    }
}
