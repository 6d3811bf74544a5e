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

//! Marker-based pagination.
//!
//! Services without next links expect the client to repeat the request with
//! a `marker` (sometimes `offset`) query parameter pointing past the last
//! item it has seen. How the marker is computed differs per service: most
//! use the identifier of the last item, some use offset arithmetic. The
//! derivation is therefore a pluggable function; [last_item_id] and
//! [next_offset] cover the two common formulas.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::page::{Collection, Page, PageResult};
use super::url::{query_value, set_query_param};
use super::{Error, ErrorKind};

const DEFAULT_MARKER_PARAM: &str = "marker";
const LIMIT_PARAM: &str = "limit";

/// Derivation of the next marker from a fetched page.
///
/// Returning `None` ends pagination after the page. The function must be
/// pure: given the same page, it always derives the same marker.
pub type MarkerFn = Arc<dyn Fn(&PageResult) -> Result<Option<String>, Error> + Send + Sync>;

/// A page whose successor is addressed by a marker derived from its contents.
///
/// The marker is recomputed from the page body on every call, never stored
/// or injected from outside: the next URL is a pure function of the page and
/// its own URL. When the URL carries no `limit` parameter, the server
/// returns the whole collection at once and pagination ends after this page.
#[derive(Clone)]
pub struct MarkerPage {
    inner: PageResult,
    collection_key: Cow<'static, str>,
    marker_param: Cow<'static, str>,
    derive: MarkerFn,
}

impl fmt::Debug for MarkerPage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MarkerPage")
            .field("url", &self.inner.url)
            .field("collection_key", &self.collection_key)
            .field("marker_param", &self.marker_param)
            .finish()
    }
}

impl MarkerPage {
    /// Wrap one fetched page, rewriting the `marker` parameter.
    pub fn new<K>(inner: PageResult, collection_key: K, derive: MarkerFn) -> MarkerPage
    where
        K: Into<Cow<'static, str>>,
    {
        MarkerPage {
            inner,
            collection_key: collection_key.into(),
            marker_param: Cow::Borrowed(DEFAULT_MARKER_PARAM),
            derive,
        }
    }

    /// A page constructor for a [Pager](crate::Pager).
    pub fn factory<K>(
        collection_key: K,
        derive: MarkerFn,
    ) -> impl Fn(PageResult) -> MarkerPage + Send + Sync
    where
        K: Into<Cow<'static, str>> + Clone + Send + Sync,
    {
        move |inner| MarkerPage::new(inner, collection_key.clone(), derive.clone())
    }

    /// A page constructor rewriting a custom query parameter (e.g. `offset`).
    pub fn factory_with<K, P>(
        collection_key: K,
        marker_param: P,
        derive: MarkerFn,
    ) -> impl Fn(PageResult) -> MarkerPage + Send + Sync
    where
        K: Into<Cow<'static, str>> + Clone + Send + Sync,
        P: Into<Cow<'static, str>> + Clone + Send + Sync,
    {
        move |inner| MarkerPage {
            inner,
            collection_key: collection_key.clone().into(),
            marker_param: marker_param.clone().into(),
            derive: derive.clone(),
        }
    }

    /// The marker the next page starts after, if any.
    pub fn next_marker(&self) -> Result<Option<String>, Error> {
        (self.derive)(&self.inner)
    }
}

impl Page for MarkerPage {
    fn is_empty(&self) -> Result<bool, Error> {
        self.inner.count(&self.collection_key).map(|count| count == 0)
    }

    fn next_page_url(&self) -> Result<Option<Url>, Error> {
        // An unlimited listing returns everything in one response.
        if query_value(&self.inner.url, LIMIT_PARAM).is_none() {
            return Ok(None);
        }
        Ok(self.next_marker()?.map(|marker| {
            set_query_param(self.inner.url.clone(), &self.marker_param, &marker)
        }))
    }

    fn raw(&self) -> &PageResult {
        &self.inner
    }
}

impl Collection for MarkerPage {
    fn items<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        self.inner.extract(&self.collection_key)
    }
}

fn limit_of(page: &PageResult) -> Result<Option<usize>, Error> {
    query_value(&page.url, LIMIT_PARAM)
        .map(|value| {
            value.parse().map_err(|_| {
                Error::new(ErrorKind::InvalidInput, "The limit parameter is not an integer")
            })
        })
        .transpose()
}

/// Derive the marker from a field of the last item on the page.
///
/// This is the formula used by most OpenStack services: the next page starts
/// after the item with the given identifier. Pagination ends when the page
/// holds fewer items than the `limit` parameter of its URL.
pub fn last_item_id<K, F>(collection_key: K, id_field: F) -> MarkerFn
where
    K: Into<Cow<'static, str>>,
    F: Into<Cow<'static, str>>,
{
    let collection_key = collection_key.into();
    let id_field = id_field.into();
    Arc::new(move |page: &PageResult| {
        let items = match page.collection(&collection_key)? {
            Some(items) if !items.is_empty() => items,
            _ => return Ok(None),
        };
        if let Some(limit) = limit_of(page)? {
            if items.len() < limit {
                return Ok(None);
            }
        }
        match items[items.len() - 1].get(id_field.as_ref()) {
            Some(Value::String(id)) => Ok(Some(id.clone())),
            Some(Value::Number(id)) => Ok(Some(id.to_string())),
            _ => Err(Error::new(
                ErrorKind::InvalidResponse,
                format!("No usable {} field on the last item", id_field),
            )),
        }
    })
}

/// Derive the next offset for offset-paginated services.
///
/// The marker value is the current `offset` (0 when absent) plus the number
/// of items on the page; combine with
/// [factory_with](MarkerPage::factory_with) and an `offset` marker
/// parameter. Pagination ends when the page holds fewer items than the
/// `limit` parameter of its URL.
pub fn next_offset<K>(collection_key: K) -> MarkerFn
where
    K: Into<Cow<'static, str>>,
{
    let collection_key = collection_key.into();
    Arc::new(move |page: &PageResult| {
        let count = page.count(&collection_key)?;
        match limit_of(page)? {
            Some(limit) if count >= limit && count > 0 => {
                let offset: usize = query_value(&page.url, "offset")
                    .map(|value| {
                        value.parse().map_err(|_| {
                            Error::new(
                                ErrorKind::InvalidInput,
                                "The offset parameter is not an integer",
                            )
                        })
                    })
                    .transpose()?
                    .unwrap_or(0);
                Ok(Some((offset + count).to_string()))
            }
            _ => Ok(None),
        }
    })
}
