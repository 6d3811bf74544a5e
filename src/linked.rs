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

//! Link-based pagination.

use std::borrow::Cow;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::page::{Collection, Page, PageResult};
use super::{Error, ErrorKind};

const DEFAULT_LINKS_KEY: &str = "links";
const DEFAULT_NEXT_REL: &str = "next";

/// A page whose body carries links to its neighbours.
///
/// Two link shapes are recognized: an array of `{"rel": ..., "href": ...}`
/// objects (Compute style, often under a `<resource>_links` key) and an
/// object mapping relation names to URLs (Networking style). A missing links
/// key, a missing relation or JSON null in place of a URL ends pagination.
#[derive(Debug, Clone)]
pub struct LinkedPage {
    inner: PageResult,
    collection_key: Cow<'static, str>,
    links_key: Cow<'static, str>,
    next_rel: Cow<'static, str>,
}

impl LinkedPage {
    /// Wrap one fetched page.
    pub fn new<K>(inner: PageResult, collection_key: K) -> LinkedPage
    where
        K: Into<Cow<'static, str>>,
    {
        LinkedPage {
            inner,
            collection_key: collection_key.into(),
            links_key: Cow::Borrowed(DEFAULT_LINKS_KEY),
            next_rel: Cow::Borrowed(DEFAULT_NEXT_REL),
        }
    }

    /// A page constructor for a [Pager](crate::Pager) with the default
    /// `links` key and `next` relation.
    pub fn factory<K>(collection_key: K) -> impl Fn(PageResult) -> LinkedPage + Send + Sync
    where
        K: Into<Cow<'static, str>> + Clone + Send + Sync,
    {
        move |inner| LinkedPage::new(inner, collection_key.clone())
    }

    /// A page constructor with a custom links key and next relation.
    ///
    /// Use it for services that store links under a per-resource key, e.g.
    /// `servers_links` in the Compute API.
    pub fn factory_with<K, L, R>(
        collection_key: K,
        links_key: L,
        next_rel: R,
    ) -> impl Fn(PageResult) -> LinkedPage + Send + Sync
    where
        K: Into<Cow<'static, str>> + Clone + Send + Sync,
        L: Into<Cow<'static, str>> + Clone + Send + Sync,
        R: Into<Cow<'static, str>> + Clone + Send + Sync,
    {
        move |inner| LinkedPage {
            inner,
            collection_key: collection_key.clone().into(),
            links_key: links_key.clone().into(),
            next_rel: next_rel.clone().into(),
        }
    }

    fn parse_href(&self, href: &Value) -> Result<Option<Url>, Error> {
        match href {
            Value::Null => Ok(None),
            Value::String(s) => Url::parse(s).map(Some).map_err(|e| {
                Error::new(
                    ErrorKind::InvalidResponse,
                    format!("Invalid {} link {}: {}", self.next_rel, s, e),
                )
            }),
            _ => Err(Error::new(
                ErrorKind::InvalidResponse,
                format!("Expected a string {} link", self.next_rel),
            )),
        }
    }
}

impl Page for LinkedPage {
    fn is_empty(&self) -> Result<bool, Error> {
        self.inner.count(&self.collection_key).map(|count| count == 0)
    }

    fn next_page_url(&self) -> Result<Option<Url>, Error> {
        if self.inner.body.is_null() {
            return Ok(None);
        }

        let links = match self.inner.body.get(self.links_key.as_ref()) {
            None | Some(Value::Null) => return Ok(None),
            Some(links) => links,
        };

        let href = match links {
            Value::Array(entries) => entries
                .iter()
                .find(|entry| {
                    entry.get("rel").and_then(Value::as_str) == Some(self.next_rel.as_ref())
                })
                .and_then(|entry| entry.get("href")),
            Value::Object(map) => map.get(self.next_rel.as_ref()),
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidResponse,
                    format!("Unexpected structure under the {} key", self.links_key),
                ))
            }
        };

        match href {
            Some(href) => self.parse_href(href),
            None => Ok(None),
        }
    }

    fn raw(&self) -> &PageResult {
        &self.inner
    }
}

impl Collection for LinkedPage {
    fn items<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        self.inner.extract(&self.collection_key)
    }
}
