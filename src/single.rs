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

//! Pagination of collections that fit in one response.

use std::borrow::Cow;

use serde::de::DeserializeOwned;

use super::page::{Collection, Page, PageResult};
use super::Error;

/// A page that is the entire collection.
#[derive(Debug, Clone)]
pub struct SinglePage {
    inner: PageResult,
    collection_key: Cow<'static, str>,
}

impl SinglePage {
    /// Wrap the only page of a collection.
    pub fn new<K>(inner: PageResult, collection_key: K) -> SinglePage
    where
        K: Into<Cow<'static, str>>,
    {
        SinglePage {
            inner,
            collection_key: collection_key.into(),
        }
    }

    /// A page constructor for a [Pager](crate::Pager).
    pub fn factory<K>(collection_key: K) -> impl Fn(PageResult) -> SinglePage + Send + Sync
    where
        K: Into<Cow<'static, str>> + Clone + Send + Sync,
    {
        move |inner| SinglePage::new(inner, collection_key.clone())
    }
}

impl Page for SinglePage {
    fn is_empty(&self) -> Result<bool, Error> {
        self.inner.count(&self.collection_key).map(|count| count == 0)
    }

    // next_page_url is the trait default: there is never a next page.

    fn raw(&self) -> &PageResult {
        &self.inner
    }
}

impl Collection for SinglePage {
    fn items<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        self.inner.extract(&self.collection_key)
    }
}
