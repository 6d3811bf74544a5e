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

//! Streams over paginated collections.

use async_stream::try_stream;
use futures::pin_mut;
use futures::stream::{Stream, TryStreamExt};
use serde::de::DeserializeOwned;

use super::page::{Collection, Page};
use super::pager::Pager;
use super::Error;

impl<P> Pager<P>
where
    P: Page,
{
    /// Convert the pager into a stream of pages.
    ///
    /// Requests happen lazily as the stream is polled, one page per poll
    /// that crosses a page boundary, with the same termination and error
    /// rules as [each_page](Pager::each_page). Dropping the stream stops
    /// the iteration without fetching further pages.
    pub fn into_pages(self) -> impl Stream<Item = Result<P, Error>> {
        try_stream! {
            let mut url = Some(self.initial_url.clone());
            while let Some(current) = url.take() {
                let page = self.fetch_one(current).await?;
                if page.is_empty()? {
                    break;
                }
                url = page.next_page_url()?;
                yield page;
            }
        }
    }

    /// Convert the pager into a stream of deserialized items.
    ///
    /// Items of one page are yielded in server order before the next page
    /// is fetched.
    pub fn into_items<T>(self) -> impl Stream<Item = Result<T, Error>>
    where
        P: Collection,
        T: DeserializeOwned,
    {
        try_stream! {
            let pages = self.into_pages();
            pin_mut!(pages);
            while let Some(page) = pages.try_next().await? {
                for item in page.items::<T>()? {
                    yield item;
                }
            }
        }
    }
}
