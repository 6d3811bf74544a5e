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

//! Asynchronous pagination for OpenStack-style REST collections.
//!
//! Many REST services split large collections across several responses and
//! leave it to the client to walk them: either the body carries a link to the
//! next page, or the next request repeats the current one with a `marker`
//! (or `offset`) query parameter derived from the last page. This crate
//! hides the difference behind one [Pager] that issues authenticated GETs
//! until the collection is exhausted.
//!
//! The continuation strategy is chosen by the page type the pager produces:
//!
//! * [LinkedPage] follows a `links` entry from the response body;
//! * [MarkerPage] rewrites a query parameter with a marker recomputed from
//!   the current page by a pluggable derivation (see the [marker] module);
//! * [SinglePage] never continues: one fetch is the entire result.
//!
//! Iteration is strictly sequential: one GET at a time, in page order, no
//! prefetching and no retries. The first transport, decode or visitor error
//! stops the loop and becomes its result.
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), ospager::Error> {
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Server {
//!     id: String,
//!     name: String,
//! }
//!
//! let auth = ospager::TokenAuth::new("abc123", "https://cloud.local/compute/v2.1")?;
//! let client = ospager::ServiceClient::new(reqwest::Client::new(), auth);
//! let url = ospager::url::join(client.auth_type().endpoint()?, "servers");
//!
//! let pager = ospager::Pager::new(client, url, ospager::LinkedPage::factory("servers"));
//! for server in pager.all_items::<Server>().await? {
//!     println!("ID = {}, Name = {}", server.id, server.name);
//! }
//! # Ok(()) }
//! # #[tokio::main]
//! # async fn main() { example().await.unwrap(); }
//! ```
//!
//! [all_items](Pager::all_items) and [all_pages](Pager::all_pages)
//! materialize the whole collection in memory. For large listings enable the
//! `stream` feature (on by default) and consume the pages lazily with
//! [into_pages](Pager::into_pages) or [into_items](Pager::into_items).

#![deny(
    dead_code,
    improper_ctypes,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_doc_comments,
    unused_import_braces,
    unused_parens,
    unused_qualifications,
    unused_results,
    while_true
)]

mod auth;
mod client;
mod error;
mod linked;
pub mod marker;
mod page;
mod pager;
mod single;
#[cfg(feature = "stream")]
mod stream;
pub mod url;

pub use crate::auth::{AuthType, NoAuth, TokenAuth};
pub use crate::client::{check, Fetch, ServiceClient};
pub use crate::error::{Error, ErrorKind};
pub use crate::linked::LinkedPage;
pub use crate::marker::{MarkerFn, MarkerPage};
pub use crate::page::{Collection, Page, PageResult};
pub use crate::pager::Pager;
pub use crate::single::SinglePage;
