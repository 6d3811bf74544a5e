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

//! Handy primitives for working with URLs.

use url::Url;

/// Append a path segment to the URL.
#[inline]
#[allow(unused_results)]
pub fn join(mut url: Url, other: &str) -> Url {
    url.path_segments_mut()
        .expect("expected a URL with a path")
        .pop_if_empty()
        .push(other);
    url
}

/// The value of a query parameter, if present.
///
/// With repeated parameters the first value wins.
pub fn query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Replace the value of one query parameter, keeping all others.
///
/// Existing pairs under `name` are dropped; the new pair is appended at the
/// end of the query.
#[allow(unused_results)]
pub fn set_query_param(mut url: Url, name: &str, value: &str) -> Url {
    let others: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != name)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.extend_pairs(others);
        query.append_pair(name, value);
    }
    url
}
