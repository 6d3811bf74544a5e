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

//! Pages of a collection resource.

use http::{HeaderMap, StatusCode};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Error, ErrorKind};

/// One fetched page with its JSON body already decoded.
///
/// A `PageResult` is produced fresh for every HTTP response and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct PageResult {
    /// The URL this page was fetched from.
    pub url: Url,
    /// HTTP status of the response.
    pub status: StatusCode,
    /// HTTP headers of the response.
    pub headers: HeaderMap,
    /// Decoded response body (JSON null for an empty body).
    pub body: Value,
}

impl PageResult {
    /// Deserialize the whole body.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_value(self.body.clone()).map_err(From::from)
    }

    /// Deserialize the collection stored under `key`.
    ///
    /// An empty body yields an empty vector; a body without the key (or with
    /// something other than an array under it) is an
    /// [InvalidResponse](crate::ErrorKind::InvalidResponse) error.
    pub fn extract<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, Error> {
        match self.collection(key)? {
            Some(items) => items
                .iter()
                .map(|item| serde_json::from_value(item.clone()).map_err(Error::from))
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    /// Borrow the raw collection under `key`, unless the body is empty.
    pub(crate) fn collection(&self, key: &str) -> Result<Option<&Vec<Value>>, Error> {
        if self.body.is_null() {
            return Ok(None);
        }
        match self.body.get(key) {
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(..) => Err(Error::new(
                ErrorKind::InvalidResponse,
                format!("Expected an array under the {} key", key),
            )),
            None => Err(Error::new(
                ErrorKind::InvalidResponse,
                format!("No {} key in the listing body", key),
            )),
        }
    }

    pub(crate) fn count(&self, key: &str) -> Result<usize, Error> {
        Ok(self.collection(key)?.map_or(0, Vec::len))
    }
}

/// Capabilities of one page of a paginated collection.
pub trait Page {
    /// Whether this page contains no items.
    fn is_empty(&self) -> Result<bool, Error>;

    /// URL of the next page, if there is one.
    ///
    /// The default implementation ends pagination after this page.
    fn next_page_url(&self) -> Result<Option<Url>, Error> {
        Ok(None)
    }

    /// The raw fetched page.
    fn raw(&self) -> &PageResult;
}

/// A page holding a typed collection of items.
pub trait Collection: Page {
    /// Deserialize the items of this page, in server order.
    fn items<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error>;
}

#[cfg(test)]
pub(crate) mod test {
    use http::HeaderMap;
    use reqwest::{StatusCode, Url};
    use serde_json::{json, Value};

    use super::super::ErrorKind;
    use super::PageResult;

    pub(crate) fn page_at(url: &str, body: Value) -> PageResult {
        PageResult {
            url: Url::parse(url).unwrap(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub(crate) fn page(body: Value) -> PageResult {
        page_at("https://cloud.local/v2/widgets", body)
    }

    #[test]
    fn test_extract() {
        let result = page(json!({"widgets": [{"id": "a"}, {"id": "b"}]}));
        #[derive(Debug, serde::Deserialize)]
        struct Widget {
            id: String,
        }
        let widgets = result.extract::<Widget>("widgets").unwrap();
        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[0].id, "a");
        assert_eq!(widgets[1].id, "b");
    }

    #[test]
    fn test_extract_null_body() {
        let result = page(Value::Null);
        let widgets = result.extract::<Value>("widgets").unwrap();
        assert!(widgets.is_empty());
    }

    #[test]
    fn test_extract_missing_key() {
        let result = page(json!({"gadgets": []}));
        let err = result.extract::<Value>("widgets").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }

    #[test]
    fn test_extract_not_an_array() {
        let result = page(json!({"widgets": 42}));
        let err = result.extract::<Value>("widgets").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }

    #[test]
    fn test_parse() {
        let result = page(json!({"widgets": []}));
        let body: Value = result.parse().unwrap();
        assert_eq!(body, json!({"widgets": []}));
    }

    #[test]
    fn test_count() {
        let result = page(json!({"widgets": [1, 2, 3]}));
        assert_eq!(result.count("widgets").unwrap(), 3);
        assert_eq!(page(Value::Null).count("widgets").unwrap(), 0);
    }
}
