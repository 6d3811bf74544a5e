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

//! Base code for request authentication.

use std::fmt::Debug;

use async_trait::async_trait;
use http::header::HeaderValue;
use reqwest::{Client, RequestBuilder, Url};
use static_assertions::{assert_impl_all, assert_obj_safe};

use super::{Error, ErrorKind};

const X_AUTH_TOKEN: &str = "x-auth-token";

/// Trait for an authentication type.
///
/// Implementations attach credentials to outgoing requests. Caching and
/// renewing the credentials, when applicable, is the implementation's
/// responsibility; a pager never inspects them.
#[async_trait]
pub trait AuthType: Debug + Sync + Send {
    /// Authenticate a request.
    async fn authenticate(
        &self,
        client: &Client,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, Error>;

    /// Endpoint this authentication is bound to, if any.
    ///
    /// Callers join resource paths to this URL when building the first page
    /// of a listing.
    fn endpoint(&self) -> Result<Url, Error>;
}

assert_obj_safe!(AuthType);

fn parse_endpoint<U: AsRef<str>>(endpoint: U) -> Result<Url, Error> {
    Url::parse(endpoint.as_ref()).map_err(|e| Error::new(ErrorKind::InvalidInput, e.to_string()))
}

fn missing_endpoint() -> Error {
    Error::new(
        ErrorKind::EndpointNotFound,
        "This authentication is not bound to an endpoint",
    )
}

/// Authentication type that provides no authentication.
///
/// Requests pass through unchanged:
/// ```rust,no_run
/// let auth = ospager::NoAuth::new("https://cloud.local/baremetal")
///     .expect("Invalid auth URL");
/// let client = ospager::ServiceClient::new(reqwest::Client::new(), auth);
/// ```
#[derive(Clone, Debug)]
pub struct NoAuth {
    endpoint: Option<Url>,
}

assert_impl_all!(NoAuth: Send, Sync);

impl NoAuth {
    /// Create a new fake authentication method using a fixed endpoint.
    #[inline]
    pub fn new<U>(endpoint: U) -> Result<NoAuth, Error>
    where
        U: AsRef<str>,
    {
        Ok(NoAuth {
            endpoint: Some(parse_endpoint(endpoint)?),
        })
    }

    /// Create a new fake authentication method without an endpoint.
    ///
    /// All calls to `endpoint` will fail.
    #[inline]
    pub fn new_without_endpoint() -> NoAuth {
        NoAuth { endpoint: None }
    }
}

#[async_trait]
impl AuthType for NoAuth {
    /// This call returns the request unchanged.
    async fn authenticate(
        &self,
        _client: &Client,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, Error> {
        Ok(request)
    }

    /// Get the predefined endpoint.
    fn endpoint(&self) -> Result<Url, Error> {
        self.endpoint.clone().ok_or_else(missing_endpoint)
    }
}

/// Authentication using a pre-obtained token.
///
/// The token is attached to every request in the `X-Auth-Token` header. How
/// the token was obtained, and whether it is still valid, is the caller's
/// concern; an expired token surfaces as an
/// [AuthenticationFailed](crate::ErrorKind::AuthenticationFailed) error from
/// the server.
#[derive(Clone, Debug)]
pub struct TokenAuth {
    token: HeaderValue,
    endpoint: Option<Url>,
}

assert_impl_all!(TokenAuth: Send, Sync);

impl TokenAuth {
    /// Create token authentication bound to a fixed endpoint.
    pub fn new<T, U>(token: T, endpoint: U) -> Result<TokenAuth, Error>
    where
        T: AsRef<str>,
        U: AsRef<str>,
    {
        let mut result = TokenAuth::new_without_endpoint(token)?;
        result.endpoint = Some(parse_endpoint(endpoint)?);
        Ok(result)
    }

    /// Create token authentication without an endpoint.
    pub fn new_without_endpoint<T>(token: T) -> Result<TokenAuth, Error>
    where
        T: AsRef<str>,
    {
        let mut token = HeaderValue::from_str(token.as_ref())
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "Invalid token value"))?;
        token.set_sensitive(true);
        Ok(TokenAuth {
            token,
            endpoint: None,
        })
    }
}

#[async_trait]
impl AuthType for TokenAuth {
    /// Add the token header to the request.
    async fn authenticate(
        &self,
        _client: &Client,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, Error> {
        Ok(request.header(X_AUTH_TOKEN, self.token.clone()))
    }

    /// Get the predefined endpoint.
    fn endpoint(&self) -> Result<Url, Error> {
        self.endpoint.clone().ok_or_else(missing_endpoint)
    }
}
