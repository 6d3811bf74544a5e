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

//! Low-level authenticated transport.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use log::trace;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::Value;
use static_assertions::{assert_impl_all, assert_obj_safe};

use super::auth::AuthType;
use super::page::PageResult;
use super::Error;

/// The transport interface consumed by a [Pager](crate::Pager).
///
/// One call issues one authenticated GET and returns the decoded body
/// together with the response metadata. Implementations must be safe for
/// concurrent use: several pagers may share one transport.
#[async_trait]
pub trait Fetch: Debug + Send + Sync {
    /// Fetch one page.
    async fn fetch(&self, url: Url) -> Result<PageResult, Error>;
}

assert_obj_safe!(Fetch);

/// Authenticated HTTP client.
///
/// Uses `Arc` internally and should be reused when possible by cloning it.
/// Clones share the same authentication object.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    auth: Arc<dyn AuthType>,
}

assert_impl_all!(ServiceClient: Send, Sync);

impl ServiceClient {
    /// Create a new client on top of an authentication type.
    pub fn new<Auth: AuthType + 'static>(client: Client, auth_type: Auth) -> ServiceClient {
        ServiceClient {
            client,
            auth: Arc::new(auth_type),
        }
    }

    /// Get a reference to the authentication type in use.
    #[inline]
    pub fn auth_type(&self) -> &dyn AuthType {
        self.auth.as_ref()
    }

    /// Get a reference to the inner (non-authenticated) client.
    #[inline]
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Set a new authentication for this client.
    #[inline]
    pub fn set_auth_type<Auth: AuthType + 'static>(&mut self, auth_type: Auth) {
        self.auth = Arc::new(auth_type);
    }

    /// Issue one authenticated GET and decode the response body.
    ///
    /// An empty body (e.g. from 204 No Content) decodes to JSON null, which
    /// every page type treats as an empty page.
    pub async fn get(&self, url: Url) -> Result<PageResult, Error> {
        let request = self
            .auth
            .authenticate(&self.client, self.client.get(url))
            .await?
            .build()?;
        trace!("Sending HTTP {} request to {}", request.method(), request.url());
        let response = check(self.client.execute(request).await?).await?;

        let url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(PageResult {
            url,
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Fetch for ServiceClient {
    async fn fetch(&self, url: Url) -> Result<PageResult, Error> {
        self.get(url).await
    }
}

#[derive(Debug, Deserialize)]
struct Message {
    message: Option<String>,
    faultstring: Option<String>,
    title: Option<String>,
}

impl From<Message> for Option<String> {
    fn from(value: Message) -> Option<String> {
        value.message.or(value.faultstring).or(value.title)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorResponse {
    Map(HashMap<String, Message>),
    Message(Message),
}

fn extract_message(text: String) -> String {
    serde_json::from_str::<ErrorResponse>(&text)
        .ok()
        .and_then(|body| match body {
            ErrorResponse::Map(map) => map.into_iter().next().and_then(|(_k, v)| v.into()),
            ErrorResponse::Message(msg) => msg.into(),
        })
        .unwrap_or(text)
}

/// Check the response for a failing status.
///
/// Non-2xx statuses become typed errors, with a human-readable message
/// extracted from the JSON error body when the service provides one. Errors
/// are never retried or downgraded here.
pub async fn check(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let message = extract_message(response.text().await?);
        trace!("HTTP request returned {}; error: {}", status, message);
        Err(Error::new(status.into(), message).with_status(status))
    } else {
        trace!(
            "HTTP request to {} returned {}",
            response.url(),
            response.status()
        );
        Ok(response)
    }
}
