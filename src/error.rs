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

//! Error and result types.

use std::borrow::Cow;
use std::fmt;

use reqwest::StatusCode;

/// Kind of an error.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Authentication failure (HTTP 401).
    AuthenticationFailed,

    /// Access denied (HTTP 403).
    AccessDenied,

    /// The requested resource was not found (HTTP 404).
    ResourceNotFound,

    /// The request timed out, either in transit or on the server (HTTP 408).
    RequestTimeout,

    /// The request conflicts with the resource state (HTTP 409).
    Conflict,

    /// Internal server error (HTTP 500).
    InternalServerError,

    /// The service is temporarily unavailable (HTTP 503).
    ServiceUnavailable,

    /// Any other failing HTTP status.
    HttpError,

    /// Insufficient or incorrect input provided by the caller.
    InvalidInput,

    /// A response could not be decoded or lacks an expected structure.
    InvalidResponse,

    /// No endpoint is configured for the request.
    EndpointNotFound,

    /// A failure of the HTTP transport below the status-code level.
    ProtocolError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::AuthenticationFailed => "Authentication failed",
            ErrorKind::AccessDenied => "Access denied",
            ErrorKind::ResourceNotFound => "Resource not found",
            ErrorKind::RequestTimeout => "Request timed out",
            ErrorKind::Conflict => "Requested resource is in a conflicting state",
            ErrorKind::InternalServerError => "Internal server error",
            ErrorKind::ServiceUnavailable => "Service unavailable",
            ErrorKind::HttpError => "HTTP request failed",
            ErrorKind::InvalidInput => "Invalid input provided",
            ErrorKind::InvalidResponse => "Received invalid response",
            ErrorKind::EndpointNotFound => "Requested endpoint was not found",
            ErrorKind::ProtocolError => "Error when accessing the server",
        })
    }
}

impl From<StatusCode> for ErrorKind {
    fn from(value: StatusCode) -> ErrorKind {
        match value {
            StatusCode::UNAUTHORIZED => ErrorKind::AuthenticationFailed,
            StatusCode::FORBIDDEN => ErrorKind::AccessDenied,
            StatusCode::NOT_FOUND => ErrorKind::ResourceNotFound,
            StatusCode::REQUEST_TIMEOUT => ErrorKind::RequestTimeout,
            StatusCode::CONFLICT => ErrorKind::Conflict,
            StatusCode::INTERNAL_SERVER_ERROR => ErrorKind::InternalServerError,
            StatusCode::SERVICE_UNAVAILABLE => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::HttpError,
        }
    }
}

/// Error from an OpenStack call.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    status: Option<StatusCode>,
}

impl Error {
    /// Create a new error of the given kind.
    pub fn new<S>(kind: ErrorKind, message: S) -> Error
    where
        S: Into<Cow<'static, str>>,
    {
        Error {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status of the failed response, if the error comes from one.
    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub(crate) fn with_status(mut self, status: StatusCode) -> Error {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Error {
        let kind = if value.is_timeout() {
            ErrorKind::RequestTimeout
        } else if let Some(status) = value.status() {
            status.into()
        } else if value.is_decode() {
            ErrorKind::InvalidResponse
        } else {
            ErrorKind::ProtocolError
        };

        let status = value.status();
        let result = Error::new(kind, value.to_string());
        match status {
            Some(status) => result.with_status(status),
            None => result,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Error {
        Error::new(ErrorKind::InvalidResponse, value.to_string())
    }
}
