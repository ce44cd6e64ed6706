//! Network boundary.
//!
//! Every page controller talks to the server through [`ApiClient`], which
//! sits on top of a [`Transport`]. The reqwest-backed [`HttpTransport`] is
//! used in production; tests swap in a recording mock.

mod client;
mod http;
#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub use client::ApiClient;
pub use http::HttpTransport;

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// A request relative to the server root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status and decoded body of a completed request.
///
/// `body` is `None` when the server sent nothing or something that is not
/// JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Human readable message of an error body.
    ///
    /// The server uses `mensagem` on most routes and `erro` on a few.
    pub fn message(&self) -> Option<String> {
        let body = self.body.as_ref()?;
        ["mensagem", "erro"]
            .iter()
            .find_map(|key| body.get(key).and_then(Value::as_str))
            .map(str::to_string)
    }
}

/// Sends requests to the server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request. Errors mean no response was obtained.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}
