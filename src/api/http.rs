// src/api/http.rs

//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::api::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::Result;
use crate::models::ClientConfig;
use crate::utils::http::create_async_client;

/// Transport that talks to a live server.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport from client settings.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            base_url: Url::parse(&config.base_url)?,
        })
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.base_url.join(&request.path)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request)?;
        log::debug!("{} {}", request.method, url);

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, url);
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).ok();
        if body.is_none() && !text.trim().is_empty() {
            log::debug!("Non-JSON body ({status}): {text}");
        }

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        let config = ClientConfig {
            base_url: base.to_string(),
            ..ClientConfig::default()
        };
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn url_joins_path_and_query() {
        let request = ApiRequest::get("/api/consulta/desempenho")
            .with_query("aluno_id", "3")
            .with_query("inicio", "2025-01-01");
        let url = transport("http://localhost:5000").url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/consulta/desempenho?aluno_id=3&inicio=2025-01-01"
        );
    }

    #[test]
    fn absolute_path_ignores_base_path() {
        let request = ApiRequest::get("/api/alunos");
        let url = transport("https://example.com/app/").url_for(&request).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/alunos");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = ClientConfig {
            base_url: "::nope".to_string(),
            ..ClientConfig::default()
        };
        assert!(HttpTransport::new(&config).is_err());
    }
}
