use reqwest::{Method, RequestBuilder};
use serde_json::Value;

use super::ConfigApiError;
use super::types::{ErrorResponse, ListResponse, UpdateRequest};
use crate::operations::Operation;
use crate::provider::ProviderConfig;

const CONFIG_API_PATH: &str = "/config";

#[derive(Clone)]
pub struct ConfigClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl ConfigClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ConfigApiError> {
        let base_url = format!(
            "{}{}",
            config.https_host.trim_end_matches('/'),
            CONFIG_API_PATH
        );
        Self::create_client(
            base_url,
            config.username.clone(),
            config.password.clone(),
            config.insecure_trust_all_tls,
        )
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(
        base_url: String,
        username: String,
        password: String,
    ) -> Result<Self, ConfigApiError> {
        Self::create_client(base_url, username, password, false)
    }

    fn create_client(
        base_url: String,
        username: String,
        password: String,
        insecure_trust_all_tls: bool,
    ) -> Result<Self, ConfigApiError> {
        if insecure_trust_all_tls {
            tracing::warn!("TLS certificate verification is disabled");
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure_trust_all_tls)
            .build()
            .map_err(ConfigApiError::Network)?;

        Ok(Self {
            client,
            base_url,
            username,
            password,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn object_url(&self, endpoint: &str, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            endpoint,
            urlencoding::encode(name)
        )
    }

    /// Creates an object in `endpoint`'s collection and returns the stored object.
    pub async fn add(&self, endpoint: &str, body: &Value) -> Result<Value, ConfigApiError> {
        let url = self.collection_url(endpoint);
        tracing::trace!(%url, request = %body, "add request");
        let request = self.request(Method::POST, &url).json(body);
        self.send(request, endpoint).await
    }

    pub async fn get(&self, endpoint: &str, name: &str) -> Result<Value, ConfigApiError> {
        let url = self.object_url(endpoint, name);
        tracing::trace!(%url, "get request");
        let request = self.request(Method::GET, &url);
        self.send(request, &format!("{endpoint}/{name}")).await
    }

    /// Applies a PATCH batch and returns the updated object.
    pub async fn update(
        &self,
        endpoint: &str,
        name: &str,
        operations: &[Operation],
    ) -> Result<Value, ConfigApiError> {
        let url = self.object_url(endpoint, name);
        let body = UpdateRequest { operations };
        tracing::trace!(%url, ?operations, "update request");
        let request = self.request(Method::PATCH, &url).json(&body);
        self.send(request, &format!("{endpoint}/{name}")).await
    }

    pub async fn delete(&self, endpoint: &str, name: &str) -> Result<(), ConfigApiError> {
        let url = self.object_url(endpoint, name);
        tracing::trace!(%url, "delete request");
        let request = self.request(Method::DELETE, &url);
        self.send(request, &format!("{endpoint}/{name}")).await?;
        Ok(())
    }

    /// Lists the objects in a collection, optionally narrowed by a SCIM filter.
    pub async fn list(
        &self,
        endpoint: &str,
        filter: Option<&str>,
    ) -> Result<ListResponse, ConfigApiError> {
        let url = match filter {
            Some(f) => format!(
                "{}?filter={}",
                self.collection_url(endpoint),
                urlencoding::encode(f)
            ),
            None => self.collection_url(endpoint),
        };
        tracing::trace!(%url, "list request");
        let request = self.request(Method::GET, &url);
        let body = self.send(request, endpoint).await?;
        serde_json::from_value(body).map_err(|e| {
            ConfigApiError::invalid_response(format!("Failed to parse list response: {e}"))
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Value, ConfigApiError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::trace!(status = status.as_u16(), response = %text, "config API response");

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text).map_err(|e| {
                ConfigApiError::invalid_response(format!("Failed to parse response: {e}"))
            });
        }

        let message = serde_json::from_str::<ErrorResponse>(&text)
            .ok()
            .and_then(|e| e.detail)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        Err(match status.as_u16() {
            401 => ConfigApiError::Auth { message },
            404 => ConfigApiError::NotFound {
                path: path.to_string(),
            },
            code => ConfigApiError::Api {
                status: code,
                message,
            },
        })
    }
}

impl std::fmt::Debug for ConfigClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
