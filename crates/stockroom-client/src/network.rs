//! # Network Strategy
//!
//! Talks to the HTTP API with reqwest.
//!
//! ## Status Handling
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  reads  (GET categories / products)                              │
//! │    2xx      → decoded envelope                                   │
//! │    non-2xx  → Err(Network)        → caller falls back            │
//! │                                                                  │
//! │  writes (POST / PUT / DELETE, upload)                            │
//! │    any status with a JSON envelope → Ok(envelope), even          │
//! │    {success:false}: the server answered, nothing to fall back on │
//! │    transport failure / non-JSON body → Err                       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use stockroom_core::{
    AckEnvelope, CategoriesEnvelope, CreatedEnvelope, ProductDraft, ProductQuery, ProductUpdate,
    ProductsEnvelope, UploadEnvelope, API_PREFIX,
};
use tracing::debug;

use crate::api::{ImageUpload, InventoryApi};
use crate::error::{ClientError, ClientResult};

/// Network strategy settings.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Server origin, e.g. `http://localhost:5000`.
    pub base_url: String,

    /// Per-request timeout.
    /// Default: 10 seconds
    pub timeout: Duration,
}

impl NetworkConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        NetworkConfig {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`InventoryApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct NetworkApi {
    client: Client,
    base_url: Url,
}

#[derive(Serialize)]
struct DeleteImageBody<'a> {
    #[serde(rename = "imageUrl")]
    image_url: &'a str,
}

impl NetworkApi {
    pub fn new(config: NetworkConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("stockroom-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(NetworkApi { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: &str) -> ClientResult<Url> {
        self.base_url
            .join(&format!("{API_PREFIX}/{resource}"))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    /// Reads fail on any non-2xx status.
    async fn read<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Network(format!("HTTP {status}")));
        }
        Ok(response.json().await?)
    }

    /// Writes pass the server's envelope through whatever the status.
    async fn write<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        debug!(status = %response.status(), "Write answered");
        Ok(response.json().await?)
    }
}

#[async_trait]
impl InventoryApi for NetworkApi {
    async fn get_categories(&self) -> ClientResult<CategoriesEnvelope> {
        let url = self.endpoint("categories")?;
        self.read(self.client.get(url)).await
    }

    async fn get_products(&self, query: &ProductQuery) -> ClientResult<ProductsEnvelope> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(term) = &query.search {
            params.push(("search", term.clone()));
        }
        if let Some(category) = query.category.as_param() {
            params.push(("category", category));
        }

        let url = self.endpoint("products")?;
        self.read(self.client.get(url).query(&params)).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> ClientResult<CreatedEnvelope> {
        let url = self.endpoint("products")?;
        self.write(self.client.post(url).json(draft)).await
    }

    async fn update_product(&self, update: &ProductUpdate) -> ClientResult<AckEnvelope> {
        let url = self.endpoint("products")?;
        self.write(self.client.put(url).json(update)).await
    }

    async fn delete_product(&self, id: i64) -> ClientResult<AckEnvelope> {
        let url = self.endpoint("products")?;
        self.write(self.client.delete(url).query(&[("id", id)])).await
    }

    async fn upload_image(&self, upload: &ImageUpload) -> ClientResult<UploadEnvelope> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)?;
        let form = Form::new().part("image", part);

        let url = self.endpoint("upload")?;
        self.write(self.client.post(url).multipart(form)).await
    }

    async fn delete_image(&self, image_url: &str) -> ClientResult<AckEnvelope> {
        let url = self.endpoint("upload")?;
        let body = DeleteImageBody { image_url };
        self.write(self.client.delete(url).json(&body)).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api(server: &MockServer) -> NetworkApi {
        NetworkApi::new(NetworkConfig::new(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_get_products_sends_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("search", "vis"))
            .and(query_param("category", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "products": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = api(&server)
            .get_products(&ProductQuery::new(Some("vis"), "4"))
            .await
            .unwrap();
        assert!(envelope.success);
    }

    #[tokio::test]
    async fn test_read_non_2xx_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "success": false,
                "error": "database is locked"
            })))
            .mount(&server)
            .await;

        let err = api(&server).get_categories().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_write_failure_envelope_passes_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "success": false,
                "error": "NOT NULL constraint failed: products.name"
            })))
            .mount(&server)
            .await;

        let draft: ProductDraft =
            serde_json::from_value(json!({"name": "", "purchase_price": 1, "selling_price": 2})).unwrap();
        let envelope = api(&server).create_product(&draft).await.unwrap();
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().contains("NOT NULL"));
    }

    #[tokio::test]
    async fn test_write_with_non_json_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = api(&server).delete_product(3).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_delete_image_sends_camel_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/upload"))
            .and(body_json(json!({"imageUrl": "/uploads/a.png"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = api(&server).delete_image("/uploads/a.png").await.unwrap();
        assert!(envelope.success);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let network = NetworkApi::new(
            NetworkConfig::new("http://127.0.0.1:9").timeout(Duration::from_millis(500)),
        )
        .unwrap();
        let err = network.get_categories().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = NetworkApi::new(NetworkConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }
}
