//! `reqwest`-backed access to the storefront API.

use reqwest::multipart::{Form, Part};
use reqwest::{IntoUrl, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use storefront_catalog::{Category, ProductDetail, parse_categories};
use storefront_core::ProductId;
use storefront_forms::{Attachment, JobApplication, ReclamationPayload};
use storefront_session::{AuthBackend, AuthError, LoginRequest, SessionUser};

use crate::config::ClientConfig;
use crate::error::ClientError;

#[derive(Debug, Clone)]
pub struct StorefrontClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl StorefrontClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET /api/categories`.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ClientError> {
        let payload: Value = self.get_json(self.config.url("/api/categories")).await?;
        parse_categories(payload).map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// `GET /api/products`, unparsed; the catalog view validates the shape.
    pub async fn fetch_products(&self) -> Result<Value, ClientError> {
        self.get_json(self.config.url("/api/products")).await
    }

    /// `GET /api/products/{id}`.
    pub async fn fetch_product(&self, id: &ProductId) -> Result<ProductDetail, ClientError> {
        self.get_json(self.product_url(id)?).await
    }

    /// The detail URL for `id`, with the id percent-encoded as one path segment.
    pub(crate) fn product_url(&self, id: &ProductId) -> Result<Url, ClientError> {
        let base = self.config.url("/api/products");
        let mut url =
            Url::parse(&base).map_err(|e| ClientError::Parse(format!("invalid API URL {base:?}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Parse(format!("API URL {base:?} cannot take a path")))?
            .push(&id.to_string());
        Ok(url)
    }

    /// `POST /api/reclamations` as multipart: a JSON `data` part plus one
    /// `photos` part per attachment. Returns the stored record.
    pub async fn submit_reclamation(
        &self,
        payload: &ReclamationPayload,
        photos: &[Attachment],
    ) -> Result<Value, ClientError> {
        let data = serde_json::to_string(payload).map_err(|e| ClientError::Parse(e.to_string()))?;
        let mut form = Form::new().part("data", Part::text(data).mime_str("application/json")?);
        for photo in photos {
            form = form.part("photos", file_part(photo)?);
        }

        let resp = self
            .send(self.http.post(self.config.url("/api/reclamations")).multipart(form))
            .await?;
        tracing::info!(order = %payload.order_number, photos = photos.len(), "reclamation submitted");
        Ok(resp.json().await?)
    }

    /// `POST /api/applications` as multipart text fields plus `resume`.
    /// Returns the API's confirmation text.
    pub async fn submit_application(
        &self,
        application: &JobApplication,
    ) -> Result<String, ClientError> {
        let mut form = Form::new();
        for (name, value) in application.text_fields() {
            form = form.text(name, value);
        }
        form = form.part("resume", file_part(&application.resume)?);

        let resp = self
            .send(self.http.post(self.config.url("/api/applications")).multipart(form))
            .await?;
        tracing::info!(position = %application.position, "application submitted");
        Ok(resp.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: impl IntoUrl) -> Result<T, ClientError> {
        let resp = self.send(self.http.get(url)).await?;
        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Send and turn any non-success status into [`ClientError::Api`].
    async fn send(&self, req: RequestBuilder) -> Result<Response, ClientError> {
        let resp = req.send().await.map_err(|e| ClientError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), %body, "API returned an error");
            return Err(ClientError::Api(status.as_u16(), body));
        }
        Ok(resp)
    }
}

fn file_part(file: &Attachment) -> Result<Part, ClientError> {
    Ok(Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.content_type)?)
}

#[async_trait::async_trait]
impl AuthBackend for StorefrontClient {
    async fn current_user(&self) -> Result<SessionUser, AuthError> {
        Ok(self.get_json(self.config.url("/api/auth/me")).await?)
    }

    async fn login(&self, request: &LoginRequest) -> Result<SessionUser, AuthError> {
        let resp = self
            .send(self.http.post(self.config.url("/api/auth/login")).json(request))
            .await?;
        let body = resp.bytes().await.map_err(ClientError::from)?;
        serde_json::from_slice(&body).map_err(|e| AuthError::Malformed(e.to_string()))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.send(self.http.post(self.config.url("/api/auth/logout")))
            .await?;
        Ok(())
    }
}
