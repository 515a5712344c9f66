//! HTTP implementation of [`OverrideStore`] against the backend's
//! `/v1/permission-overrides` endpoints.

use async_trait::async_trait;
use sekolah_config::BackendConfig;
use sekolah_models::{
    CreateOverrideDto, Override, OverrideId, OverrideListResponse, OverrideTarget,
    UpdateOverrideDto,
};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::ClientError;
use crate::store::OverrideStore;

const OVERRIDES_PATH: &str = "v1/permission-overrides";

#[derive(Debug, Clone)]
pub struct OverrideClient {
    http: reqwest::Client,
    config: BackendConfig,
}

impl OverrideClient {
    pub fn new(config: BackendConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn collection_url(&self) -> String {
        self.config.url(OVERRIDES_PATH)
    }

    fn item_url(&self, id: OverrideId) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Map non-2xx responses to [`ClientError`], preferring the backend's
    /// `error`/`message` field over the raw body.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .or_else(|| v.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or(body);

        Err(match status.as_u16() {
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            code => ClientError::Server {
                status: code,
                message,
            },
        })
    }

    async fn parse_record(resp: reqwest::Response) -> Result<Override, ClientError> {
        let value: Value = resp
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("response body: {}", e)))?;
        let value = match value {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        Ok(Override::from_value(value)?)
    }
}

#[async_trait]
impl OverrideStore for OverrideClient {
    #[instrument(skip(self), fields(override_target = %target))]
    async fn list(&self, target: &OverrideTarget) -> Result<Vec<Override>, ClientError> {
        let req = self
            .http
            .get(self.collection_url())
            .query(&target.filter());
        let resp = Self::check_status(self.authed(req).send().await?).await?;

        let listing: OverrideListResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("override list: {}", e)))?;

        let mut records = Vec::new();
        for raw in listing.into_records() {
            match Override::from_value(raw) {
                Ok(record) if record.target().ok().as_ref() == Some(target) => records.push(record),
                Ok(record) => warn!(
                    override_id = %record.id,
                    "Backend returned override for a different target, ignoring"
                ),
                Err(e) => warn!(error = %e, "Rejected malformed override record"),
            }
        }

        debug!(count = records.len(), "Fetched overrides");
        Ok(records)
    }

    #[instrument(skip(self, dto), fields(resource_key = %dto.resource_key))]
    async fn create(&self, dto: &CreateOverrideDto) -> Result<Override, ClientError> {
        let req = self.http.post(self.collection_url()).json(dto);
        let resp = Self::check_status(self.authed(req).send().await?).await?;
        Self::parse_record(resp).await
    }

    #[instrument(skip(self, dto))]
    async fn update(
        &self,
        id: OverrideId,
        dto: &UpdateOverrideDto,
    ) -> Result<Override, ClientError> {
        let req = self.http.put(self.item_url(id)).json(dto);
        let resp = Self::check_status(self.authed(req).send().await?).await?;
        Self::parse_record(resp).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: OverrideId) -> Result<(), ClientError> {
        let req = self.http.delete(self.item_url(id));
        Self::check_status(self.authed(req).send().await?).await?;
        Ok(())
    }
}
