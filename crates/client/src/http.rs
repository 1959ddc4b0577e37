//! HTTP API client for the `/places` routes.

use serde::de::DeserializeOwned;

use placemark_core::types::DbId;

use crate::error::ClientError;
use crate::model::{Place, PlaceDraft};

/// Thin reqwest wrapper over the places resource.
pub struct PlacesApi {
    base_url: String,
    client: reqwest::Client,
}

impl PlacesApi {
    /// Create a client for a server base URL, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn list_places(&self) -> Result<Vec<Place>, ClientError> {
        let response = self
            .client
            .get(format!("{}/places", self.base_url))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn get_place(&self, id: DbId) -> Result<Place, ClientError> {
        let response = self
            .client
            .get(format!("{}/places/{id}", self.base_url))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn create_place(&self, draft: &PlaceDraft) -> Result<Place, ClientError> {
        let response = self
            .client
            .post(format!("{}/places", self.base_url))
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update_place(&self, id: DbId, draft: &PlaceDraft) -> Result<Place, ClientError> {
        let response = self
            .client
            .put(format!("{}/places/{id}", self.base_url))
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    /// Delete a place; returns the removed place from the server's
    /// `deletedPlace` envelope field.
    pub async fn delete_place(&self, id: DbId) -> Result<Place, ClientError> {
        let response = self
            .client
            .delete(format!("{}/places/{id}", self.base_url))
            .send()
            .await?;
        let envelope: serde_json::Value = decode(response).await?;
        Ok(serde_json::from_value(envelope["deletedPlace"].clone())?)
    }
}

/// Decode a response body, mapping non-success statuses onto the error
/// taxonomy: 400 `{errors: [..]}` becomes [`ClientError::Validation`],
/// everything else non-2xx becomes [`ClientError::Api`].
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body: serde_json::Value = response
        .json()
        .await
        .unwrap_or(serde_json::Value::Null);

    if let Some(errors) = body.get("errors").and_then(serde_json::Value::as_array) {
        return Err(ClientError::Validation(
            errors
                .iter()
                .filter_map(|e| e.as_str().map(str::to_string))
                .collect(),
        ));
    }

    let message = body
        .get("error")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("An unexpected error occurred")
        .to_string();

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
