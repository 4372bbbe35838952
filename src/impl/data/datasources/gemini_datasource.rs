use std::time::Duration;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::{
    data::models::generate_content_model::{
        ContentRequestModel, GenerateContentRequestModel, GenerateContentResponseModel,
        GenerationConfigModel, InlineDataModel, PartRequestModel,
    },
    entities::Category,
    errors::{AnnotationEmptyResponse, AnnotationRequestFailed, AnnotationStatusError, InvalidJson},
};

#[async_trait]
pub(crate) trait AnnotationDatasource: Send + Sync {
    /// Sends the instructions together with one inline image and returns the
    /// raw JSON text the model produced.
    async fn generate(
        &self,
        instructions: &str,
        mime_type: &str,
        image_base64: &str,
    ) -> Result<String, ServerError>;
}

pub(crate) struct GeminiHttpDatasourceImpl {
    client: Client,
    url: String,
    api_key: String,
}

impl GeminiHttpDatasourceImpl {
    pub(crate) fn new(
        endpoint: &str,
        model: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ServerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnnotationRequestFailed::with_debug("could not build HTTP client", &e))?;
        Ok(Self {
            client,
            url: format!(
                "{}/models/{}:generateContent",
                endpoint.trim_end_matches('/'),
                model
            ),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl AnnotationDatasource for GeminiHttpDatasourceImpl {
    async fn generate(
        &self,
        instructions: &str,
        mime_type: &str,
        image_base64: &str,
    ) -> Result<String, ServerError> {
        let request = GenerateContentRequestModel {
            contents: vec![ContentRequestModel {
                parts: vec![
                    PartRequestModel::Text { text: instructions },
                    PartRequestModel::InlineData {
                        inline_data: InlineDataModel {
                            mime_type,
                            data: image_base64,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfigModel {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };

        debug!(url = %self.url, mime_type, "sending annotation request");
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnnotationRequestFailed::with_debug("transport error", &e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AnnotationRequestFailed::with_debug("could not read response body", &e))?;
        if !status.is_success() {
            return Err(AnnotationStatusError::with_debug(
                status.as_u16(),
                &String::from_utf8_lossy(&body),
            ));
        }

        serde_json::from_slice::<GenerateContentResponseModel>(&body)
            .map_err(|e| InvalidJson::with_debug("GenerateContentResponse", &e))?
            .into_text()
            .ok_or_else(AnnotationEmptyResponse::new)
    }
}

/// Shape the model is asked to answer in. Only `isReadable` is mandatory.
fn response_schema() -> serde_json::Value {
    let categories: Vec<&str> = Category::ALL.iter().map(Category::label).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "isReadable": { "type": "BOOLEAN" },
            "storeName": { "type": "STRING" },
            "date": { "type": "STRING", "description": "YYYY-MM-DD format" },
            "time": { "type": "STRING", "description": "HH:MM format" },
            "total": { "type": "NUMBER" },
            "category": { "type": "STRING", "enum": categories },
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "price": { "type": "NUMBER" },
                        "category": { "type": "STRING", "enum": categories }
                    },
                    "required": ["name", "price", "category"]
                }
            }
        },
        "required": ["isReadable"]
    })
}
