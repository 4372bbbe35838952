use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use fractic_server_error::ServerError;
use iso_currency::Currency;
use tracing::debug;

use crate::{
    data::{
        datasources::gemini_datasource::{AnnotationDatasource, GeminiHttpDatasourceImpl},
        models::extraction_model::ExtractionModel,
    },
    domain::repositories::annotation_repository::AnnotationRepository,
    entities::{Category, ExtractionResult},
    errors::{InvalidJson, MissingApiKey},
};

pub(crate) struct AnnotationRepositoryImpl<DS: AnnotationDatasource = GeminiHttpDatasourceImpl> {
    datasource: DS,
    instructions: String,
}

#[async_trait]
impl<DS: AnnotationDatasource> AnnotationRepository for AnnotationRepositoryImpl<DS> {
    async fn analyze(&self, image_data: &[u8]) -> Result<ExtractionResult, ServerError> {
        let mime_type = sniff_mime_type(image_data);
        debug!(bytes = image_data.len(), mime_type, "analyzing receipt image");
        let text = self
            .datasource
            .generate(&self.instructions, mime_type, &STANDARD.encode(image_data))
            .await?;
        let model: ExtractionModel = serde_json::from_str(strip_code_fence(&text))
            .map_err(|e| InvalidJson::with_debug("ExtractionResult", &e))?;
        Ok(model.into())
    }
}

impl AnnotationRepositoryImpl<GeminiHttpDatasourceImpl> {
    pub(crate) fn new(
        endpoint: &str,
        model: &str,
        api_key: impl Into<String>,
        timeout: Duration,
        reporting_currency: Currency,
    ) -> Result<Self, ServerError> {
        Ok(Self::with_datasource(
            GeminiHttpDatasourceImpl::new(endpoint, model, api_key, timeout)?,
            reporting_currency,
        ))
    }
}

impl<DS: AnnotationDatasource> AnnotationRepositoryImpl<DS> {
    pub(crate) fn with_datasource(datasource: DS, reporting_currency: Currency) -> Self {
        Self {
            datasource,
            instructions: build_instructions(reporting_currency),
        }
    }
}

/// Stands in for the service when no API key is configured. Every call
/// fails, which leaves images unprocessed and available for retry.
pub(crate) struct UnconfiguredAnnotationRepository {
    api_key_env: String,
}

impl UnconfiguredAnnotationRepository {
    pub(crate) fn new(api_key_env: impl Into<String>) -> Self {
        Self {
            api_key_env: api_key_env.into(),
        }
    }
}

#[async_trait]
impl AnnotationRepository for UnconfiguredAnnotationRepository {
    async fn analyze(&self, _image_data: &[u8]) -> Result<ExtractionResult, ServerError> {
        Err(MissingApiKey::new(&self.api_key_env))
    }
}

fn build_instructions(currency: Currency) -> String {
    let categories = Category::ALL
        .iter()
        .map(Category::label)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "You are reading a photo of a shopping receipt. The receipt may be in any \
         language; write every text field in English.\n\
         Extract the store name, the purchase date as YYYY-MM-DD, the purchase time as \
         HH:MM (24-hour), every line item with its name and price, and the receipt total.\n\
         Express all amounts in {name} ({code}); convert them if the receipt uses another \
         currency.\n\
         Assign each item one category from: {categories}. Also give the receipt a single \
         overall category, the one most of the spending falls into. Use Other when \
         nothing fits.\n\
         If the image is not a receipt or is too blurry to read, set isReadable to false \
         and leave the other fields out.",
        name = currency.name(),
        code = currency.code(),
    )
}

/// Guesses the image type from its magic bytes. Defaults to JPEG.
fn sniff_mime_type(data: &[u8]) -> &'static str {
    match data {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    }
}

/// Models occasionally wrap JSON in a markdown fence despite the requested
/// response type.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
