use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::ExtractionResult;

/// External service that turns a receipt photo into structured data.
///
/// One call is one request/response exchange for one image; implementations
/// do not retry.
#[async_trait]
pub trait AnnotationRepository: Send + Sync {
    async fn analyze(&self, image_data: &[u8]) -> Result<ExtractionResult, ServerError>;
}
