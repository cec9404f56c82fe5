use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned for every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Missing required fields: fullName, email")]
    pub error: String,
}
