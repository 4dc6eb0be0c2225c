use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateScriptsRequest {
    #[schema(example = "Rodízio pela metade do preço")]
    pub promotion: String,
    #[schema(example = "Pizza")]
    pub product_type: String,
}

/// 三种语气的营销文案
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RemarketingScripts {
    pub persuasive: String,
    pub playful: String,
    pub neutral: String,
}
