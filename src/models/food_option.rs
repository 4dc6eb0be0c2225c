use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::food_option_entity as food_options;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FoodOptionResponse {
    pub id: i64,
    pub name: String,
}

impl From<food_options::Model> for FoodOptionResponse {
    fn from(m: food_options::Model) -> Self {
        FoodOptionResponse {
            id: m.id,
            name: m.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateFoodOptionRequest {
    #[schema(example = "Pizza")]
    pub name: String,
}
