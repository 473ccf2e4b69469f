use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AllocatedIdentifier {
    #[schema(example = "student")]
    pub entity_type: String,
    #[schema(example = "EST-001")]
    pub identifier: String,
}
