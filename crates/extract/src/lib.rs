pub mod canonical;
pub mod coerce;
pub mod decoder;
pub mod entities;
pub mod error;
pub mod prompt;
pub mod relations;
pub mod schema;

pub use canonical::canonicalize;
pub use decoder::{decode_json_array, DEFAULT_MAX_ATTEMPTS};
pub use entities::extract_entities;
pub use error::ExtractError;
pub use relations::extract_relationships;
pub use schema::{CanonicalEntity, EntityCandidate, EntityType, RelationshipRecord};
