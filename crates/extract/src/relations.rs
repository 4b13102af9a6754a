use gateway::CompletionGateway;

use crate::coerce::coerce_relationship;
use crate::decoder::decode_json_array;
use crate::error::ExtractError;
use crate::prompt;
use crate::schema::{CanonicalEntity, RelationshipRecord};

/// Stage 3: map directed, weighted relationships between canonical entities.
///
/// This stage validates shape only. Whether `source`/`target` actually name
/// canonical entities is checked at graph assembly, so the two concerns stay
/// independently testable.
pub async fn extract_relationships<G: CompletionGateway>(
    gateway: &G,
    text: &str,
    entities: &[CanonicalEntity],
    max_attempts: usize,
) -> Result<Vec<RelationshipRecord>, ExtractError> {
    if entities.is_empty() {
        return Ok(Vec::new());
    }

    let user_prompt = prompt::build_relationship_prompt(text, entities);
    let records = decode_json_array(
        gateway,
        prompt::RELATIONSHIP_SYSTEM_PROMPT,
        &user_prompt,
        max_attempts,
    )
    .await?;

    Ok(records.iter().filter_map(coerce_relationship).collect())
}
