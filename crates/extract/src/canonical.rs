use gateway::CompletionGateway;
use std::collections::HashSet;
use tracing::warn;

use crate::coerce::coerce_canonical;
use crate::decoder::decode_json_array;
use crate::error::ExtractError;
use crate::prompt;
use crate::schema::{CanonicalEntity, EntityCandidate};

/// Stage 2: ask the model to cluster candidate surface forms that denote the
/// same real-world actor. This stage is structural only: it validates and
/// normalizes what the model returns, it never does its own synonym
/// detection.
pub async fn canonicalize<G: CompletionGateway>(
    gateway: &G,
    text: &str,
    candidates: &[EntityCandidate],
    max_attempts: usize,
) -> Result<Vec<CanonicalEntity>, ExtractError> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let user_prompt = prompt::build_canonical_prompt(text, candidates);
    let records = decode_json_array(
        gateway,
        prompt::CANONICAL_SYSTEM_PROMPT,
        &user_prompt,
        max_attempts,
    )
    .await?;

    let candidate_names: HashSet<&str> =
        candidates.iter().map(|candidate| candidate.name.as_str()).collect();

    let mut seen = HashSet::new();
    let mut entities = Vec::new();

    for record in &records {
        let Some(mut entity) = coerce_canonical(record) else {
            let label = record
                .get("canonical_name")
                .and_then(|value| value.as_str())
                .unwrap_or("<unnamed>");
            warn!(cluster = %label, "dropping cluster with no usable name or types");
            continue;
        };

        if !seen.insert(entity.canonical_name.to_lowercase()) {
            warn!(name = %entity.canonical_name, "dropping duplicate canonical entity");
            continue;
        }

        // A canonical name that came straight from a candidate is itself a
        // surface form and belongs in the member list.
        if candidate_names.contains(entity.canonical_name.as_str())
            && !entity.members.contains(&entity.canonical_name)
        {
            entity.members.insert(0, entity.canonical_name.clone());
        }

        entities.push(entity);
    }

    Ok(entities)
}
