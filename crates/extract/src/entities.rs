use gateway::CompletionGateway;
use std::collections::HashSet;
use tracing::debug;

use crate::coerce::coerce_entity;
use crate::decoder::decode_json_array;
use crate::error::ExtractError;
use crate::prompt;
use crate::schema::EntityCandidate;

/// Stage 1: pull raw entity candidates out of the document.
///
/// Output order follows the order entities first appear in the decoded
/// response; duplicates on (lowercased name, type) keep their first
/// occurrence.
pub async fn extract_entities<G: CompletionGateway>(
    gateway: &G,
    text: &str,
    max_attempts: usize,
) -> Result<Vec<EntityCandidate>, ExtractError> {
    let user_prompt = prompt::build_entity_prompt(text);
    let records = decode_json_array(
        gateway,
        prompt::ENTITY_SYSTEM_PROMPT,
        &user_prompt,
        max_attempts,
    )
    .await?;

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for record in &records {
        let Some(candidate) = coerce_entity(record) else {
            continue;
        };

        let key = (candidate.name.to_lowercase(), candidate.entity_type);
        if !seen.insert(key) {
            debug!(name = %candidate.name, "dropping duplicate entity candidate");
            continue;
        }

        candidates.push(candidate);
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityType;
    use crate::testing::ScriptedGateway;

    #[tokio::test]
    async fn test_dedup_is_case_insensitive_first_wins() {
        let gateway = ScriptedGateway::new(vec![
            r#"[
                {"name": "Alice", "entity_type": "person", "importance": 0.9},
                {"name": "alice", "entity_type": "Person", "importance": 0.2},
                {"name": "Alice", "entity_type": "organization", "importance": 0.4}
            ]"#,
        ]);

        let candidates = extract_entities(&gateway, "text", 2).await.unwrap();

        // The person duplicate collapses; the organization reading survives
        // because the dedup key includes the type.
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "Alice");
        assert_eq!(candidates[0].entity_type, EntityType::Person);
        assert_eq!(candidates[0].importance, 0.9);
        assert_eq!(candidates[1].entity_type, EntityType::Organization);
    }

    #[tokio::test]
    async fn test_order_follows_decoded_response() {
        let gateway = ScriptedGateway::new(vec![
            r#"[
                {"name": "Acme Corp", "entity_type": "organization", "importance": 0.8},
                {"name": "France", "entity_type": "state", "importance": 0.3},
                {"name": "Alice", "entity_type": "person", "importance": 0.9}
            ]"#,
        ]);

        let candidates = extract_entities(&gateway, "text", 2).await.unwrap();

        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Acme Corp", "France", "Alice"]);
    }

    #[tokio::test]
    async fn test_partial_records_are_salvaged_not_fatal() {
        let gateway = ScriptedGateway::new(vec![
            r#"[
                {"name": "", "entity_type": "person"},
                {"name": "NATO", "entity_type": "alliance"},
                {"name": "Alice", "entity_type": "person", "importance": "not a number"}
            ]"#,
        ]);

        let candidates = extract_entities(&gateway, "text", 2).await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Alice");
        assert_eq!(candidates[0].importance, 0.5);
    }
}
