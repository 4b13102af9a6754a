use crate::schema::{CanonicalEntity, EntityCandidate};

pub const ENTITY_SYSTEM_PROMPT: &str = "You are an information extraction assistant focused on geopolitical text. \
     Extract entities from text. Return ONLY valid JSON. No prose.";

pub const CANONICAL_SYSTEM_PROMPT: &str = "You collapse duplicate entities so that graph analytics work on canonical nodes. \
     Two entries describe the same canonical entity if one is a synonym, alias, or \
     obvious reference for the other in context. In geopolitical framing a head of \
     state and the state they govern may denote one actor (e.g. Vladimir Putin and \
     Russia). Return ONLY valid JSON. No prose.";

pub const RELATIONSHIP_SYSTEM_PROMPT: &str = "You map directed relationships between previously defined canonical entities. \
     Only include relationships the text states or clearly implies. Return ONLY \
     valid JSON. No prose.";

pub fn build_entity_prompt(text: &str) -> String {
    format!(
        r#"Given the following text, list key entities as a JSON array of objects with
`name`, `entity_type`, and `importance` (float 0-1). `entity_type` must be one
of "person", "organization", or "state" (lowercase); use no other types.
Importance measures how much the document focuses on that entity. Never invent
entities not mentioned in the text, and return them in the order they matter
to the document.

Text:
{text}

JSON array:"#
    )
}

pub fn build_canonical_prompt(text: &str, candidates: &[EntityCandidate]) -> String {
    let candidate_json =
        serde_json::to_string(candidates).expect("entity candidates serialize to JSON");

    format!(
        r#"Using the original text and the candidate entity list, cluster names that
refer to the same underlying real-world actor. Output a JSON array of objects
with `canonical_name`, `types` (array of "person"/"organization"/"state"),
`importance` (float 0-1, inherit the max or average of the merged members),
and `members` (every alias you merged, including the canonical name itself).

Text:
{text}

Candidates:
{candidate_json}

JSON array:"#
    )
}

pub fn build_relationship_prompt(text: &str, entities: &[CanonicalEntity]) -> String {
    let names: Vec<&str> = entities
        .iter()
        .map(|entity| entity.canonical_name.as_str())
        .collect();
    let name_json = serde_json::to_string(&names).expect("canonical names serialize to JSON");

    format!(
        r#"Using the original text and the list of canonical entity names, output a JSON
array of relationship objects. Each object must contain `source`, `target`,
`relationship` (short lowercase label), and `weight` (float 0-1 scaled by how
central the relationship is). `source` and `target` must be verbatim matches
of names from the list, directed actor -> recipient. Only include
relationships explicitly supported by the text.

Text:
{text}

Canonical entities:
{name_json}

JSON array:"#
    )
}
