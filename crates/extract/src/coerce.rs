use serde_json::{Map, Value};
use tracing::debug;

use crate::schema::{CanonicalEntity, EntityCandidate, EntityType, RelationshipRecord};

// Model output is advisory, not authoritative: salvage what clamps cleanly,
// drop the rest. Each function here validates exactly one record shape and
// knows nothing about prompts, retries, or the gateway.

pub fn coerce_entity(raw: &Map<String, Value>) -> Option<EntityCandidate> {
    let name = trimmed_string(raw.get("name"))?;

    let type_label = trimmed_string(raw.get("entity_type"))
        .or_else(|| trimmed_string(raw.get("type")))
        .unwrap_or_default();
    let entity_type = match type_label.parse::<EntityType>() {
        Ok(entity_type) => entity_type,
        Err(()) => {
            debug!(name = %name, label = %type_label, "dropping entity with unrecognized type");
            return None;
        }
    };

    Some(EntityCandidate {
        name,
        entity_type,
        importance: unit_interval(raw.get("importance"), 0.5),
    })
}

pub fn coerce_canonical(raw: &Map<String, Value>) -> Option<CanonicalEntity> {
    let canonical_name = trimmed_string(raw.get("canonical_name"))?;

    let mut types = Vec::new();
    if let Some(Value::Array(labels)) = raw.get("types") {
        for label in labels {
            if let Some(label) = label.as_str() {
                if let Ok(entity_type) = label.parse::<EntityType>() {
                    if !types.contains(&entity_type) {
                        types.push(entity_type);
                    }
                }
            }
        }
    }
    if types.is_empty() {
        // Caller decides how loudly to report this; the record is unusable.
        return None;
    }

    let mut members = Vec::new();
    if let Some(Value::Array(aliases)) = raw.get("members") {
        for alias in aliases {
            if let Some(alias) = trimmed_string(Some(alias)) {
                if !members.contains(&alias) {
                    members.push(alias);
                }
            }
        }
    }

    Some(CanonicalEntity {
        canonical_name,
        types,
        importance: unit_interval(raw.get("importance"), 0.5),
        members,
    })
}

pub fn coerce_relationship(raw: &Map<String, Value>) -> Option<RelationshipRecord> {
    let source = trimmed_string(raw.get("source"))?;
    let target = trimmed_string(raw.get("target"))?;
    let relationship = trimmed_string(raw.get("relationship"))
        .or_else(|| trimmed_string(raw.get("relation_type")))?
        .to_lowercase();

    Some(RelationshipRecord {
        source,
        target,
        relationship,
        weight: unit_interval(raw.get("weight"), 0.5),
    })
}

fn trimmed_string(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Clamp into [0,1]. Numeric strings count as numbers; anything else falls
/// back to the default.
fn unit_interval(value: Option<&Value>, default: f64) -> f64 {
    let number = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(number) if number.is_finite() => number.clamp(0.0, 1.0),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(raw: serde_json::Value) -> Map<String, Value> {
        match raw {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_importance_clamps_regardless_of_raw_value() {
        let cases = [
            (serde_json::json!({"name": "A", "type": "person", "importance": 1.7}), 1.0),
            (serde_json::json!({"name": "A", "type": "person", "importance": -0.3}), 0.0),
            (serde_json::json!({"name": "A", "type": "person", "importance": "0.25"}), 0.25),
            (serde_json::json!({"name": "A", "type": "person", "importance": "high"}), 0.5),
            (serde_json::json!({"name": "A", "type": "person"}), 0.5),
            (serde_json::json!({"name": "A", "type": "person", "importance": null}), 0.5),
        ];

        for (raw, expected) in cases {
            let entity = coerce_entity(&record(raw)).unwrap();
            assert_eq!(entity.importance, expected);
        }
    }

    #[test]
    fn test_entity_requires_a_name() {
        assert!(coerce_entity(&record(serde_json::json!({"type": "person"}))).is_none());
        assert!(coerce_entity(&record(serde_json::json!({"name": "   ", "type": "person"}))).is_none());
    }

    #[test]
    fn test_entity_rejects_unknown_type() {
        let raw = record(serde_json::json!({"name": "Berlin", "type": "city"}));
        assert!(coerce_entity(&raw).is_none());
    }

    #[test]
    fn test_entity_accepts_both_type_keys() {
        let raw = record(serde_json::json!({"name": "Alice", "entity_type": "Person"}));
        assert_eq!(coerce_entity(&raw).unwrap().entity_type, EntityType::Person);
    }

    #[test]
    fn test_canonical_needs_one_valid_type() {
        let raw = record(serde_json::json!({
            "canonical_name": "Acme",
            "types": ["conglomerate", "brand"],
            "importance": 0.8,
            "members": ["Acme"]
        }));
        assert!(coerce_canonical(&raw).is_none());
    }

    #[test]
    fn test_canonical_filters_and_dedupes_types_and_members() {
        let raw = record(serde_json::json!({
            "canonical_name": "Russia",
            "types": ["state", "STATE", "planet", "person"],
            "importance": 2.0,
            "members": ["Russia", "Kremlin", " Kremlin ", "Kremlin", ""]
        }));

        let entity = coerce_canonical(&raw).unwrap();
        assert_eq!(entity.types, vec![EntityType::State, EntityType::Person]);
        assert_eq!(entity.importance, 1.0);
        assert_eq!(entity.members, vec!["Russia", "Kremlin"]);
    }

    #[test]
    fn test_relationship_requires_all_three_strings() {
        assert!(coerce_relationship(&record(serde_json::json!({
            "source": "A", "target": "B", "relationship": "  "
        })))
        .is_none());
        assert!(coerce_relationship(&record(serde_json::json!({
            "source": "A", "relationship": "knows"
        })))
        .is_none());
    }

    #[test]
    fn test_relationship_lowercases_label_and_defaults_weight() {
        let raw = record(serde_json::json!({
            "source": "Alice",
            "target": "Acme Corp",
            "relationship": "Founded",
        }));

        let relationship = coerce_relationship(&raw).unwrap();
        assert_eq!(relationship.relationship, "founded");
        assert_eq!(relationship.weight, 0.5);
    }

    #[test]
    fn test_relationship_accepts_legacy_label_key() {
        let raw = record(serde_json::json!({
            "source": "A", "target": "B", "relation_type": "allied with", "weight": 0.9
        }));
        assert_eq!(coerce_relationship(&raw).unwrap().relationship, "allied with");
    }
}
