use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The only entity categories the extraction prompts permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Organization,
    State,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Organization => "organization",
            EntityType::State => "state",
        }
    }
}

impl FromStr for EntityType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "person" => Ok(EntityType::Person),
            "organization" => Ok(EntityType::Organization),
            "state" => Ok(EntityType::State),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw entity mention as first extracted from text, before alias merging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityCandidate {
    pub name: String,
    pub entity_type: EntityType,
    pub importance: f64,
}

/// Deduplicated entity after alias merging. `members` carries every surface
/// form folded into this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalEntity {
    pub canonical_name: String,
    pub types: Vec<EntityType>,
    pub importance: f64,
    pub members: Vec<String>,
}

/// Directed, weighted edge between two canonical entities. `source` and
/// `target` are canonical names; whether they exist is checked at graph
/// assembly, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub source: String,
    pub target: String,
    pub relationship: String,
    pub weight: f64,
}
