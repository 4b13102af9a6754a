use extract::{CanonicalEntity, EntityType, RelationshipRecord};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct NodeAttrs {
    pub name: String,
    pub types: Vec<EntityType>,
    pub importance: f64,
    pub members: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EdgeAttrs {
    pub relationship: String,
    pub weight: f64,
}

/// Directed graph over canonical entities, read-only once assembled.
/// At most one edge exists per ordered (source, target) pair.
pub struct EntityGraph {
    graph: DiGraph<NodeAttrs, EdgeAttrs>,
    indices: HashMap<String, NodeIndex>,
}

impl EntityGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&NodeAttrs> {
        let index = self.indices.get(name)?;
        self.graph.node_weight(*index)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&EdgeAttrs> {
        let source = *self.indices.get(source)?;
        let target = *self.indices.get(target)?;
        let edge = self.graph.find_edge(source, target)?;
        self.graph.edge_weight(edge)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeAttrs> {
        self.graph.node_weights()
    }

    /// Edges as (source name, target name, attributes).
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeAttrs)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].name.as_str(),
                self.graph[edge.target()].name.as_str(),
                edge.weight(),
            )
        })
    }
}

/// Build the final graph: one node per canonical entity, one edge per
/// relationship whose endpoints both exist. Records referencing unknown
/// endpoints are dropped here rather than resurrecting pruned entities as
/// dangling nodes. When several admissible records share an ordered pair,
/// the later one overwrites the earlier.
pub fn assemble(entities: &[CanonicalEntity], relationships: &[RelationshipRecord]) -> EntityGraph {
    let mut graph = DiGraph::new();
    let mut indices = HashMap::new();

    for entity in entities {
        if indices.contains_key(&entity.canonical_name) {
            continue;
        }
        let index = graph.add_node(NodeAttrs {
            name: entity.canonical_name.clone(),
            types: entity.types.clone(),
            importance: entity.importance,
            members: entity.members.clone(),
        });
        indices.insert(entity.canonical_name.clone(), index);
    }

    let mut dropped = 0usize;
    for record in relationships {
        let (Some(&source), Some(&target)) =
            (indices.get(&record.source), indices.get(&record.target))
        else {
            dropped += 1;
            continue;
        };

        graph.update_edge(
            source,
            target,
            EdgeAttrs {
                relationship: record.relationship.clone(),
                weight: record.weight,
            },
        );
    }

    if dropped > 0 {
        debug!(dropped, "discarded relationships with unknown endpoints");
    }

    EntityGraph { graph, indices }
}
