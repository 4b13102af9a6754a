use serde::Serialize;

use crate::assembler::EntityGraph;

/// Flat, serializable projection of an assembled graph. This is the handoff
/// format the rendering collaborator consumes; nothing downstream mutates
/// the graph through it.
#[derive(Debug, Clone, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub name: String,
    pub types: Vec<String>,
    pub importance: f64,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relationship: String,
    pub weight: f64,
}

impl From<&EntityGraph> for GraphData {
    fn from(graph: &EntityGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| GraphNode {
                name: node.name.clone(),
                types: node.types.iter().map(|t| t.to_string()).collect(),
                importance: node.importance,
                members: node.members.clone(),
            })
            .collect();

        let edges = graph
            .edges()
            .map(|(source, target, attrs)| GraphEdge {
                source: source.to_string(),
                target: target.to_string(),
                relationship: attrs.relationship.clone(),
                weight: attrs.weight,
            })
            .collect();

        Self { nodes, edges }
    }
}
