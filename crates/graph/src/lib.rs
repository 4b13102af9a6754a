pub mod assembler;
pub mod export;

pub use assembler::{assemble, EdgeAttrs, EntityGraph, NodeAttrs};
pub use export::{GraphData, GraphEdge, GraphNode};
