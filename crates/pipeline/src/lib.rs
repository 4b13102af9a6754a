use gateway::CompletionGateway;
use graph::EntityGraph;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input text is empty")]
    EmptyInput,

    #[error(transparent)]
    Extract(#[from] extract::ExtractError),
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Total gateway attempts per decode operation (original call + retries).
    pub max_decode_attempts: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_decode_attempts: extract::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Runs the full text -> entities -> canonical entities -> relationships ->
/// graph sequence. Stages never overlap within one run: each stage's prompt
/// is built from the previous stage's validated output.
pub struct Pipeline<G> {
    gateway: G,
    options: PipelineOptions,
}

impl<G: CompletionGateway> Pipeline<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_options(gateway, PipelineOptions::default())
    }

    pub fn with_options(gateway: G, options: PipelineOptions) -> Self {
        Self { gateway, options }
    }

    /// Extract a knowledge graph from one document. A stage-level failure
    /// aborts the run; no partial graph is emitted.
    pub async fn run(&self, text: &str) -> Result<EntityGraph, PipelineError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        let attempts = self.options.max_decode_attempts;

        info!("extracting entity candidates");
        let candidates = extract::extract_entities(&self.gateway, text, attempts).await?;
        info!(candidates = candidates.len(), "canonicalizing entities");

        let entities = extract::canonicalize(&self.gateway, text, &candidates, attempts).await?;
        info!(entities = entities.len(), "extracting relationships");

        let relationships =
            extract::extract_relationships(&self.gateway, text, &entities, attempts).await?;

        let graph = graph::assemble(&entities, &relationships);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph assembled"
        );

        Ok(graph)
    }
}
