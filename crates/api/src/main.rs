mod config;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use gateway::ChatClient;
use graph::GraphData;
use pipeline::{Pipeline, PipelineError, PipelineOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::AppConfig;

#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline<ChatClient>>,
    model: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    model: String,
}

#[derive(Deserialize)]
struct GraphRequest {
    text: String,
}

#[derive(Serialize)]
struct GraphResponse {
    nodes: usize,
    edges: usize,
    graph: GraphData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let mut config = AppConfig::default();
    if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
        config.gateway.api_key = api_key;
    }

    let client = ChatClient::new(config.gateway.clone());
    let model = client.model().to_string();
    let pipeline = Pipeline::with_options(
        client,
        PipelineOptions {
            max_decode_attempts: config.max_decode_attempts,
        },
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
        model,
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/graph", post(build_graph))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.model.clone(),
    })
}

async fn build_graph(
    State(state): State<AppState>,
    Json(req): Json<GraphRequest>,
) -> Result<Json<GraphResponse>, (StatusCode, String)> {
    let graph = state.pipeline.run(&req.text).await.map_err(|error| {
        let status = match &error {
            PipelineError::EmptyInput => StatusCode::BAD_REQUEST,
            PipelineError::Extract(_) => StatusCode::BAD_GATEWAY,
        };
        tracing::error!(%error, "graph extraction failed");
        (status, error.to_string())
    })?;

    Ok(Json(GraphResponse {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        graph: GraphData::from(&graph),
    }))
}
