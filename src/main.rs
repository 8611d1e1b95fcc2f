use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json as ResponseJson},
    routing::{get, post},
    Router,
};
use clap::Parser;
use log::{error, info};
use playscout::api::{
    FindPackageParams, FindPackageResponse, HealthResponse, ModelsParams, ModelsResponse,
    SearchRequest, SearchResponse, VerifyParams, VerifyResponse,
};
use playscout::config::DEFAULT_REGION;
use playscout::{export, normalize_region, pipeline, Config, GeminiClient, PlayStoreClient};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Model used for calls where the caller supplies no model name, such as
/// listing the provider's models
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Parser)]
#[command(author, version, about = "LLM-assisted Google Play market research backend")]
struct Cli {
    /// Host to bind the HTTP server to
    #[arg(long)]
    host: Option<String>,

    /// Port to bind the HTTP server to
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Directory served under /static
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    play: PlayStoreClient,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The log-compat layer makes the library's `log` records flow into the
    // same subscriber as the HTTP traces.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .compact()
        .init();

    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(static_dir) = cli.static_dir {
        config.static_dir = static_dir;
    }
    config.validate()?;

    let play = PlayStoreClient::new(&config);
    let state = AppState {
        config: Arc::new(config),
        play,
    };

    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the main application with all routes
fn create_app(state: AppState) -> Router {
    let index = ServeFile::new(state.config.static_dir.join("index.html"));
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route_service("/", index)
        .nest_service("/static", static_files)
        .route("/health", get(health_check))
        .route("/api/search", post(search_apps))
        .route("/api/verify", get(verify_package))
        .route("/api/find-package", get(find_package))
        .route("/api/models", get(get_models))
        .route("/api/export", post(export_config))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> ResponseJson<HealthResponse> {
    ResponseJson(HealthResponse::ok())
}

/// Topic search: researcher proposes candidates, the pipeline verifies them
async fn search_apps(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<ResponseJson<SearchResponse>, (StatusCode, ResponseJson<Value>)> {
    let region = normalize_region(&request.region);
    info!(
        "Starting search for topic: {} in region: {} using model: {}",
        request.topic, region, request.model_name
    );

    let llm = GeminiClient::new(&state.config, &request.api_key, &request.model_name)
        .map_err(bad_request)?;

    let raw_apps = llm.market_research(&request.topic, &region).await;
    let data = pipeline::process_candidates(
        &state.play,
        &llm,
        raw_apps,
        &region,
        request.resolve_pkg_with_ai,
        &request.category,
    )
    .await;

    Ok(ResponseJson(SearchResponse { data, region }))
}

/// Direct existence check for a single package at the default region
async fn verify_package(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> ResponseJson<VerifyResponse> {
    let response = match state
        .play
        .verify_package_exists(&params.package_name, DEFAULT_REGION, false)
        .await
    {
        Some(region) => VerifyResponse {
            status: "Verified".to_string(),
            play_store_url: state.play.detail_url(&params.package_name, &region),
        },
        None => VerifyResponse {
            status: "Not Found".to_string(),
            play_store_url: state.play.search_url(&params.app_name, DEFAULT_REGION),
        },
    };
    ResponseJson(response)
}

/// First store search hit for an app name, or null
async fn find_package(
    State(state): State<AppState>,
    Query(params): Query<FindPackageParams>,
) -> ResponseJson<FindPackageResponse> {
    let packages = state
        .play
        .search_packages(&params.app_name, DEFAULT_REGION)
        .await;
    ResponseJson(FindPackageResponse {
        package_id: packages.into_iter().next(),
    })
}

/// Lists the provider's available model ids
async fn get_models(
    State(state): State<AppState>,
    Query(params): Query<ModelsParams>,
) -> Result<ResponseJson<ModelsResponse>, (StatusCode, ResponseJson<Value>)> {
    let llm = GeminiClient::new(&state.config, &params.api_key, DEFAULT_MODEL)
        .map_err(bad_request)?;

    match llm.list_models().await {
        Ok(models) => Ok(ResponseJson(ModelsResponse { models })),
        Err(e) => {
            error!("Model listing failed: {}", e);
            Err(server_error(e))
        }
    }
}

/// Serializes a JSON configuration into a zip of binary artifacts
async fn export_config(
    Json(config): Json<Value>,
) -> Result<impl IntoResponse, (StatusCode, ResponseJson<Value>)> {
    match export::export_archive(config) {
        Ok(bytes) => Ok((
            [
                (header::CONTENT_TYPE, "application/zip"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"config_export.zip\"",
                ),
            ],
            bytes,
        )),
        Err(e) => {
            error!("Config export failed: {}", e);
            Err(bad_request(e))
        }
    }
}

fn bad_request(e: playscout::ScoutError) -> (StatusCode, ResponseJson<Value>) {
    (
        StatusCode::BAD_REQUEST,
        ResponseJson(json!({"detail": e.to_string()})),
    )
}

fn server_error(e: playscout::ScoutError) -> (StatusCode, ResponseJson<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ResponseJson(json!({"detail": e.to_string()})),
    )
}
