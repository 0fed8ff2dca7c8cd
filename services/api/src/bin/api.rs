//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        db::DbAdapter, doc_llm::OpenAiDocumentAdapter, interview_llm::OpenAiInterviewAdapter,
        sst::OpenAiSstAdapter,
    },
    config::Config,
    error::ApiError,
    web::{
        auth::{login_handler, logout_handler, signup_handler},
        documents::{
            create_document_handler, delete_document_handler, generate_document_handler,
            get_document_handler, get_version_handler, list_documents_handler,
            list_versions_handler, snapshot_version_handler, update_document_handler,
        },
        interviews::{
            generate_from_interview_handler, get_interview_handler, interview_turn_handler,
            start_interview_handler,
        },
        middleware::require_auth,
        profiles::{get_profile_handler, update_profile_handler},
        public::get_public_document_handler,
        rest::ApiDoc,
        state::AppState,
        transcription::transcribe_handler,
        uploads::{create_upload_handler, list_uploads_handler},
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Body limit covering the largest accepted upload plus multipart overhead.
const BODY_LIMIT_BYTES: usize = 80 * 1024 * 1024;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let openai_client = Client::with_config(openai_config);

    let sst_adapter = Arc::new(OpenAiSstAdapter::new(
        openai_client.clone(),
        config.transcription_model.clone(),
    ));
    let generation_adapter = Arc::new(OpenAiDocumentAdapter::new(
        openai_client.clone(),
        config.generation_model.clone(),
    ));
    let interview_adapter = Arc::new(OpenAiInterviewAdapter::new(
        openai_client.clone(),
        config.interview_model.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: db_adapter,
        config: config.clone(),
        sst_adapter,
        generation_adapter,
        interview_adapter,
    });

    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origin.parse::<HeaderValue>().map_err(
            |_| {
                ApiError::Internal(format!(
                    "FRONTEND_ORIGIN '{}' is not a valid origin",
                    config.frontend_origin
                ))
            },
        )?)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/public/{slug}", get(get_public_document_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/documents",
            get(list_documents_handler).post(create_document_handler),
        )
        .route(
            "/documents/{id}",
            get(get_document_handler)
                .put(update_document_handler)
                .delete(delete_document_handler),
        )
        .route(
            "/documents/{id}/versions",
            get(list_versions_handler).post(snapshot_version_handler),
        )
        .route("/versions/{id}", get(get_version_handler))
        .route("/documents/generate", post(generate_document_handler))
        .route("/interviews", post(start_interview_handler))
        .route("/interviews/{id}", get(get_interview_handler))
        .route("/interviews/{id}/messages", post(interview_turn_handler))
        .route(
            "/interviews/{id}/generate",
            post(generate_from_interview_handler),
        )
        .route("/transcriptions", post(transcribe_handler))
        .route(
            "/uploads",
            get(list_uploads_handler).post(create_upload_handler),
        )
        .route(
            "/profile",
            get(get_profile_handler).put(update_profile_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
