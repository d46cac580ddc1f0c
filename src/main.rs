//! Evalio API server.
//!
//! Loads configuration from `EVALIO__*` environment variables (and `.env`),
//! wires the adapters selected there and serves the HTTP API.

use std::error::Error;
use std::sync::Arc;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use evalio::adapters::ai::{MockAIProvider, OpenAICompatibleProvider, OpenAIConfig};
use evalio::adapters::auth::{Argon2PasswordHasher, JwtSessionService};
use evalio::adapters::document::{HtmlReportRenderer, PandocPdfRenderer};
use evalio::adapters::http::{api_router, AppPorts, AppState};
use evalio::adapters::memory::{InMemoryConversationStore, InMemoryUserStore};
use evalio::adapters::postgres::{PostgresConversationStore, PostgresUserStore};
use evalio::config::{AiProvider, AppConfig, ReportFormat};
use evalio::ports::{
    AIProvider, ConversationRepository, ReportRenderer, TurnStore, UserRepository,
};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "Evalio starting"
    );

    let stores = build_stores(&config).await?;
    let sessions = Arc::new(JwtSessionService::new(
        config.auth.jwt_secret.clone(),
        chrono::Duration::minutes(config.auth.token_expiry_minutes as i64),
    ));

    let ports = AppPorts {
        conversations: stores.conversations,
        turn_store: stores.turn_store,
        users: stores.users,
        ai_provider: build_ai_provider(&config)?,
        renderer: build_renderer(&config),
        password_hasher: Arc::new(Argon2PasswordHasher::new()),
        session_issuer: sessions.clone(),
        session_validator: sessions,
    };
    let state = AppState::new(ports, &config.interview);

    let app = api_router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

struct Stores {
    conversations: Arc<dyn ConversationRepository>,
    turn_store: Arc<dyn TurnStore>,
    users: Arc<dyn UserRepository>,
}

async fn build_stores(config: &AppConfig) -> Result<Stores, BoxError> {
    if !config.database.is_configured() {
        tracing::warn!("No database URL configured, using the in-memory stores");
        let store = Arc::new(InMemoryConversationStore::new());
        return Ok(Stores {
            conversations: store.clone(),
            turn_store: store,
            users: Arc::new(InMemoryUserStore::new()),
        });
    }

    let db = &config.database;
    let pool = PgPoolOptions::new()
        .min_connections(db.min_connections)
        .max_connections(db.max_connections)
        .acquire_timeout(db.acquire_timeout())
        .idle_timeout(Some(db.idle_timeout()))
        .connect(&db.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(max_connections = db.max_connections, "Connected to PostgreSQL");

    let store = Arc::new(PostgresConversationStore::new(pool.clone()));
    Ok(Stores {
        conversations: store.clone(),
        turn_store: store,
        users: Arc::new(PostgresUserStore::new(pool)),
    })
}

fn build_ai_provider(config: &AppConfig) -> Result<Arc<dyn AIProvider>, BoxError> {
    let ai = &config.ai;
    match ai.provider {
        AiProvider::Mock => {
            tracing::warn!("Using the mock AI provider");
            Ok(Arc::new(MockAIProvider::new()))
        }
        AiProvider::OpenAI => {
            let api_key = ai.api_key.clone().ok_or("EVALIO__AI__API_KEY is not set")?;
            let provider = OpenAICompatibleProvider::new(
                OpenAIConfig::new(api_key)
                    .with_model(ai.model.clone())
                    .with_base_url(ai.base_url.clone())
                    .with_timeout(ai.timeout())
                    .with_max_retries(ai.max_retries),
            )?;
            tracing::info!(model = %ai.model, base_url = %ai.base_url, "AI provider ready");
            Ok(Arc::new(provider))
        }
    }
}

fn build_renderer(config: &AppConfig) -> Arc<dyn ReportRenderer> {
    let report = &config.report;
    match report.format {
        ReportFormat::Html => Arc::new(HtmlReportRenderer::new()),
        ReportFormat::Pdf => {
            let mut renderer =
                PandocPdfRenderer::new(report.pandoc_path.clone()).with_timeout(report.timeout());
            if let Some(engine) = &report.pdf_engine {
                renderer = renderer.with_pdf_engine(engine.clone());
            }
            Arc::new(renderer)
        }
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
