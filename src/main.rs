use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{any, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;
use url::Url;

mod config;
mod database;
mod errors;
mod geofence;
mod handlers;
mod models;
mod store;

use config::{Config, DatabaseTarget};
use geofence::Geofence;
use handlers::{food_requests, listings, map, notifications, pickups, proxy, requests, service};
use store::{MemoryStore, PgStore, SqliteStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub geofence: Arc<Geofence>,
    pub http: reqwest::Client,
    pub upstream: Option<Url>,
}

impl AppState {
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            geofence: Arc::new(config.geofence.clone()),
            http: reqwest::Client::new(),
            upstream: config.upstream_api_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with reduced SQL verbosity
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(EnvFilter::new("cebu_rescue_backend=info,sqlx=warn,info"))
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    let store = match &config.database {
        DatabaseTarget::Postgres(database_url) => {
            let pool = database::create_pool(database_url).await?;
            if config.skip_migrations {
                warn!("⚠️ Skipping migrations due to SKIP_MIGRATIONS=true");
            } else {
                database::run_migrations(&pool).await;
            }
            Store::Postgres(PgStore::new(pool))
        }
        DatabaseTarget::Sqlite(options) => {
            info!("💾 Using SQLite database {}", options.get_filename().display());
            let pool = database::create_sqlite_pool(options.clone()).await?;
            if config.skip_migrations {
                warn!("⚠️ Skipping migrations due to SKIP_MIGRATIONS=true");
            } else {
                database::run_sqlite_migrations(&pool).await;
            }
            Store::Sqlite(SqliteStore::new(pool))
        }
        DatabaseTarget::Memory => {
            warn!("⚠️ DATABASE_URL=memory, nothing is kept across restarts");
            Store::Memory(MemoryStore::new())
        }
    };

    info!(
        "🗺️ Geofence: {} ({}, {}) radius {} km",
        config.geofence.name,
        config.geofence.center.lat,
        config.geofence.center.lng,
        config.geofence.radius_km
    );
    if let Some(upstream) = &config.upstream_api_url {
        info!("🔀 Proxying /proxy/* to {}", upstream);
    }

    let state = AppState::new(store, &config);
    let app = app(state, &config);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("🚀 Server starting on http://{}:{}", config.host, config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Resource routes; mounted at the root and again under `/api`
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(service::index))
        .route("/health", get(service::health_check))
        .route("/geofence", get(handlers::geofence::describe_or_check))
        .route("/map", get(map::overview))
        .nest("/listings", listings::router())
        .nest("/requests", requests::router())
        .nest("/pickups", pickups::router())
        .nest("/food_requests", food_requests::router())
        .nest("/notifications", notifications::router())
        .route("/notifications_read", post(notifications::mark_read))
}

pub fn app(state: AppState, config: &Config) -> Router {
    let mut router = Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .route("/proxy/*path", any(proxy::forward));

    if let Some(static_dir) = &config.static_dir {
        info!("📁 Serving static client from {} at /app", static_dir.display());
        router = router.nest_service("/app", ServeDir::new(static_dir));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config))
                .layer(DefaultBodyLimit::max(config.max_body_bytes)),
        )
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    // Configure CORS - permissive unless an explicit origin list is given
    let origins = match (&config.allowed_origins, config.debug_mode) {
        (Some(origins), false) => origins,
        (_, true) => {
            info!("🔓 Development mode: Using permissive CORS");
            return CorsLayer::permissive();
        }
        (None, false) => return CorsLayer::permissive(),
    };

    // Already validated by `Config::from_lookup`
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    info!("🔒 CORS configured for origins: {}", origins.join(", "));
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}
