mod api;
mod auth;
mod config;
mod db;
mod email;
mod error;
mod media;
mod models;
mod query;
mod raw_sql;
mod schema;
mod seed;
mod telemetry;

use axum::extract::{DefaultBodyLimit, FromRef};
use axum::Router;
use config::Config;
use db::DbPool;
use email::Mailer;
use media::MediaStore;
use std::env;
use std::sync::Arc;
use tower_http::services::ServeDir;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across all handlers.
///
/// Handlers pull out only the parts they need, e.g. `State(pool): State<Arc<DbPool>>`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub config: Arc<Config>,
    pub mailer: Arc<dyn Mailer>,
    pub media: Arc<MediaStore>,
}

/// Assemble the full application router: API routes, media files and Swagger UI.
pub fn build_router(state: AppState) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());
    let max_upload = state.config.max_upload_bytes;
    let media_dir = state.media.root().to_path_buf();

    Router::new()
        .merge(api::router())
        .nest_service("/media", ServeDir::new(media_dir))
        .merge(swagger_ui)
        .layer(DefaultBodyLimit::max(max_upload))
        .with_state(state)
        .layer(telemetry::http_trace_layer())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        println!("{}", api::openapi().to_pretty_json()?);
        return Ok(());
    }

    dotenvy::dotenv().ok();
    telemetry::init_telemetry();

    let config = Config::from_env()?;
    let pool = Arc::new(db::create_pool(&config.database_url)?);

    if env::args().any(|arg| arg == "--seed") {
        let mut conn = pool.get()?;
        seed::run(&mut conn)?;
        tracing::info!("Seed completed successfully");
        return Ok(());
    }

    let media = Arc::new(MediaStore::new(&config.media_dir));
    media.ensure_dirs().await?;

    let mailer = email::mailer_from_config(&config.mail);
    tracing::info!(mailer = mailer.name(), "Email delivery configured");

    email::cleanup::spawn_cleanup_task(pool.clone(), email::cleanup::CLEANUP_INTERVAL);

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        pool,
        config: Arc::new(config),
        mailer,
        media,
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);
    tracing::info!(
        "OpenAPI spec available at http://{}/api-docs/openapi.json",
        local_addr
    );

    axum::serve(listener, app).await?;

    Ok(())
}
