use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::AuthPolicy;
use service::auth::{AuthService, TokenService};
use service::files::LocalFiles;
use service::place::repo::seaorm::SeaOrmPlaceRepository;
use service::place::PlaceService;

use crate::routes::{self, auth};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load configuration from config.toml, falling back to env vars when no
/// file is present.
fn load_config() -> configs::AppConfig {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(_) => {
            let mut cfg = configs::AppConfig::default();
            if let Ok(host) = env::var("SERVER_HOST") {
                cfg.server.host = host;
            }
            if let Some(port) = env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
                cfg.server.port = port;
            }
            cfg.database.normalize_from_env();
            cfg.auth.normalize_from_env();
            cfg
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config();

    // Stored uploads are served statically; make sure the directory exists.
    common::env::ensure_env(&cfg.uploads.dir).await?;

    // DB connection + schema
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    // JWT secret: config/env first, dev fallback otherwise
    let jwt_secret = if cfg.auth.jwt_secret.trim().is_empty() {
        "dev-secret-change-me".to_string()
    } else {
        cfg.auth.jwt_secret.clone()
    };
    let tokens = TokenService::new(jwt_secret);
    let policy = AuthPolicy {
        signup_ttl: chrono::Duration::seconds(cfg.auth.signup_ttl_secs as i64),
        login_ttl: chrono::Duration::seconds(cfg.auth.login_ttl_secs as i64),
    };

    let auth_svc = Arc::new(AuthService::new(
        Arc::new(SeaOrmAuthRepository { db: db.clone() }),
        tokens.clone(),
        policy,
    ));
    let place_svc = Arc::new(PlaceService::new(
        Arc::new(SeaOrmPlaceRepository { db: db.clone() }),
        Arc::new(LocalFiles),
    ));

    let state = auth::ServerState {
        db,
        auth: auth_svc,
        places: place_svc,
        tokens,
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(state, cors, &cfg.uploads.dir);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting places api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
