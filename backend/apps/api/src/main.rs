//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use auth::{AuthConfig, AuthState, IdentityKeys, JwksKeySource, PgUserRepository, StaticKeySource};
use axum::{
    Router, http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use study::{PgStudyRepository, StudyConfig, StudyState, study_router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Pick the signing key source.
///
/// An Auth0 tenant wins. Debug builds may fall back to an HS256 secret.
fn identity_keys() -> anyhow::Result<(AuthConfig, IdentityKeys)> {
    if let Ok(domain) = env::var("AUTH0_DOMAIN") {
        let audience = env::var("AUTH0_AUDIENCE")
            .context("AUTH0_AUDIENCE must be set when AUTH0_DOMAIN is set")?;
        let config = AuthConfig::for_domain(&domain, audience);
        let keys = IdentityKeys::Jwks(JwksKeySource::new(&config));
        tracing::info!(issuer = %config.issuer, "Verifying tokens against Auth0 JWKS");
        return Ok((config, keys));
    }

    if cfg!(debug_assertions) {
        let secret = env::var("AUTH_DEV_SECRET")
            .context("Set AUTH0_DOMAIN, or AUTH_DEV_SECRET for local development")?;
        tracing::warn!("Verifying tokens with the development shared secret");
        return Ok((
            AuthConfig::development(),
            IdentityKeys::Static(StaticKeySource::from_secret(secret.as_bytes())),
        ));
    }

    anyhow::bail!("AUTH0_DOMAIN must be set in production")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,study=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections, "Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Identity configuration
    let (auth_config, keys) = identity_keys()?;
    let mut auth_config = auth_config.with_token_cookie(env::var("AUTH_TOKEN_COOKIE").ok());
    if let Ok(claim) = env::var("AUTH0_NICKNAME_CLAIM") {
        auth_config = auth_config.with_nickname_claim(claim);
    }

    let auth_state = AuthState::new(PgUserRepository::new(pool.clone()), keys, auth_config);
    let study_state = StudyState::new(PgStudyRepository::new(pool.clone()), StudyConfig::default());

    // CORS configuration
    let frontend_origins =
        env::var("FRONTEND_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Study routes see the caller when a usable token is present
    let study = study_router(study_state).layer(axum::middleware::from_fn_with_state(
        auth_state.clone(),
        auth::middleware::optional_user::<PgUserRepository, IdentityKeys>,
    ));

    // Build router
    let app = Router::new()
        .nest("/api", study.merge(auth::user_router(auth_state)))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
