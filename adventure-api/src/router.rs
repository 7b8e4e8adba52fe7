use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::SameSite;
use axum_login::{
    login_required,
    tower_sessions::{CachingSessionStore, ExpiredDeletion, Expiry, SessionManagerLayer},
    AuthManagerLayer, AuthManagerLayerBuilder,
};
use sqlx::PgPool;
use time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};
use tower_sessions_moka_store::MokaStore;
use tower_sessions_sqlx_store::PostgresStore;

type SessionStore = CachingSessionStore<MokaStore, PostgresStore>;

use crate::{
    app_state::AppState,
    auth::{self, AuthBackend},
    routes,
};

pub async fn create(
    connection_pool: PgPool,
    app_state: AppState,
) -> Result<Router<()>, sqlx::Error> {
    let auth_layer = new_auth_layer(connection_pool).await?;

    let app = Router::new()
        .nest("/categories", routes::categories::router())
        .nest("/grid", routes::grid::router())
        .route_layer(login_required!(AuthBackend))
        .route("/", get(|| async { "Adventure log is up" }))
        .merge(auth::router())
        .layer(auth_layer);

    let app_origin = app_state.app_url.origin().ascii_serialization();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            origin.to_str().unwrap_or_default() == app_origin
        }));

    Ok(app
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default())))
}

async fn new_auth_layer(
    connection_pool: PgPool,
) -> Result<AuthManagerLayer<AuthBackend, SessionStore>, sqlx::Error> {
    // Sessions survive restarts in Postgres, hot ones are served from Moka.
    let db_store = PostgresStore::new(connection_pool.clone());
    db_store.migrate().await?;

    tokio::task::spawn(
        db_store
            .clone()
            .continuously_delete_expired(tokio::time::Duration::from_secs(60)),
    );

    let cache_store = MokaStore::new(Some(2_000));
    let session_store = CachingSessionStore::new(cache_store, db_store);

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)));

    let backend = AuthBackend::new(connection_pool);
    Ok(AuthManagerLayerBuilder::new(backend, session_layer).build())
}
