use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    adapters::inbound::http::MeResponse,
    app_state::AppState,
    routes::ApiError,
};

use super::{backend::Credentials, AuthSession, AuthUser};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(user.into_inner().into())
}

#[instrument(name = "signup", skip(auth_session))]
async fn signup(
    mut auth_session: AuthSession,
    Json(creds): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    let user = auth_session.backend.register(creds).await?;

    auth_session.login(&user).await.map_err(|e| {
        tracing::error!("Failed to log in user: {}", e);
        ApiError::internal("failed to start session")
    })?;

    Ok((StatusCode::CREATED, Json(MeResponse::from(user))))
}

#[instrument(name = "login", skip(auth_session))]
async fn login(
    mut auth_session: AuthSession,
    Json(creds): Json<Credentials>,
) -> Result<Json<MeResponse>, ApiError> {
    let user = match auth_session.authenticate(creds).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ApiError::unauthorized("Invalid email or password")),
        Err(e) => {
            tracing::error!("Authentication failed: {}", e);
            return Err(ApiError::internal("authentication failed"));
        }
    };

    auth_session.login(&user).await.map_err(|e| {
        tracing::error!("Failed to log in user: {}", e);
        ApiError::internal("failed to start session")
    })?;

    Ok(Json(user.into()))
}

async fn logout(mut auth_session: AuthSession) -> impl IntoResponse {
    match auth_session.logout().await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to log out: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
