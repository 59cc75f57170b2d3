//! Token endpoints.

use std::sync::Arc;

use api_protocol::{requests::*, responses::*};
use auth::{AuthError, TokenKind};
use axum::{Json, extract::State};
use entities::UserId;
use tracker_store::TrackerStore;

use crate::error::{ServerError, ServerResult};
use crate::extract::ApiJson;
use crate::state::AppState;

/// Hashes a password off the async workers.
pub(crate) async fn hash_password(password: String) -> ServerResult<String> {
    tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}

/// Checks a password off the async workers. Without an account hash the
/// password is checked against the decoy hash and always fails.
async fn verify_password(password: String, hash: Option<String>) -> ServerResult<bool> {
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => auth::verify_password(&password, &hash),
        None => auth::decoy_hash()
            .and_then(|decoy| auth::verify_password(&password, decoy))
            .map(|_| false),
    })
    .await
    .map_err(|e| ServerError::Internal(e.to_string()))?
    .map_err(ServerError::from)
}

/// Exchanges credentials for an access and refresh token pair.
pub async fn obtain_token<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(request): ApiJson<TokenRequest>,
) -> ServerResult<Json<TokenResponse>> {
    let user = state.store.get_user_by_username(&request.username).await?;
    let hash = user.as_ref().map(|user| user.password_hash.clone());
    let verified = verify_password(request.password, hash).await?;

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::info!(username = %request.username, "Login failed");
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let pair = state
        .jwt_manager
        .generate_token_pair(user.id.get(), &user.username)?;

    tracing::info!(user_id = %user.id, "Token pair issued");

    Ok(Json(TokenResponse {
        access: pair.access,
        refresh: pair.refresh,
    }))
}

/// Issues a new access token from a refresh token.
pub async fn refresh_token<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(request): ApiJson<RefreshTokenRequest>,
) -> ServerResult<Json<RefreshTokenResponse>> {
    let claims = state
        .jwt_manager
        .validate_token_kind(&request.refresh, TokenKind::Refresh)?;
    let user_id = UserId(claims.user_id()?);

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    let access = state
        .jwt_manager
        .generate_access_token(user.id.get(), &user.username)?;

    tracing::info!(user_id = %user.id, "Access token refreshed");

    Ok(Json(RefreshTokenResponse { access }))
}
