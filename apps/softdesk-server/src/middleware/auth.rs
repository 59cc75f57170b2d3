//! Authentication middleware.

use std::sync::Arc;

use auth::{Claims, TokenKind};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use entities::UserId;
use tracker_store::TrackerStore;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Authenticated user information.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID.
    pub id: UserId,
    /// Username at the time the token was issued.
    pub username: String,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = auth::AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId(claims.user_id()?),
            username: claims.username,
        })
    }
}

/// Handlers that take an `AuthenticatedUser` reject anonymous requests.
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(ServerError::AuthenticationRequired)
    }
}

/// Extracts the JWT token from the Authorization header.
fn extract_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

async fn resolve_user<S: TrackerStore>(
    state: &AppState<S>,
    token: &str,
) -> ServerResult<Option<AuthenticatedUser>> {
    let claims = state
        .jwt_manager
        .validate_token_kind(token, TokenKind::Access)?;
    let user = AuthenticatedUser::try_from(claims)?;

    // Tokens outlive accounts; a deleted user must not keep access.
    Ok(state.store.get_user(user.id).await?.map(|_| user))
}

/// Decides what a token lookup means for the request. Unusable tokens leave
/// it anonymous, while a failing store ends it.
fn admit(
    resolved: ServerResult<Option<AuthenticatedUser>>,
) -> ServerResult<Option<AuthenticatedUser>> {
    match resolved {
        Ok(None) => {
            tracing::debug!("Token subject no longer exists");
            Ok(None)
        }
        Err(ServerError::Auth(e)) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            Ok(None)
        }
        other => other,
    }
}

/// Authentication middleware.
///
/// Validates a bearer access token when one is present and stores the
/// authenticated user in the request extensions. Requests without a usable
/// token pass through anonymously; the `AuthenticatedUser` extractor decides
/// whether the endpoint needs one. If the account lookup itself fails the
/// request ends with a 500.
pub async fn authenticate<S: TrackerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_token(&request).map(str::to_owned);

    if let Some(token) = token {
        match admit(resolve_user(&state, &token).await) {
            Ok(Some(user)) => {
                request.extensions_mut().insert(user);
            }
            Ok(None) => {}
            Err(e) => return e.into_response(),
        }
    }

    next.run(request).await
}
