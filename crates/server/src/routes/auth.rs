use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;
use tracing::warn;
use uuid::Uuid;

use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::{AuthService, TokenService};
use service::files::LocalFiles;
use service::place::repo::seaorm::SeaOrmPlaceRepository;
use service::place::PlaceService;

use crate::errors::JsonApiError;

/// Requesting user resolved by the auth gate, attached as a request
/// extension for downstream handlers.
#[derive(Clone, Copy, Debug)]
pub struct AuthedUser(pub Uuid);

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub places: Arc<PlaceService<SeaOrmPlaceRepository, LocalFiles>>,
    pub tokens: TokenService,
}

/// Auth gate for mutating place routes: pre-flight passes through, everything
/// else needs a valid `Authorization: Bearer <token>` header. Missing,
/// malformed, invalid and expired tokens all get the same 403.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    let path = req.uri().path().to_string();

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let Some(token) = token else {
        warn!(path = %path, "missing or malformed Authorization header");
        return Err(JsonApiError::new(StatusCode::FORBIDDEN, "Authentication failed", None));
    };

    match state.tokens.verify(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(AuthedUser(claims.uid));
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(path = %path, err = %e, code = e.code(), "token validation failed");
            Err(JsonApiError::new(StatusCode::FORBIDDEN, "Authentication failed", None))
        }
    }
}
