use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use uuid::Uuid;

use service::auth::domain::{AuthUser, LoginInput, SignupInput};
use service::auth::errors::AuthError;

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[derive(Serialize)]
pub struct UsersOutput {
    pub users: Vec<AuthUser>,
}

#[derive(Serialize)]
pub struct SessionOutput {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<UsersOutput>, JsonApiError> {
    let users = state.auth.list_users().await.map_err(|e| {
        JsonApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong, could not find users",
            Some(e.to_string()),
        )
    })?;
    Ok(Json(UsersOutput { users }))
}

pub async fn signup(
    State(state): State<ServerState>,
    Json(input): Json<SignupInput>,
) -> Result<(StatusCode, Json<SessionOutput>), JsonApiError> {
    match state.auth.signup(input).await {
        Ok(session) => Ok((
            StatusCode::CREATED,
            Json(SessionOutput { user_id: session.user_id, email: session.email, token: session.token }),
        )),
        Err(AuthError::Validation(msg)) => Err(JsonApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid input passed, please check your input",
            Some(msg),
        )),
        Err(AuthError::Conflict) => Err(JsonApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Email already exists, use another email",
            None,
        )),
        Err(e) => Err(JsonApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Signing up failed, please try again later",
            Some(e.to_string()),
        )),
    }
}

pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<SessionOutput>, JsonApiError> {
    match state.auth.login(input).await {
        Ok(session) => Ok(Json(SessionOutput {
            user_id: session.user_id,
            email: session.email,
            token: session.token,
        })),
        // One message for unknown email and wrong password alike.
        Err(AuthError::Unauthorized) => Err(JsonApiError::new(
            StatusCode::UNAUTHORIZED,
            "Invalid credentials, could not log you in",
            None,
        )),
        Err(e) => Err(JsonApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Logging in failed, please try again later",
            Some(e.to_string()),
        )),
    }
}
