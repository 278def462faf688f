use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use service::errors::ServiceError;
use service::place::domain::{CreatePlaceInput, UpdatePlaceInput};

use crate::errors::JsonApiError;
use crate::routes::auth::{AuthedUser, ServerState};

#[derive(Serialize)]
pub struct PlaceOutput {
    pub place: models::place::Model,
}

#[derive(Serialize)]
pub struct UserPlacesOutput {
    #[serde(rename = "userPlaces")]
    pub user_places: Vec<models::place::Model>,
}

#[derive(Serialize)]
pub struct MessageOutput {
    pub message: &'static str,
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(place_id): Path<Uuid>,
) -> Result<Json<PlaceOutput>, JsonApiError> {
    match state.places.get_by_id(place_id).await {
        Ok(place) => Ok(Json(PlaceOutput { place })),
        Err(ServiceError::NotFound(_)) => Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Could not find a place for the provided id",
            None,
        )),
        Err(e) => Err(JsonApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong, could not find a place",
            Some(e.to_string()),
        )),
    }
}

/// A user with no places answers with an empty list on purpose.
pub async fn list_by_user(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserPlacesOutput>, JsonApiError> {
    match state.places.list_by_creator(user_id).await {
        Ok(user_places) => Ok(Json(UserPlacesOutput { user_places })),
        Err(e) => Err(JsonApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong, could not find any place",
            Some(e.to_string()),
        )),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(AuthedUser(user_id)): Extension<AuthedUser>,
    Json(input): Json<CreatePlaceInput>,
) -> Result<(StatusCode, Json<PlaceOutput>), JsonApiError> {
    match state.places.create(user_id, input).await {
        Ok(place) => {
            info!(place_id = %place.id, creator = %user_id, "created place");
            Ok((StatusCode::CREATED, Json(PlaceOutput { place })))
        }
        Err(ServiceError::Validation(msg)) => Err(JsonApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid input passed, please check your input",
            Some(msg),
        )),
        Err(ServiceError::NotFound(_)) => Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Could not find user for provided id",
            None,
        )),
        Err(e) => Err(JsonApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Creating place failed, please try again later",
            Some(e.to_string()),
        )),
    }
}

pub async fn update(
    State(state): State<ServerState>,
    Path(place_id): Path<Uuid>,
    Extension(AuthedUser(user_id)): Extension<AuthedUser>,
    Json(input): Json<UpdatePlaceInput>,
) -> Result<Json<PlaceOutput>, JsonApiError> {
    match state.places.update(place_id, user_id, input).await {
        Ok(place) => Ok(Json(PlaceOutput { place })),
        Err(ServiceError::Validation(msg)) => Err(JsonApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid input passed, please check your input",
            Some(msg),
        )),
        Err(ServiceError::NotFound(_)) => Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Could not find a place for the provided id",
            None,
        )),
        Err(ServiceError::Forbidden(_)) => Err(JsonApiError::new(
            StatusCode::FORBIDDEN,
            "You are not allowed to edit this place",
            None,
        )),
        Err(e) => Err(JsonApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Updating place failed, please try again later",
            Some(e.to_string()),
        )),
    }
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(place_id): Path<Uuid>,
    Extension(AuthedUser(user_id)): Extension<AuthedUser>,
) -> Result<Json<MessageOutput>, JsonApiError> {
    match state.places.delete(place_id, user_id).await {
        Ok(()) => {
            info!(place_id = %place_id, requester = %user_id, "deleted place");
            Ok(Json(MessageOutput { message: "Deleted place." }))
        }
        Err(ServiceError::NotFound(_)) => Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Could not find a place for the provided id",
            None,
        )),
        Err(ServiceError::Forbidden(_)) => Err(JsonApiError::new(
            StatusCode::FORBIDDEN,
            "You are not allowed to delete this place",
            None,
        )),
        Err(e) => Err(JsonApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Deleting place failed, please try again later",
            Some(e.to_string()),
        )),
    }
}
