use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::files::FileStore;
use crate::place::domain::{CreatePlaceInput, UpdatePlaceInput};
use crate::place::repository::PlaceRepository;

/// Application service encapsulating place business rules: field validation,
/// ownership checks, and the transactional create/delete contract.
pub struct PlaceService<R: PlaceRepository, F: FileStore> {
    repo: Arc<R>,
    files: Arc<F>,
}

fn validate_mutable_fields(title: &str, description: &str) -> Result<(), ServiceError> {
    models::place::validate_title(title)?;
    models::place::validate_description(description)?;
    Ok(())
}

impl<R: PlaceRepository, F: FileStore + 'static> PlaceService<R, F> {
    pub fn new(repo: Arc<R>, files: Arc<F>) -> Self {
        Self { repo, files }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<models::place::Model, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("place"))
    }

    /// An owner with no places yields an empty list, not an error.
    pub async fn list_by_creator(&self, creator: Uuid) -> Result<Vec<models::place::Model>, ServiceError> {
        self.repo.list_by_creator(creator).await
    }

    #[instrument(skip(self, input), fields(creator = %creator))]
    pub async fn create(&self, creator: Uuid, input: CreatePlaceInput) -> Result<models::place::Model, ServiceError> {
        validate_mutable_fields(&input.title, &input.description)?;
        models::place::validate_address(&input.address)?;

        if !self.repo.owner_exists(creator).await? {
            return Err(ServiceError::not_found("user"));
        }

        let created = self.repo.create_owned(creator, &input).await?;
        info!(place_id = %created.id, creator = %creator, "place_created");
        Ok(created)
    }

    #[instrument(skip(self, input), fields(place_id = %id, requester = %requester))]
    pub async fn update(&self, id: Uuid, requester: Uuid, input: UpdatePlaceInput) -> Result<models::place::Model, ServiceError> {
        validate_mutable_fields(&input.title, &input.description)?;

        let place = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("place"))?;
        if place.creator != requester {
            return Err(ServiceError::Forbidden("not the owner of this place".into()));
        }

        let updated = self.repo.update_fields(id, &input.title, &input.description).await?;
        info!(place_id = %updated.id, "place_updated");
        Ok(updated)
    }

    /// Delete the place and the owner's list entry atomically, then clean up
    /// the stored image without blocking or failing the request.
    #[instrument(skip(self), fields(place_id = %id, requester = %requester))]
    pub async fn delete(&self, id: Uuid, requester: Uuid) -> Result<(), ServiceError> {
        let place = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("place"))?;
        if place.creator != requester {
            return Err(ServiceError::Forbidden("not the owner of this place".into()));
        }

        self.repo.delete_owned(&place).await?;
        info!(place_id = %place.id, creator = %place.creator, "place_deleted");

        let files = Arc::clone(&self.files);
        let image = place.image;
        tokio::spawn(async move {
            if let Err(e) = files.remove(&image).await {
                warn!(error = %e, image = %image, "failed to remove place image");
            }
        });
        Ok(())
    }
}
