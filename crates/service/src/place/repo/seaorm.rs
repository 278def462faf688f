use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QuerySelect, Set, TransactionTrait};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::place::domain::CreatePlaceInput;
use crate::place::repository::PlaceRepository;

/// SeaORM-backed repository. Owned writes run on a single transaction and
/// take a row lock on the owner so concurrent list updates cannot lose
/// entries under read-committed isolation.
pub struct SeaOrmPlaceRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl PlaceRepository for SeaOrmPlaceRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<models::place::Model>, ServiceError> {
        models::place::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list_by_creator(&self, creator: Uuid) -> Result<Vec<models::place::Model>, ServiceError> {
        models::place::find_by_creator(&self.db, creator)
            .await
            .map_err(ServiceError::from)
    }

    async fn owner_exists(&self, id: Uuid) -> Result<bool, ServiceError> {
        let found = models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(found.is_some())
    }

    async fn create_owned(&self, creator: Uuid, input: &CreatePlaceInput) -> Result<models::place::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| ServiceError::Transaction(e.to_string()))?;

        // Owner row is locked first; create and delete take it in the same
        // order so two owned writes on one user serialize instead of deadlock.
        let owner = models::user::Entity::find_by_id(creator)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| ServiceError::Transaction(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("user"))?;

        let created = models::place::new_active_model(
            &input.title,
            &input.description,
            &input.address,
            input.latitude,
            input.longitude,
            &input.image,
            creator,
        )
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::Transaction(e.to_string()))?;

        let mut ids = models::user::owned_places(&owner);
        ids.push(created.id);
        let mut owner_am: models::user::ActiveModel = owner.into();
        owner_am.places = Set(models::user::places_json(&ids));
        owner_am.updated_at = Set(Utc::now().into());
        owner_am
            .update(&txn)
            .await
            .map_err(|e| ServiceError::Transaction(e.to_string()))?;

        txn.commit().await.map_err(|e| ServiceError::Transaction(e.to_string()))?;
        Ok(created)
    }

    async fn update_fields(&self, id: Uuid, title: &str, description: &str) -> Result<models::place::Model, ServiceError> {
        let found = models::place::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("place"))?;

        let mut am: models::place::ActiveModel = found.into();
        am.title = Set(title.to_string());
        am.description = Set(description.to_string());
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn delete_owned(&self, place: &models::place::Model) -> Result<(), ServiceError> {
        let txn = self.db.begin().await.map_err(|e| ServiceError::Transaction(e.to_string()))?;

        let owner = models::user::Entity::find_by_id(place.creator)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| ServiceError::Transaction(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("user"))?;

        models::place::Entity::delete_by_id(place.id)
            .exec(&txn)
            .await
            .map_err(|e| ServiceError::Transaction(e.to_string()))?;

        let remaining: Vec<Uuid> = models::user::owned_places(&owner)
            .into_iter()
            .filter(|id| *id != place.id)
            .collect();
        let mut owner_am: models::user::ActiveModel = owner.into();
        owner_am.places = Set(models::user::places_json(&remaining));
        owner_am.updated_at = Set(Utc::now().into());
        owner_am
            .update(&txn)
            .await
            .map_err(|e| ServiceError::Transaction(e.to_string()))?;

        txn.commit().await.map_err(|e| ServiceError::Transaction(e.to_string()))
    }
}
