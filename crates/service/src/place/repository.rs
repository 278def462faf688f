use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::place::domain::CreatePlaceInput;

/// Repository abstraction for place persistence. `create_owned` and
/// `delete_owned` must apply the place write and the reciprocal owner-list
/// write atomically: either both are visible afterwards or neither is.
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<models::place::Model>, ServiceError>;
    async fn list_by_creator(&self, creator: Uuid) -> Result<Vec<models::place::Model>, ServiceError>;
    async fn owner_exists(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn create_owned(&self, creator: Uuid, input: &CreatePlaceInput) -> Result<models::place::Model, ServiceError>;
    async fn update_fields(&self, id: Uuid, title: &str, description: &str) -> Result<models::place::Model, ServiceError>;
    async fn delete_owned(&self, place: &models::place::Model) -> Result<(), ServiceError>;
}

/// In-memory mock repository for tests and doc examples. Each owned-write
/// holds both maps for the whole operation, mirroring the transactional
/// contract of the real store.
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockPlaceRepository {
        // owner id -> ordered owned place ids, plus the place rows themselves;
        // one lock guards both so owned writes stay atomic.
        state: Mutex<State>,
    }

    #[derive(Default)]
    struct State {
        owners: HashMap<Uuid, Vec<Uuid>>,
        places: HashMap<Uuid, models::place::Model>,
    }

    impl MockPlaceRepository {
        pub fn insert_owner(&self, id: Uuid) {
            self.state.lock().unwrap().owners.insert(id, Vec::new());
        }

        pub fn owned_ids(&self, owner: Uuid) -> Vec<Uuid> {
            self.state.lock().unwrap().owners.get(&owner).cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl PlaceRepository for MockPlaceRepository {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<models::place::Model>, ServiceError> {
            Ok(self.state.lock().unwrap().places.get(&id).cloned())
        }

        async fn list_by_creator(&self, creator: Uuid) -> Result<Vec<models::place::Model>, ServiceError> {
            let state = self.state.lock().unwrap();
            let mut out: Vec<_> = state.places.values().filter(|p| p.creator == creator).cloned().collect();
            out.sort_by_key(|p| p.created_at);
            Ok(out)
        }

        async fn owner_exists(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.state.lock().unwrap().owners.contains_key(&id))
        }

        async fn create_owned(&self, creator: Uuid, input: &CreatePlaceInput) -> Result<models::place::Model, ServiceError> {
            let mut state = self.state.lock().unwrap();
            if !state.owners.contains_key(&creator) {
                return Err(ServiceError::not_found("user"));
            }
            let now = Utc::now().into();
            let model = models::place::Model {
                id: Uuid::new_v4(),
                title: input.title.clone(),
                description: input.description.clone(),
                address: input.address.clone(),
                lat: input.latitude,
                long: input.longitude,
                image: input.image.clone(),
                creator,
                created_at: now,
                updated_at: now,
            };
            state.places.insert(model.id, model.clone());
            state.owners.get_mut(&creator).unwrap().push(model.id);
            Ok(model)
        }

        async fn update_fields(&self, id: Uuid, title: &str, description: &str) -> Result<models::place::Model, ServiceError> {
            let mut state = self.state.lock().unwrap();
            let place = state.places.get_mut(&id).ok_or_else(|| ServiceError::not_found("place"))?;
            place.title = title.to_string();
            place.description = description.to_string();
            place.updated_at = Utc::now().into();
            Ok(place.clone())
        }

        async fn delete_owned(&self, place: &models::place::Model) -> Result<(), ServiceError> {
            let mut state = self.state.lock().unwrap();
            state.places.remove(&place.id);
            if let Some(ids) = state.owners.get_mut(&place.creator) {
                ids.retain(|id| *id != place.id);
            }
            Ok(())
        }
    }
}
