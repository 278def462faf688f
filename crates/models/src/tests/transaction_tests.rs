use crate::db::connect;
use crate::{place, user};
use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use uuid::Uuid;

async fn setup_test_db() -> Result<Option<DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return Ok(None);
        }
    };
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}

async fn make_owner(db: &DatabaseConnection) -> Result<user::Model> {
    let email = format!("txn_{}@example.com", Uuid::new_v4());
    Ok(user::create(db, &email, "Txn Owner", "uploads/t.png").await?)
}

/// The reciprocal write: place row plus owner's places entry commit together.
#[tokio::test]
async fn test_reciprocal_create_commit() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let owner = make_owner(&db).await?;

    let txn = db.begin().await?;
    let created = place::new_active_model(
        "Harbor",
        "Boats and seagulls",
        "2 Dock Rd",
        3.5,
        -1.25,
        "uploads/harbor.png",
        owner.id,
    )
    .insert(&txn)
    .await?;

    let mut ids = user::owned_places(&owner);
    ids.push(created.id);
    let mut owner_am: user::ActiveModel = owner.clone().into();
    owner_am.places = Set(user::places_json(&ids));
    owner_am.update(&txn).await?;
    txn.commit().await?;

    // Both sides visible after commit
    let stored_place = place::Entity::find_by_id(created.id).one(&db).await?;
    assert!(stored_place.is_some());
    let stored_owner = user::Entity::find_by_id(owner.id).one(&db).await?.unwrap();
    assert_eq!(user::owned_places(&stored_owner), vec![created.id]);

    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    Ok(())
}

/// Rolling back leaves neither the place row nor the owner entry behind.
#[tokio::test]
async fn test_reciprocal_create_rollback() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let owner = make_owner(&db).await?;

    let txn = db.begin().await?;
    let created = place::new_active_model(
        "Ghost",
        "Should never persist",
        "0 Nowhere",
        0.0,
        0.0,
        "uploads/ghost.png",
        owner.id,
    )
    .insert(&txn)
    .await?;

    let mut owner_am: user::ActiveModel = owner.clone().into();
    owner_am.places = Set(user::places_json(&[created.id]));
    owner_am.update(&txn).await?;
    txn.rollback().await?;

    let stored_place = place::Entity::find_by_id(created.id).one(&db).await?;
    assert!(stored_place.is_none());
    let stored_owner = user::Entity::find_by_id(owner.id).one(&db).await?.unwrap();
    assert!(user::owned_places(&stored_owner).is_empty());

    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    Ok(())
}

/// A failing write inside the transaction aborts both sides.
#[tokio::test]
async fn test_reciprocal_create_error_aborts() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let owner = make_owner(&db).await?;

    let result = async {
        let txn = db.begin().await?;
        let created = place::new_active_model(
            "Doomed",
            "FK violation follows",
            "1 Err St",
            0.0,
            0.0,
            "uploads/doomed.png",
            owner.id,
        )
        .insert(&txn)
        .await?;

        let mut owner_am: user::ActiveModel = owner.clone().into();
        owner_am.places = Set(user::places_json(&[created.id]));
        owner_am.update(&txn).await?;

        // Second place pointing at a nonexistent user violates the FK
        place::new_active_model(
            "Bad",
            "No such creator",
            "2 Err St",
            0.0,
            0.0,
            "uploads/bad.png",
            Uuid::new_v4(),
        )
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok::<(), anyhow::Error>(())
    }
    .await;
    assert!(result.is_err());

    // Neither the place nor the owner entry survived
    let stored_owner = user::Entity::find_by_id(owner.id).one(&db).await?.unwrap();
    assert!(user::owned_places(&stored_owner).is_empty());
    let places = place::find_by_creator(&db, owner.id).await?;
    assert!(places.is_empty());

    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    Ok(())
}

/// Delete path: place row removal and owner list removal commit together.
#[tokio::test]
async fn test_reciprocal_delete_commit() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let owner = make_owner(&db).await?;

    // Seed one owned place
    let txn = db.begin().await?;
    let created = place::new_active_model(
        "Seeded",
        "To be deleted",
        "3 Gone Ln",
        1.0,
        1.0,
        "uploads/seed.png",
        owner.id,
    )
    .insert(&txn)
    .await?;
    let mut owner_am: user::ActiveModel = owner.clone().into();
    owner_am.places = Set(user::places_json(&[created.id]));
    let owner = owner_am.update(&txn).await?;
    txn.commit().await?;

    // Delete both sides in one transaction
    let txn = db.begin().await?;
    place::Entity::delete_by_id(created.id).exec(&txn).await?;
    let remaining: Vec<Uuid> = user::owned_places(&owner)
        .into_iter()
        .filter(|id| *id != created.id)
        .collect();
    let mut owner_am: user::ActiveModel = owner.clone().into();
    owner_am.places = Set(user::places_json(&remaining));
    owner_am.update(&txn).await?;
    txn.commit().await?;

    let stored_place = place::Entity::find_by_id(created.id).one(&db).await?;
    assert!(stored_place.is_none());
    let stored_owner = user::Entity::find_by_id(owner.id).one(&db).await?.unwrap();
    assert!(user::owned_places(&stored_owner).is_empty());

    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    Ok(())
}
