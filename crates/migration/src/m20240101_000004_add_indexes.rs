use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Place: index on creator for list-by-owner queries
        manager
            .create_index(
                Index::create()
                    .name("idx_place_creator")
                    .table(Place::Table)
                    .col(Place::Creator)
                    .to_owned(),
            )
            .await?;

        // UserCredentials: index on user_id for login lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_user_credentials_user")
                    .table(UserCredentials::Table)
                    .col(UserCredentials::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_place_creator").table(Place::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_credentials_user")
                    .table(UserCredentials::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Place { Table, Creator }

#[derive(DeriveIden)]
enum UserCredentials { Table, UserId }
