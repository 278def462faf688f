//! Create `place` table with FK to `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Place::Table)
                    .if_not_exists()
                    .col(uuid(Place::Id).primary_key())
                    .col(string_len(Place::Title, 255).not_null())
                    .col(text(Place::Description).not_null())
                    .col(string_len(Place::Address, 255).not_null())
                    .col(double(Place::Lat).not_null())
                    .col(double(Place::Long).not_null())
                    .col(string_len(Place::Image, 512).not_null())
                    .col(uuid(Place::Creator).not_null())
                    .col(timestamp_with_time_zone(Place::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Place::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_place_creator")
                            .from(Place::Table, Place::Creator)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Place::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Place { Table, Id, Title, Description, Address, Lat, Long, Image, Creator, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
