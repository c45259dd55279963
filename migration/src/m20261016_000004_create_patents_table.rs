use sea_orm_migration::prelude::*;

use super::m20261016_000001_create_artists_table::Artists;
use super::m20261016_000002_create_projects_table::Projects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Patents::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Patents::ArtistId).integer().not_null())
                    .col(ColumnDef::new(Patents::ProjectId).integer().null())
                    .col(ColumnDef::new(Patents::Title).string().not_null())
                    .col(ColumnDef::new(Patents::Description).text().null())
                    .col(ColumnDef::new(Patents::PatentNumber).string().not_null())
                    .col(ColumnDef::new(Patents::FilingDate).date().not_null())
                    .col(ColumnDef::new(Patents::Status).string().not_null().default("Pending"))
                    .col(ColumnDef::new(Patents::MetadataUri).string().null())
                    .col(ColumnDef::new(Patents::IpAssetId).string().null())
                    .col(ColumnDef::new(Patents::IpAssetContract).string().null())
                    .col(ColumnDef::new(Patents::IpChainId).big_integer().null())
                    .col(
                        ColumnDef::new(Patents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Patents::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patents_artist")
                            .from(Patents::Table, Patents::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patents_project")
                            .from(Patents::Table, Patents::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Patents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Patents {
    Table,
    Id,
    ArtistId,
    ProjectId,
    Title,
    Description,
    PatentNumber,
    FilingDate,
    Status,
    MetadataUri,
    IpAssetId,
    IpAssetContract,
    IpChainId,
    CreatedAt,
    UpdatedAt,
}
