use sea_orm_migration::prelude::*;

use super::m20261016_000001_create_artists_table::Artists;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::ArtistId).integer().not_null())
                    .col(ColumnDef::new(Projects::Title).string().not_null())
                    .col(ColumnDef::new(Projects::Description).text().not_null())
                    .col(ColumnDef::new(Projects::Category).string().not_null())
                    .col(ColumnDef::new(Projects::RiskLevel).string().not_null().default("medium"))
                    .col(ColumnDef::new(Projects::FundingTarget).double().not_null())
                    .col(ColumnDef::new(Projects::CurrentFunding).double().not_null().default(0.0))
                    .col(ColumnDef::new(Projects::MilestonesTotal).integer().not_null().default(0))
                    .col(ColumnDef::new(Projects::MilestonesCompleted).integer().not_null().default(0))
                    // JSON array of image URLs
                    .col(ColumnDef::new(Projects::Images).text().not_null().default("[]"))
                    .col(ColumnDef::new(Projects::Status).string().null())
                    .col(ColumnDef::new(Projects::FundingContract).string().null())
                    .col(ColumnDef::new(Projects::StakingPoolId).integer().null())
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Projects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_artist")
                            .from(Projects::Table, Projects::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_projects_artist_id")
                    .table(Projects::Table)
                    .col(Projects::ArtistId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Projects {
    Table,
    Id,
    ArtistId,
    Title,
    Description,
    Category,
    RiskLevel,
    FundingTarget,
    CurrentFunding,
    MilestonesTotal,
    MilestonesCompleted,
    Images,
    Status,
    FundingContract,
    StakingPoolId,
    CreatedAt,
    UpdatedAt,
}
