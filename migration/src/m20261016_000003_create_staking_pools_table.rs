use sea_orm_migration::prelude::*;

use super::m20261016_000002_create_projects_table::Projects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StakingPools::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StakingPools::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StakingPools::ProjectId).integer().not_null())
                    .col(ColumnDef::new(StakingPools::ContractAddress).string().not_null().unique_key())
                    .col(ColumnDef::new(StakingPools::TokenAddress).string().null())
                    .col(ColumnDef::new(StakingPools::Apy).double().not_null())
                    // JSON array of lockup lengths in days
                    .col(ColumnDef::new(StakingPools::LockupPeriods).text().not_null().default("[]"))
                    .col(ColumnDef::new(StakingPools::PoolSize).double().not_null())
                    .col(ColumnDef::new(StakingPools::TotalStaked).double().not_null().default(0.0))
                    .col(ColumnDef::new(StakingPools::StakersCount).integer().not_null().default(0))
                    .col(ColumnDef::new(StakingPools::DeploymentTxHash).string().null())
                    .col(
                        ColumnDef::new(StakingPools::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(StakingPools::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staking_pools_project")
                            .from(StakingPools::Table, StakingPools::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StakingPools::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StakingPools {
    Table,
    Id,
    ProjectId,
    ContractAddress,
    TokenAddress,
    Apy,
    LockupPeriods,
    PoolSize,
    TotalStaked,
    StakersCount,
    DeploymentTxHash,
    CreatedAt,
    UpdatedAt,
}
