use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Artists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Artists::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Artists::Name).string().not_null())
                    .col(ColumnDef::new(Artists::Genre).string().not_null())
                    .col(ColumnDef::new(Artists::Bio).text().not_null())
                    .col(ColumnDef::new(Artists::WalletAddress).string().null())
                    .col(ColumnDef::new(Artists::AvatarUrl).string().null())
                    .col(ColumnDef::new(Artists::Verified).boolean().not_null().default(false))
                    .col(ColumnDef::new(Artists::Followers).integer().not_null().default(0))
                    .col(ColumnDef::new(Artists::TotalRaised).double().not_null().default(0.0))
                    .col(ColumnDef::new(Artists::CompletedProjects).integer().not_null().default(0))
                    .col(ColumnDef::new(Artists::Rating).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Artists::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Artists::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Artists::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Artists {
    Table,
    Id,
    Name,
    Genre,
    Bio,
    WalletAddress,
    AvatarUrl,
    Verified,
    Followers,
    TotalRaised,
    CompletedProjects,
    Rating,
    CreatedAt,
    UpdatedAt,
}
