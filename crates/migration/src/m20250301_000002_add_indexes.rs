use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Country listing
        manager
            .create_index(
                Index::create()
                    .name("idx_swift_codes_country_iso2")
                    .table(SwiftCodes::Table)
                    .col(SwiftCodes::CountryIso2)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Branch lookup by headquarters code
        manager
            .create_index(
                Index::create()
                    .name("idx_swift_codes_headquarter")
                    .table(SwiftCodes::Table)
                    .col(SwiftCodes::HeadquarterSwiftCode)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_swift_codes_country_iso2").table(SwiftCodes::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_swift_codes_headquarter").table(SwiftCodes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SwiftCodes { Table, CountryIso2, HeadquarterSwiftCode }
