//! Create `swift_codes` table.
//! One row per SWIFT/BIC code; branches point at their headquarters by code
//! only, so there is deliberately no foreign key on `headquarter_swift_code`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SwiftCodes::Table)
                    .if_not_exists()
                    .col(string_len(SwiftCodes::SwiftCode, 11).primary_key())
                    .col(string(SwiftCodes::BankName).not_null())
                    .col(string(SwiftCodes::Address).not_null())
                    .col(string_len(SwiftCodes::CountryIso2, 2).not_null())
                    .col(string(SwiftCodes::CountryName).not_null())
                    .col(boolean(SwiftCodes::IsHeadquarter).not_null())
                    .col(string_len_null(SwiftCodes::HeadquarterSwiftCode, 11))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SwiftCodes::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SwiftCodes {
    Table,
    SwiftCode,
    BankName,
    Address,
    CountryIso2,
    CountryName,
    IsHeadquarter,
    HeadquarterSwiftCode,
}
