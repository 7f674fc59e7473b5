use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Enable foreign keys for SQLite
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Sqlite {
            manager
                .get_connection()
                .execute_unprepared("PRAGMA foreign_keys = ON")
                .await?;
        }

        // Consent id is assigned by the party that created the consent,
        // never generated here.
        manager
            .create_table(
                Table::create()
                    .table(Consents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Consents::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Consents::InitiatorId).string().not_null())
                    .col(ColumnDef::new(Consents::ParticipantId).string().not_null())
                    .col(ColumnDef::new(Consents::Status).string())
                    .col(ColumnDef::new(Consents::CredentialId).string())
                    .col(ColumnDef::new(Consents::CredentialType).string())
                    .col(ColumnDef::new(Consents::CredentialStatus).string())
                    .col(ColumnDef::new(Consents::CredentialChallenge).string())
                    .col(ColumnDef::new(Consents::CredentialPayload).string())
                    .col(ColumnDef::new(Consents::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Consents::RevokedAt).big_integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Scopes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scopes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Scopes::ConsentId).string().not_null())
                    .col(ColumnDef::new(Scopes::Action).string().not_null())
                    .col(ColumnDef::new(Scopes::AccountId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scopes_consent_id")
                            .from(Scopes::Table, Scopes::ConsentId)
                            .to(Consents::Table, Consents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on consent_id for scope lookups per consent
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scopes_consent_id")
                    .table(Scopes::Table)
                    .col(Scopes::ConsentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scopes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Consents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Consents {
    Table,
    Id,
    InitiatorId,
    ParticipantId,
    Status,
    CredentialId,
    CredentialType,
    CredentialStatus,
    CredentialChallenge,
    CredentialPayload,
    CreatedAt,
    RevokedAt,
}

#[derive(DeriveIden)]
enum Scopes {
    Table,
    Id,
    ConsentId,
    Action,
    AccountId,
}
