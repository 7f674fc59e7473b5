use crate::entities;
use crate::entities::consent::{ConsentStatus, CredentialStatus};
use crate::errors::LodestarError;
use crate::settings::Database as DbCfg;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use migration::MigratorTrait;

/// Fields supplied by the party registering a consent. Everything else
/// starts out null; `created_at` is set at insert time.
#[derive(Debug, Clone)]
pub struct NewConsent {
    pub id: String,
    pub initiator_id: String,
    pub participant_id: String,
}

#[derive(Debug, Clone)]
pub struct NewScope {
    pub action: String,
    pub account_id: String,
}

/// Credential fields persisted together during challenge issuance and
/// activation.
#[derive(Debug, Clone)]
pub struct ConsentCredential {
    pub credential_id: Option<String>,
    pub credential_type: String,
    pub credential_status: CredentialStatus,
    pub credential_challenge: Option<String>,
    pub credential_payload: Option<String>,
}

pub async fn init(cfg: &DbCfg) -> Result<DatabaseConnection, LodestarError> {
    let db = Database::connect(&cfg.url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Insert a new consent row. Fails on a duplicate id (primary key).
pub async fn register_consent(
    db: &DatabaseConnection,
    input: NewConsent,
) -> Result<entities::consent::Model, LodestarError> {
    let consent = entities::consent::ActiveModel {
        id: Set(input.id),
        initiator_id: Set(input.initiator_id),
        participant_id: Set(input.participant_id),
        status: Set(None),
        credential_id: Set(None),
        credential_type: Set(None),
        credential_status: Set(None),
        credential_challenge: Set(None),
        credential_payload: Set(None),
        created_at: Set(Utc::now().timestamp()),
        revoked_at: Set(None),
    };

    Ok(consent.insert(db).await?)
}

pub async fn retrieve_consent(
    db: &DatabaseConnection,
    id: &str,
) -> Result<entities::consent::Model, LodestarError> {
    entities::Consent::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| LodestarError::not_found("Consent", id))
}

/// Full update of a consent's mutable fields. `initiator_id`,
/// `participant_id` and `created_at` are immutable and left untouched.
pub async fn update_consent(
    db: &DatabaseConnection,
    consent: &entities::consent::Model,
) -> Result<entities::consent::Model, LodestarError> {
    let existing = retrieve_consent(db, &consent.id).await?;

    let mut active = existing.into_active_model();
    active.status = Set(consent.status.clone());
    active.credential_id = Set(consent.credential_id.clone());
    active.credential_type = Set(consent.credential_type.clone());
    active.credential_status = Set(consent.credential_status.clone());
    active.credential_challenge = Set(consent.credential_challenge.clone());
    active.credential_payload = Set(consent.credential_payload.clone());
    active.revoked_at = Set(consent.revoked_at);

    Ok(active.update(db).await?)
}

/// Delete a consent by id. Associated scope rows are removed by the
/// cascade on `scopes.consent_id`.
pub async fn delete_consent(db: &DatabaseConnection, id: &str) -> Result<(), LodestarError> {
    retrieve_consent(db, id).await?;
    entities::Consent::delete_by_id(id).exec(db).await?;
    Ok(())
}

pub async fn add_scopes(
    db: &DatabaseConnection,
    consent_id: &str,
    scopes: Vec<NewScope>,
) -> Result<(), LodestarError> {
    if scopes.is_empty() {
        return Ok(());
    }

    let models = scopes.into_iter().map(|s| entities::scope::ActiveModel {
        id: Default::default(),
        consent_id: Set(consent_id.to_string()),
        action: Set(s.action),
        account_id: Set(s.account_id),
    });

    entities::Scope::insert_many(models).exec(db).await?;
    Ok(())
}

pub async fn retrieve_all_scopes(
    db: &DatabaseConnection,
    consent_id: &str,
) -> Result<Vec<entities::scope::Model>, LodestarError> {
    use entities::scope::{Column, Entity};

    Ok(Entity::find()
        .filter(Column::ConsentId.eq(consent_id))
        .all(db)
        .await?)
}

/// Persist the credential fields of a consent in one write.
pub async fn update_consent_credential(
    db: &DatabaseConnection,
    id: &str,
    credential: ConsentCredential,
) -> Result<entities::consent::Model, LodestarError> {
    let existing = retrieve_consent(db, id).await?;

    let mut active = existing.into_active_model();
    active.credential_id = Set(credential.credential_id);
    active.credential_type = Set(Some(credential.credential_type));
    active.credential_status = Set(Some(credential.credential_status.as_str().to_string()));
    active.credential_challenge = Set(credential.credential_challenge);
    active.credential_payload = Set(credential.credential_payload);

    Ok(active.update(db).await?)
}

/// Transition a consent to REVOKED. Revoking an already-revoked consent
/// is a no-op that returns the stored model unchanged.
pub async fn revoke_consent_status(
    db: &DatabaseConnection,
    consent: entities::consent::Model,
) -> Result<entities::consent::Model, LodestarError> {
    if consent.is_revoked() {
        return Ok(consent);
    }

    let mut active = consent.into_active_model();
    active.status = Set(Some(ConsentStatus::Revoked.as_str().to_string()));
    active.revoked_at = Set(Some(Utc::now().timestamp()));

    Ok(active.update(db).await?)
}
