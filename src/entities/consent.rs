use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The only credential type currently issued.
pub const CREDENTIAL_TYPE_FIDO: &str = "FIDO";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "consents")]
pub struct Model {
    /// Assigned by the party that created the consent, not generated here.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub initiator_id: String,
    pub participant_id: String,
    /// "ACTIVE" | "REVOKED"; `None` means the consent is not yet finalized.
    pub status: Option<String>,
    pub credential_id: Option<String>,
    pub credential_type: Option<String>,
    /// "PENDING" | "ACTIVE"; transitions only forward.
    pub credential_status: Option<String>,
    pub credential_challenge: Option<String>,
    /// Holds the public key once the credential is activated.
    pub credential_payload: Option<String>,
    pub created_at: i64,
    pub revoked_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::scope::Entity")]
    Scope,
}

impl Related<super::scope::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scope.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentStatus {
    Active,
    Revoked,
}

impl ConsentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentStatus::Active => "ACTIVE",
            ConsentStatus::Revoked => "REVOKED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(ConsentStatus::Active),
            "REVOKED" => Some(ConsentStatus::Revoked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    Pending,
    Active,
}

impl CredentialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialStatus::Pending => "PENDING",
            CredentialStatus::Active => "ACTIVE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(CredentialStatus::Pending),
            "ACTIVE" => Some(CredentialStatus::Active),
            _ => None,
        }
    }
}

impl Model {
    /// A revoked consent is frozen; no credential mutation is permitted.
    pub fn is_revoked(&self) -> bool {
        self.status.as_deref() == Some(ConsentStatus::Revoked.as_str())
    }

    pub fn has_active_credential(&self) -> bool {
        self.credential_status.as_deref() == Some(CredentialStatus::Active.as_str())
    }
}
