use lodestar::entities;
use lodestar::entities::consent::{CredentialStatus, CREDENTIAL_TYPE_FIDO};
use lodestar::storage::{self, ConsentCredential, NewConsent, NewScope};
use sea_orm::DatabaseConnection;

/// Builder for seeding consents in various lifecycle states
pub struct ConsentBuilder {
    id: String,
    initiator_id: String,
    participant_id: String,
    scopes: Vec<NewScope>,
    challenge: Option<String>,
    active_credential: Option<(String, String)>,
    revoked: bool,
}

impl ConsentBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            initiator_id: "pisp-1".to_string(),
            participant_id: "dfsp-1".to_string(),
            scopes: Vec::new(),
            challenge: None,
            active_credential: None,
            revoked: false,
        }
    }

    pub fn with_parties(mut self, initiator_id: &str, participant_id: &str) -> Self {
        self.initiator_id = initiator_id.to_string();
        self.participant_id = participant_id.to_string();
        self
    }

    pub fn with_scope(mut self, action: &str, account_id: &str) -> Self {
        self.scopes.push(NewScope {
            action: action.to_string(),
            account_id: account_id.to_string(),
        });
        self
    }

    /// Seed an issued challenge with a PENDING credential
    pub fn with_pending_challenge(mut self, challenge: &str) -> Self {
        self.challenge = Some(challenge.to_string());
        self
    }

    /// Seed an ACTIVE credential; requires a challenge to be set as well
    pub fn with_active_credential(mut self, credential_id: &str, public_key: &str) -> Self {
        self.active_credential = Some((credential_id.to_string(), public_key.to_string()));
        self
    }

    pub fn revoked(mut self) -> Self {
        self.revoked = true;
        self
    }

    pub async fn create(self, db: &DatabaseConnection) -> entities::consent::Model {
        let mut consent = storage::register_consent(
            db,
            NewConsent {
                id: self.id,
                initiator_id: self.initiator_id,
                participant_id: self.participant_id,
            },
        )
        .await
        .expect("Failed to register test consent");

        if !self.scopes.is_empty() {
            storage::add_scopes(db, &consent.id, self.scopes)
                .await
                .expect("Failed to add test scopes");
        }

        if let Some(challenge) = &self.challenge {
            let (status, credential_id, payload) = match &self.active_credential {
                Some((credential_id, public_key)) => (
                    CredentialStatus::Active,
                    Some(credential_id.clone()),
                    Some(public_key.clone()),
                ),
                None => (CredentialStatus::Pending, None, None),
            };

            consent = storage::update_consent_credential(
                db,
                &consent.id,
                ConsentCredential {
                    credential_id,
                    credential_type: CREDENTIAL_TYPE_FIDO.to_string(),
                    credential_status: status,
                    credential_challenge: Some(challenge.clone()),
                    credential_payload: payload,
                },
            )
            .await
            .expect("Failed to seed test credential");
        }

        if self.revoked {
            consent = storage::revoke_consent_status(db, consent)
                .await
                .expect("Failed to revoke test consent");
        }

        consent
    }
}
