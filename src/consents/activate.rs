use tracing::warn;

use super::{ConsentError, ConsentService};
use crate::challenge;
use crate::entities::consent;
use crate::entities::consent::{CredentialStatus, CREDENTIAL_TYPE_FIDO};
use crate::notifier::PutConsentRequest;
use crate::scopes::convert_scopes_to_external;
use crate::storage::{self, ConsentCredential};

/// Signed challenge material submitted by the counterparty to activate a
/// credential.
#[derive(Debug, Clone)]
pub struct CredentialActivation {
    pub credential_id: String,
    pub credential_status: String,
    pub challenge: String,
    pub signature: String,
    pub public_key: String,
}

impl ConsentService {
    /// Verify the submitted signature over the stored challenge and, on
    /// success, persist the credential as ACTIVE and notify the
    /// counterparty with signature and public key.
    pub(super) async fn activate_credential_inner(
        &self,
        id: &str,
        activation: CredentialActivation,
        request_source_id: &str,
    ) -> Result<(), ConsentError> {
        let consent = self.retrieve_valid_consent(id, &activation.challenge).await?;

        if consent.is_revoked() {
            return Err(ConsentError::RevokedConsentStatus(id.to_string()));
        }

        // The inbound credential status must describe the PENDING -> ACTIVE
        // transition being requested
        if CredentialStatus::parse(&activation.credential_status)
            != Some(CredentialStatus::Pending)
        {
            return Err(ConsentError::IncorrectStatus(id.to_string()));
        }

        match challenge::verify_signature(
            &activation.challenge,
            &activation.signature,
            &activation.public_key,
        ) {
            Ok(true) => {}
            Ok(false) => {
                // Rejected authentication attempt: no state change and no
                // outbound notification of either kind
                warn!(consent_id = id, "credential signature rejected");
                return Ok(());
            }
            Err(e) => {
                warn!(consent_id = id, %e, "credential material could not be decoded");
                return Err(ConsentError::IncorrectChallenge(id.to_string()));
            }
        }

        let consent = storage::update_consent_credential(
            self.db(),
            id,
            ConsentCredential {
                credential_id: Some(activation.credential_id),
                credential_type: CREDENTIAL_TYPE_FIDO.to_string(),
                credential_status: CredentialStatus::Active,
                credential_challenge: Some(activation.challenge),
                credential_payload: Some(activation.public_key),
            },
        )
        .await
        .map_err(|e| {
            warn!(consent_id = id, %e, "failed to persist activated credential");
            ConsentError::Database(id.to_string())
        })?;

        let scopes = storage::retrieve_all_scopes(self.db(), id).await.map_err(|e| {
            warn!(consent_id = id, %e, "failed to retrieve scopes");
            ConsentError::Database(id.to_string())
        })?;
        let scopes = convert_scopes_to_external(&scopes);

        let body = PutConsentRequest::from_consent(&consent, scopes, Some(activation.signature))
            .map_err(|e| {
                warn!(consent_id = id, %e, "failed to build put consent body");
                ConsentError::PutRequestCreation(id.to_string())
            })?;

        if let Err(e) = self
            .notifier()
            .put_consent(id, &body, request_source_id)
            .await
        {
            warn!(consent_id = id, %e, "put consent notification not delivered");
        }

        Ok(())
    }

    /// Load the consent and check the stored challenge against the inbound
    /// value in one step. A missing consent is `NotFound`; a missing or
    /// disagreeing challenge is `IncorrectChallenge`.
    async fn retrieve_valid_consent(
        &self,
        id: &str,
        challenge_value: &str,
    ) -> Result<consent::Model, ConsentError> {
        let consent = storage::retrieve_consent(self.db(), id).await.map_err(|e| {
            if e.is_not_found() {
                ConsentError::NotFound(id.to_string())
            } else {
                warn!(consent_id = id, %e, "failed to retrieve consent");
                ConsentError::Database(id.to_string())
            }
        })?;

        match consent.credential_challenge.as_deref() {
            Some(stored) if stored == challenge_value => Ok(consent),
            _ => Err(ConsentError::IncorrectChallenge(id.to_string())),
        }
    }
}
