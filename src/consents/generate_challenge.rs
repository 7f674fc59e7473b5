use tracing::warn;

use super::{ConsentError, ConsentService};
use crate::entities::consent::{CredentialStatus, CREDENTIAL_TYPE_FIDO};
use crate::notifier::PutConsentRequest;
use crate::scopes::convert_scopes_to_external;
use crate::storage::{self, ConsentCredential};
use crate::{challenge, validators};

impl ConsentService {
    /// Retrieve the consent, validate the requester, generate (or reuse)
    /// the challenge, and notify the counterparty with the full consent
    /// body.
    pub(super) async fn generate_challenge_inner(
        &self,
        id: &str,
        request_source_id: &str,
    ) -> Result<(), ConsentError> {
        let mut consent = storage::retrieve_consent(self.db(), id).await.map_err(|e| {
            warn!(consent_id = id, %e, "failed to retrieve consent");
            ConsentError::Database(id.to_string())
        })?;

        if !validators::is_valid_source(&consent, request_source_id) {
            return Err(ConsentError::InvalidInitiatorSource(id.to_string()));
        }

        // Revoked consent must never be touched again
        if consent.is_revoked() {
            return Err(ConsentError::RevokedConsentStatus(id.to_string()));
        }

        if consent.credential_challenge.is_none() {
            let value = challenge::generate().map_err(|e| {
                warn!(consent_id = id, %e, "challenge generation failed");
                ConsentError::ChallengeGeneration(id.to_string())
            })?;

            consent = storage::update_consent_credential(
                self.db(),
                id,
                ConsentCredential {
                    credential_id: None,
                    credential_type: CREDENTIAL_TYPE_FIDO.to_string(),
                    credential_status: CredentialStatus::Pending,
                    credential_challenge: Some(value),
                    credential_payload: None,
                },
            )
            .await
            .map_err(|e| {
                warn!(consent_id = id, %e, "failed to persist generated challenge");
                ConsentError::Database(id.to_string())
            })?;
        } else if consent.has_active_credential() {
            return Err(ConsentError::ActiveConsentChallengeRequest(id.to_string()));
        }
        // A pending challenge already exists: reuse it (idempotent retry)

        let scopes = storage::retrieve_all_scopes(self.db(), id).await.map_err(|e| {
            warn!(consent_id = id, %e, "failed to retrieve scopes");
            ConsentError::Database(id.to_string())
        })?;
        let scopes = convert_scopes_to_external(&scopes);

        let body = PutConsentRequest::from_consent(&consent, scopes, None).map_err(|e| {
            warn!(consent_id = id, %e, "failed to build put consent body");
            ConsentError::PutRequestCreation(id.to_string())
        })?;

        // Delivery failure of the success notification is terminal for this
        // flow; no further compensation is attempted.
        if let Err(e) = self
            .notifier()
            .put_consent(id, &body, request_source_id)
            .await
        {
            warn!(consent_id = id, %e, "put consent notification not delivered");
        }

        Ok(())
    }
}
