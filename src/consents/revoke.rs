use tracing::warn;

use super::{ConsentError, ConsentService};
use crate::notifier::PatchConsentRequest;
use crate::storage;
use crate::validators;

impl ConsentService {
    /// Transition the consent to REVOKED (idempotently) and notify the
    /// counterparty with a partial-update call describing the new status.
    pub(super) async fn revoke_inner(
        &self,
        id: &str,
        request_source_id: &str,
    ) -> Result<(), ConsentError> {
        let consent = storage::retrieve_consent(self.db(), id).await.map_err(|e| {
            warn!(consent_id = id, %e, "failed to retrieve consent");
            ConsentError::Database(id.to_string())
        })?;

        if !validators::is_valid_source(&consent, request_source_id) {
            return Err(ConsentError::InvalidInitiatorSource(id.to_string()));
        }

        // Already-revoked consents are left alone; the notification is
        // still sent
        let consent = storage::revoke_consent_status(self.db(), consent)
            .await
            .map_err(|e| {
                warn!(consent_id = id, %e, "failed to persist revocation");
                ConsentError::Database(id.to_string())
            })?;

        let body = PatchConsentRequest::from_consent(&consent).map_err(|e| {
            warn!(consent_id = id, %e, "failed to build patch consent body");
            ConsentError::PutRequestCreation(id.to_string())
        })?;

        if let Err(e) = self
            .notifier()
            .patch_consent(id, &body, request_source_id)
            .await
        {
            warn!(consent_id = id, %e, "patch consent notification not delivered");
        }

        Ok(())
    }
}
