//! Consent lifecycle orchestration: the three asynchronous flows
//! (challenge issuance, credential activation, revocation) and the shared
//! classify-and-report failure boundary.

mod activate;
mod errors;
mod generate_challenge;
mod locks;
mod revoke;

pub use activate::CredentialActivation;
pub use errors::ConsentError;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{error, warn};

use crate::notifier::OutboundNotifier;
use locks::ConsentLocks;

/// The lifecycle state machine. Owns the transition logic exclusively;
/// durability belongs to the repository, and no consent state is cached
/// across flow invocations.
pub struct ConsentService {
    db: DatabaseConnection,
    notifier: Arc<dyn OutboundNotifier>,
    locks: ConsentLocks,
}

impl ConsentService {
    pub fn new(db: DatabaseConnection, notifier: Arc<dyn OutboundNotifier>) -> Self {
        Self {
            db,
            notifier,
            locks: ConsentLocks::new(),
        }
    }

    pub(crate) fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub(crate) fn notifier(&self) -> &dyn OutboundNotifier {
        self.notifier.as_ref()
    }

    /// Flow A: begin credential enrollment for a consent.
    pub async fn generate_challenge(&self, consent_id: &str, request_source_id: &str) {
        let _guard = self.locks.acquire(consent_id).await;
        let result = self
            .generate_challenge_inner(consent_id, request_source_id)
            .await;
        self.report(result, request_source_id).await;
    }

    /// Flow B: activate a credential from signed challenge material.
    pub async fn activate_credential(
        &self,
        consent_id: &str,
        activation: CredentialActivation,
        request_source_id: &str,
    ) {
        let _guard = self.locks.acquire(consent_id).await;
        let result = self
            .activate_credential_inner(consent_id, activation, request_source_id)
            .await;
        self.report(result, request_source_id).await;
    }

    /// Flow C: revoke a consent.
    pub async fn revoke(&self, consent_id: &str, request_source_id: &str) {
        let _guard = self.locks.acquire(consent_id).await;
        let result = self.revoke_inner(consent_id, request_source_id).await;
        self.report(result, request_source_id).await;
    }

    /// Shared failure boundary: log the classified error and, for
    /// protocol-reportable kinds, compensate with an outbound error
    /// notification addressed to the original requester.
    async fn report(&self, result: Result<(), ConsentError>, destination: &str) {
        let Err(err) = result else { return };

        error!(
            consent_id = err.consent_id(),
            code = err.error_code(),
            %err,
            "consent flow failed"
        );

        if let Some(body) = err.to_error_notification() {
            if let Err(notify_err) = self
                .notifier
                .put_consent_error(err.consent_id(), &body, destination)
                .await
            {
                warn!(
                    consent_id = err.consent_id(),
                    %notify_err,
                    "error notification could not be delivered"
                );
            }
        }
    }
}
