//! Outbound protocol calls to the counterparty: success notifications on
//! challenge issuance / activation / revocation and error compensation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::consent;
use crate::entities::consent::CREDENTIAL_TYPE_FIDO;
use crate::scopes::ExternalScope;
use crate::settings::Participant;

pub const FSPIOP_SOURCE: &str = "fspiop-source";
pub const FSPIOP_DESTINATION: &str = "fspiop-destination";

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("outbound request failed: {0}")]
    Transport(String),
    #[error("peer answered with status {0}")]
    Status(u16),
    #[error("request body could not be constructed: {0}")]
    BodyConstruction(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundChallenge {
    pub payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundCredential {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub credential_type: String,
    pub status: String,
    pub challenge: OutboundChallenge,
    /// Public key, present once the credential is activated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

/// Body of the full-replace notification sent on challenge issuance and
/// credential activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutConsentRequest {
    pub request_id: String,
    pub initiator_id: String,
    pub participant_id: String,
    pub scopes: Vec<ExternalScope>,
    pub credential: OutboundCredential,
}

impl PutConsentRequest {
    /// Build the outbound body from stored consent state. Fails when the
    /// consent has no issued challenge or credential status yet.
    pub fn from_consent(
        consent: &consent::Model,
        scopes: Vec<ExternalScope>,
        signature: Option<String>,
    ) -> Result<Self, NotifierError> {
        let challenge = consent
            .credential_challenge
            .clone()
            .ok_or(NotifierError::BodyConstruction("missing credential challenge"))?;
        let status = consent
            .credential_status
            .clone()
            .ok_or(NotifierError::BodyConstruction("missing credential status"))?;
        let credential_type = consent
            .credential_type
            .clone()
            .unwrap_or_else(|| CREDENTIAL_TYPE_FIDO.to_string());

        Ok(Self {
            request_id: consent.id.clone(),
            initiator_id: consent.initiator_id.clone(),
            participant_id: consent.participant_id.clone(),
            scopes,
            credential: OutboundCredential {
                id: consent.credential_id.clone(),
                credential_type,
                status,
                challenge: OutboundChallenge {
                    payload: challenge,
                    signature,
                },
                payload: consent.credential_payload.clone(),
            },
        })
    }
}

/// Body of the partial-update notification sent on revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchConsentRequest {
    pub status: String,
    pub revoked_at: String,
}

impl PatchConsentRequest {
    pub fn from_consent(consent: &consent::Model) -> Result<Self, NotifierError> {
        let status = consent
            .status
            .clone()
            .ok_or(NotifierError::BodyConstruction("missing consent status"))?;
        let revoked_at = consent
            .revoked_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .ok_or(NotifierError::BodyConstruction("missing revocation timestamp"))?;

        Ok(Self {
            status,
            revoked_at: revoked_at.to_rfc3339(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInformation {
    pub error_code: String,
    pub error_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorNotification {
    pub error_information: ErrorInformation,
}

/// Outbound notifier contract consumed by the lifecycle orchestrator.
#[async_trait]
pub trait OutboundNotifier: Send + Sync {
    async fn put_consent(
        &self,
        consent_id: &str,
        body: &PutConsentRequest,
        destination: &str,
    ) -> Result<(), NotifierError>;

    async fn patch_consent(
        &self,
        consent_id: &str,
        body: &PatchConsentRequest,
        destination: &str,
    ) -> Result<(), NotifierError>;

    async fn put_consent_error(
        &self,
        consent_id: &str,
        body: &ErrorNotification,
        destination: &str,
    ) -> Result<(), NotifierError>;
}

/// Production notifier: relays notifications through the interoperability
/// switch with `fspiop-source`/`fspiop-destination` addressing.
pub struct HttpNotifier {
    client: reqwest::Client,
    base_url: String,
    source_id: String,
}

impl HttpNotifier {
    pub fn new(participant: &Participant) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: participant.peer_base_url.trim_end_matches('/').to_string(),
            source_id: participant.participant_id.clone(),
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        destination: &str,
    ) -> Result<(), NotifierError> {
        let response = request
            .header(FSPIOP_SOURCE, &self.source_id)
            .header(FSPIOP_DESTINATION, destination)
            .send()
            .await
            .map_err(|e| NotifierError::Transport(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotifierError::Status(response.status().as_u16()))
        }
    }
}

#[async_trait]
impl OutboundNotifier for HttpNotifier {
    async fn put_consent(
        &self,
        consent_id: &str,
        body: &PutConsentRequest,
        destination: &str,
    ) -> Result<(), NotifierError> {
        let url = format!("{}/consents/{}", self.base_url, consent_id);
        self.send(self.client.put(url).json(body), destination).await
    }

    async fn patch_consent(
        &self,
        consent_id: &str,
        body: &PatchConsentRequest,
        destination: &str,
    ) -> Result<(), NotifierError> {
        let url = format!("{}/consents/{}", self.base_url, consent_id);
        self.send(self.client.patch(url).json(body), destination)
            .await
    }

    async fn put_consent_error(
        &self,
        consent_id: &str,
        body: &ErrorNotification,
        destination: &str,
    ) -> Result<(), NotifierError> {
        let url = format!("{}/consents/{}/error", self.base_url, consent_id);
        self.send(self.client.put(url).json(body), destination).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consent_with_challenge() -> consent::Model {
        consent::Model {
            id: "1234".to_string(),
            initiator_id: "pisp-1".to_string(),
            participant_id: "dfsp-1".to_string(),
            status: None,
            credential_id: None,
            credential_type: Some("FIDO".to_string()),
            credential_status: Some("PENDING".to_string()),
            credential_challenge: Some("xyhdushsoa82w92mzs".to_string()),
            credential_payload: None,
            created_at: 1_700_000_000,
            revoked_at: None,
        }
    }

    #[test]
    fn test_put_body_from_pending_consent() {
        let body = PutConsentRequest::from_consent(&consent_with_challenge(), vec![], None)
            .expect("Failed to build body");

        assert_eq!(body.request_id, "1234");
        assert_eq!(body.credential.status, "PENDING");
        assert_eq!(body.credential.challenge.payload, "xyhdushsoa82w92mzs");
        assert_eq!(body.credential.challenge.signature, None);
        assert_eq!(body.credential.payload, None);

        let json = serde_json::to_value(&body).expect("Failed to serialize");
        assert_eq!(json["initiatorId"], "pisp-1");
        assert_eq!(json["credential"]["credentialType"], "FIDO");
        // Absent fields are omitted, not null
        assert!(json["credential"].get("id").is_none());
        assert!(json["credential"]["challenge"].get("signature").is_none());
    }

    #[test]
    fn test_put_body_requires_challenge() {
        let mut consent = consent_with_challenge();
        consent.credential_challenge = None;

        let err = PutConsentRequest::from_consent(&consent, vec![], None).unwrap_err();
        assert!(matches!(err, NotifierError::BodyConstruction(_)));
    }

    #[test]
    fn test_patch_body_from_revoked_consent() {
        let mut consent = consent_with_challenge();
        consent.status = Some("REVOKED".to_string());
        consent.revoked_at = Some(1_700_000_000);

        let body = PatchConsentRequest::from_consent(&consent).expect("Failed to build body");
        assert_eq!(body.status, "REVOKED");
        assert!(body.revoked_at.starts_with("2023-11-14T"));
    }

    #[test]
    fn test_patch_body_requires_revocation_fields() {
        let consent = consent_with_challenge();
        let err = PatchConsentRequest::from_consent(&consent).unwrap_err();
        assert!(matches!(err, NotifierError::BodyConstruction(_)));
    }
}
