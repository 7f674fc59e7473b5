use thiserror::Error;

use crate::notifier::{ErrorInformation, ErrorNotification};

/// Closed taxonomy of consent flow failures. Every variant carries the
/// consent id it concerns; `Internal` is the catch-all for unclassified
/// faults, which are logged but never reported to the counterparty.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsentError {
    #[error("database request failed for consent {0}")]
    Database(String),

    #[error("consent {0} not found")]
    NotFound(String),

    #[error("request source is not the initiator or participant of consent {0}")]
    InvalidInitiatorSource(String),

    #[error("consent {0} is revoked and cannot be modified")]
    RevokedConsentStatus(String),

    #[error("consent {0} already has an active credential")]
    ActiveConsentChallengeRequest(String),

    #[error("challenge generation failed for consent {0}")]
    ChallengeGeneration(String),

    #[error("outbound request body could not be constructed for consent {0}")]
    PutRequestCreation(String),

    #[error("challenge for consent {0} is missing, malformed or does not match")]
    IncorrectChallenge(String),

    #[error("credential status for consent {0} is not valid for activation")]
    IncorrectStatus(String),

    #[error("internal error for consent {0}: {1}")]
    Internal(String, String),
}

impl ConsentError {
    pub fn consent_id(&self) -> &str {
        match self {
            ConsentError::Database(id)
            | ConsentError::NotFound(id)
            | ConsentError::InvalidInitiatorSource(id)
            | ConsentError::RevokedConsentStatus(id)
            | ConsentError::ActiveConsentChallengeRequest(id)
            | ConsentError::ChallengeGeneration(id)
            | ConsentError::PutRequestCreation(id)
            | ConsentError::IncorrectChallenge(id)
            | ConsentError::IncorrectStatus(id)
            | ConsentError::Internal(id, _) => id,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ConsentError::Database(_) => "6201",
            ConsentError::NotFound(_) => "6202",
            ConsentError::InvalidInitiatorSource(_) => "6203",
            ConsentError::RevokedConsentStatus(_) => "6204",
            ConsentError::ActiveConsentChallengeRequest(_) => "6205",
            ConsentError::ChallengeGeneration(_) => "6206",
            ConsentError::PutRequestCreation(_) => "6207",
            ConsentError::IncorrectChallenge(_) => "6208",
            ConsentError::IncorrectStatus(_) => "6209",
            ConsentError::Internal(_, _) => "2001",
        }
    }

    /// Protocol-reportable errors trigger an outbound error notification;
    /// unclassified internal faults are logged only.
    pub fn is_protocol_reportable(&self) -> bool {
        match self {
            ConsentError::Database(_)
            | ConsentError::NotFound(_)
            | ConsentError::InvalidInitiatorSource(_)
            | ConsentError::RevokedConsentStatus(_)
            | ConsentError::ActiveConsentChallengeRequest(_)
            | ConsentError::ChallengeGeneration(_)
            | ConsentError::PutRequestCreation(_)
            | ConsentError::IncorrectChallenge(_)
            | ConsentError::IncorrectStatus(_) => true,
            ConsentError::Internal(_, _) => false,
        }
    }

    pub fn to_error_notification(&self) -> Option<ErrorNotification> {
        if !self.is_protocol_reportable() {
            return None;
        }
        Some(ErrorNotification {
            error_information: ErrorInformation {
                error_code: self.error_code().to_string(),
                error_description: self.to_string(),
            },
        })
    }
}
