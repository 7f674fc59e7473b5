use crate::entities::consent;

/// True iff the requester is the recorded initiator or participant for
/// the consent. Deterministic, no I/O.
pub fn is_valid_source(consent: &consent::Model, request_source_id: &str) -> bool {
    consent.initiator_id == request_source_id || consent.participant_id == request_source_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consent() -> consent::Model {
        consent::Model {
            id: "1234".to_string(),
            initiator_id: "pisp-1".to_string(),
            participant_id: "dfsp-1".to_string(),
            status: None,
            credential_id: None,
            credential_type: None,
            credential_status: None,
            credential_challenge: None,
            credential_payload: None,
            created_at: 0,
            revoked_at: None,
        }
    }

    #[test]
    fn test_initiator_is_valid_source() {
        assert!(is_valid_source(&consent(), "pisp-1"));
    }

    #[test]
    fn test_participant_is_valid_source() {
        assert!(is_valid_source(&consent(), "dfsp-1"));
    }

    #[test]
    fn test_other_party_is_not_valid_source() {
        assert!(!is_valid_source(&consent(), "dfsp-2"));
        assert!(!is_valid_source(&consent(), ""));
    }
}
