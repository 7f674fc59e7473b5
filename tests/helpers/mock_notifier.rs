use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lodestar::notifier::{
    ErrorNotification, NotifierError, OutboundNotifier, PatchConsentRequest, PutConsentRequest,
};

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    Put {
        consent_id: String,
        body: PutConsentRequest,
        destination: String,
    },
    Patch {
        consent_id: String,
        body: PatchConsentRequest,
        destination: String,
    },
    Error {
        consent_id: String,
        body: ErrorNotification,
        destination: String,
    },
}

/// Recording notifier for asserting on the outbound side of flows.
#[derive(Default)]
pub struct MockNotifier {
    calls: Mutex<Vec<NotifierCall>>,
}

impl MockNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<NotifierCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn put_bodies(&self) -> Vec<PutConsentRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                NotifierCall::Put { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn patch_bodies(&self) -> Vec<PatchConsentRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                NotifierCall::Patch { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }

    /// Error codes of recorded error notifications, in call order.
    pub fn error_codes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                NotifierCall::Error { body, .. } => Some(body.error_information.error_code),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: NotifierCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl OutboundNotifier for MockNotifier {
    async fn put_consent(
        &self,
        consent_id: &str,
        body: &PutConsentRequest,
        destination: &str,
    ) -> Result<(), NotifierError> {
        self.record(NotifierCall::Put {
            consent_id: consent_id.to_string(),
            body: body.clone(),
            destination: destination.to_string(),
        });
        Ok(())
    }

    async fn patch_consent(
        &self,
        consent_id: &str,
        body: &PatchConsentRequest,
        destination: &str,
    ) -> Result<(), NotifierError> {
        self.record(NotifierCall::Patch {
            consent_id: consent_id.to_string(),
            body: body.clone(),
            destination: destination.to_string(),
        });
        Ok(())
    }

    async fn put_consent_error(
        &self,
        consent_id: &str,
        body: &ErrorNotification,
        destination: &str,
    ) -> Result<(), NotifierError> {
        self.record(NotifierCall::Error {
            consent_id: consent_id.to_string(),
            body: body.clone(),
            destination: destination.to_string(),
        });
        Ok(())
    }
}
