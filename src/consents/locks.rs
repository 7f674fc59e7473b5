use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// In-process advisory locks keyed by consent id. Serializes the
/// read-modify-write sequence of flows racing on the same consent;
/// entries are retained for the lifetime of the process.
#[derive(Default)]
pub struct ConsentLocks {
    inner: DashMap<String, Arc<Mutex<()>>>,
}

impl ConsentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, consent_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .inner
            .entry(consent_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
