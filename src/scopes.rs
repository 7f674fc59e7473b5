use crate::entities::scope;
use serde::{Deserialize, Serialize};

/// External representation of granted scopes: actions grouped per account,
/// as carried in outbound consent notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalScope {
    pub account_id: String,
    pub actions: Vec<String>,
}

/// Group scope rows by account id, preserving first-seen account order.
pub fn convert_scopes_to_external(scopes: &[scope::Model]) -> Vec<ExternalScope> {
    let mut external: Vec<ExternalScope> = Vec::new();
    for scope in scopes {
        match external
            .iter_mut()
            .find(|e| e.account_id == scope.account_id)
        {
            Some(entry) => entry.actions.push(scope.action.clone()),
            None => external.push(ExternalScope {
                account_id: scope.account_id.clone(),
                actions: vec![scope.action.clone()],
            }),
        }
    }
    external
}
