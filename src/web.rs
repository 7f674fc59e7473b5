//! HTTP transport for the three inbound triggers. Every trigger is
//! acknowledged with 202 Accepted immediately; the flow itself runs as a
//! detached task and reports failures over the outbound notification
//! channel, never synchronously.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::consents::{ConsentService, CredentialActivation};
use crate::errors::LodestarError;
use crate::notifier::FSPIOP_SOURCE;
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConsentService>,
}

pub fn router(service: Arc<ConsentService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/consents/:id/generateChallenge", post(generate_challenge))
        .route("/consents/:id", put(put_consent))
        .route("/consents/:id/revoke", post(revoke))
        .with_state(AppState { service })
}

pub async fn serve(settings: Settings, service: Arc<ConsentService>) -> Result<(), LodestarError> {
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .map_err(|e| LodestarError::Other(format!("Invalid listen address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router(service)).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

fn request_source(headers: &HeaderMap) -> String {
    headers
        .get(FSPIOP_SOURCE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// POST /consents/{id}/generateChallenge - begin credential enrollment.
async fn generate_challenge(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    let source = request_source(&headers);
    let service = state.service.clone();
    // Detached: the acknowledgment never waits for the flow, and a panic
    // inside the task cannot reach the ack path
    tokio::spawn(async move {
        service.generate_challenge(&id, &source).await;
    });

    StatusCode::ACCEPTED
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InboundChallenge {
    payload: String,
    signature: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InboundCredential {
    id: String,
    status: String,
    /// Public key material
    payload: String,
    challenge: InboundChallenge,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PutConsentBody {
    credential: InboundCredential,
}

/// PUT /consents/{id} - counterparty submits signed challenge material.
async fn put_consent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<PutConsentBody>,
) -> StatusCode {
    let source = request_source(&headers);
    let activation = CredentialActivation {
        credential_id: body.credential.id,
        credential_status: body.credential.status,
        challenge: body.credential.challenge.payload,
        signature: body.credential.challenge.signature,
        public_key: body.credential.payload,
    };

    let service = state.service.clone();
    tokio::spawn(async move {
        service.activate_credential(&id, activation, &source).await;
    });

    StatusCode::ACCEPTED
}

/// POST /consents/{id}/revoke - either party requests revocation.
async fn revoke(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    let source = request_source(&headers);
    let service = state.service.clone();
    tokio::spawn(async move {
        service.revoke(&id, &source).await;
    });

    StatusCode::ACCEPTED
}
