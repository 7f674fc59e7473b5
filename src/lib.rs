//! Lodestar - consent and credential authorization service
//!
//! This library implements the consent/credential core of a financial
//! interoperability network node: the Consent lifecycle state machine, the
//! FIDO-style challenge/signature credential flows, and the outbound
//! notification calls to the counterparty.
//! It exposes all modules for testing purposes.

pub mod challenge;
pub mod consents;
pub mod entities;
pub mod errors;
pub mod notifier;
pub mod scopes;
pub mod settings;
pub mod storage;
pub mod validators;
pub mod web;
