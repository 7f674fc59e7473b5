//! Credential crypto: challenge generation and signature verification.

use base64ct::{Base64, Base64UrlUnpadded, Encoding};
use ed25519_dalek::{Signature, VerifyingKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChallengeError {
    #[error("challenge generation failed: {0}")]
    Generation(String),
    #[error("credential material could not be decoded: {0}")]
    Decode(String),
}

const CHALLENGE_BYTES: usize = 32;

/// Produce a cryptographically unpredictable opaque challenge token.
pub fn generate() -> Result<String, ChallengeError> {
    let mut bytes = [0u8; CHALLENGE_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| ChallengeError::Generation(e.to_string()))?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Verify an Ed25519 signature over `challenge` with a base64-encoded
/// public key. A mismatched or malformed signature is `Ok(false)`;
/// structurally unparsable inputs are a `Decode` error.
pub fn verify_signature(
    challenge: &str,
    signature: &str,
    public_key: &str,
) -> Result<bool, ChallengeError> {
    let key_bytes = Base64::decode_vec(public_key)
        .map_err(|e| ChallengeError::Decode(format!("public key: {}", e)))?;
    let key_bytes: [u8; PUBLIC_KEY_LENGTH] = key_bytes
        .as_slice()
        .try_into()
        .map_err(|_| ChallengeError::Decode("public key: expected 32 bytes".to_string()))?;

    let sig_bytes = Base64::decode_vec(signature)
        .map_err(|e| ChallengeError::Decode(format!("signature: {}", e)))?;
    let sig_bytes: [u8; SIGNATURE_LENGTH] = sig_bytes
        .as_slice()
        .try_into()
        .map_err(|_| ChallengeError::Decode("signature: expected 64 bytes".to_string()))?;

    // A well-formed key that is not a canonical curve point is a
    // verification failure, not a decode failure.
    let key = match VerifyingKey::from_bytes(&key_bytes) {
        Ok(key) => key,
        Err(_) => return Ok(false),
    };
    let sig = Signature::from_bytes(&sig_bytes);

    Ok(key.verify_strict(challenge.as_bytes(), &sig).is_ok())
}
