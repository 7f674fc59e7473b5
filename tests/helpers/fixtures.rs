use base64ct::{Base64, Encoding};
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;

/// Ed25519 keypair for exercising credential activation in tests.
pub struct TestKeypair {
    signing_key: SigningKey,
}

impl TestKeypair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Base64-encoded public key as submitted in the credential payload
    pub fn public_key_b64(&self) -> String {
        Base64::encode_string(self.signing_key.verifying_key().as_bytes())
    }

    /// Base64-encoded signature over `message`
    pub fn sign_b64(&self, message: &str) -> String {
        Base64::encode_string(&self.signing_key.sign(message.as_bytes()).to_bytes())
    }
}
