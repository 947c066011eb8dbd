//! Payment gateway callback signature verification.
//!
//! After checkout the gateway hands the client an order id, a payment id
//! and `hex(HMAC-SHA256(key_secret, "{order_id}|{payment_id}"))`. Only the
//! gateway and this service know the key secret, so a matching signature
//! proves the payment happened.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Verifier for gateway checkout signatures.
pub struct GatewaySignatureVerifier {
    key_secret: SecretString,
}

impl GatewaySignatureVerifier {
    /// Creates a verifier with the gateway key secret.
    pub fn new(key_secret: SecretString) -> Self {
        Self { key_secret }
    }

    /// Checks a hex-encoded signature for the order/payment pair.
    ///
    /// Malformed hex counts as a mismatch. The comparison runs in constant
    /// time over the decoded MAC.
    pub fn verify(&self, order_id: &str, payment_id: &str, signature_hex: &str) -> bool {
        let supplied = match hex::decode(signature_hex.trim()) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let expected = self.compute_signature(order_id, payment_id);
        constant_time_compare(&expected, &supplied)
    }

    /// Hex signature the gateway would produce for this pair.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        hex::encode(self.compute_signature(order_id, payment_id))
    }

    fn compute_signature(&self, order_id: &str, payment_id: &str) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.key_secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key");
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for GatewaySignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySignatureVerifier").finish_non_exhaustive()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
