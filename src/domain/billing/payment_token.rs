//! Opaque payment tokens.
//!
//! The token handed to the client at order time names the PlanPayment it
//! belongs to. It is `hex(nonce || XChaCha20-Poly1305(id))` under a
//! service-held key, so clients can neither read nor forge it, and a fresh
//! random nonce makes every token for the same id different.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand_core::{OsRng, RngCore};
use thiserror::Error;

use crate::domain::foundation::PlanPaymentId;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 24;
const ID_LEN: usize = 16;
const TAG_LEN: usize = 16;
const TOKEN_AAD: &[u8] = b"nexus-billing/plan-payment-token/v1";

/// Errors from building a codec or handling a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token key must be {expected} hex-encoded bytes")]
    InvalidKey { expected: usize },

    #[error("token encryption failed")]
    EncryptFailed,

    #[error("token could not be decoded")]
    DecodeFailed,
}

/// Encrypts and decrypts payment tokens with a fixed service key.
pub struct PaymentTokenCodec {
    cipher: XChaCha20Poly1305,
}

impl PaymentTokenCodec {
    /// Creates a codec from raw key bytes.
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: XChaCha20Poly1305::new(Key::from_slice(key)),
        }
    }

    /// Creates a codec from a 64-character hex key.
    pub fn from_hex(key_hex: &str) -> Result<Self, TokenError> {
        let bytes = hex::decode(key_hex.trim())
            .map_err(|_| TokenError::InvalidKey { expected: KEY_LEN })?;
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| TokenError::InvalidKey { expected: KEY_LEN })?;
        Ok(Self::new(&key))
    }

    /// Produces a fresh token for the payment id.
    pub fn encode(&self, id: PlanPaymentId) -> Result<String, TokenError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(
                XNonce::from_slice(&nonce_bytes),
                Payload {
                    msg: id.as_bytes(),
                    aad: TOKEN_AAD,
                },
            )
            .map_err(|_| TokenError::EncryptFailed)?;

        let mut token = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        token.extend_from_slice(&nonce_bytes);
        token.extend_from_slice(&ciphertext);
        Ok(hex::encode(token))
    }

    /// Recovers the payment id, rejecting anything not produced by `encode`
    /// under this key.
    pub fn decode(&self, token: &str) -> Result<PlanPaymentId, TokenError> {
        let raw = hex::decode(token.trim()).map_err(|_| TokenError::DecodeFailed)?;
        if raw.len() != NONCE_LEN + ID_LEN + TAG_LEN {
            return Err(TokenError::DecodeFailed);
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);

        let plaintext = self
            .cipher
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: TOKEN_AAD,
                },
            )
            .map_err(|_| TokenError::DecodeFailed)?;

        let bytes: [u8; ID_LEN] = plaintext
            .try_into()
            .map_err(|_| TokenError::DecodeFailed)?;
        Ok(PlanPaymentId::from_bytes(bytes))
    }
}

impl std::fmt::Debug for PaymentTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentTokenCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn codec() -> PaymentTokenCodec {
        PaymentTokenCodec::from_hex(KEY_HEX).unwrap()
    }

    #[test]
    fn round_trip_returns_same_id() {
        let id = PlanPaymentId::new();
        let token = codec().encode(id).unwrap();
        assert_eq!(codec().decode(&token).unwrap(), id);
    }

    #[test]
    fn tokens_for_same_id_differ() {
        let id = PlanPaymentId::new();
        let codec = codec();
        assert_ne!(codec.encode(id).unwrap(), codec.encode(id).unwrap());
    }

    #[test]
    fn token_does_not_reveal_id() {
        let id = PlanPaymentId::new();
        let token = codec().encode(id).unwrap();
        assert!(!token.contains(&hex::encode(id.as_bytes())));
    }

    #[test]
    fn wrong_key_cannot_decode() {
        let token = codec().encode(PlanPaymentId::new()).unwrap();
        let other = PaymentTokenCodec::new(&[7u8; 32]);
        assert_eq!(other.decode(&token), Err(TokenError::DecodeFailed));
    }

    #[test]
    fn garbage_and_truncated_tokens_are_rejected() {
        let token = codec().encode(PlanPaymentId::new()).unwrap();
        assert_eq!(codec().decode("zz"), Err(TokenError::DecodeFailed));
        assert_eq!(codec().decode(""), Err(TokenError::DecodeFailed));
        assert_eq!(codec().decode(&token[..token.len() - 2]), Err(TokenError::DecodeFailed));
        assert_eq!(codec().decode(&format!("{}00", token)), Err(TokenError::DecodeFailed));
    }

    #[test]
    fn every_flipped_byte_is_rejected() {
        let codec = codec();
        let token = codec.encode(PlanPaymentId::new()).unwrap();
        let raw = hex::decode(&token).unwrap();

        for i in 0..raw.len() {
            let mut tampered = raw.clone();
            tampered[i] ^= 0x01;
            assert_eq!(
                codec.decode(&hex::encode(&tampered)),
                Err(TokenError::DecodeFailed),
                "byte {} flipped",
                i
            );
        }
    }

    #[test]
    fn key_must_be_32_hex_bytes() {
        assert!(PaymentTokenCodec::from_hex("abcd").is_err());
        assert!(PaymentTokenCodec::from_hex(&"g".repeat(64)).is_err());
        assert!(PaymentTokenCodec::from_hex(&"ab".repeat(33)).is_err());
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(bytes in any::<[u8; 16]>()) {
            let id = PlanPaymentId::from_uuid(Uuid::from_bytes(bytes));
            let codec = codec();
            prop_assert_eq!(codec.decode(&codec.encode(id).unwrap()), Ok(id));
        }

        #[test]
        fn corrupting_any_single_byte_fails(index in 0usize..56, flip in 1u8..=255) {
            let codec = codec();
            let raw = hex::decode(codec.encode(PlanPaymentId::new()).unwrap()).unwrap();
            let mut tampered = raw;
            tampered[index] ^= flip;
            prop_assert_eq!(codec.decode(&hex::encode(&tampered)), Err(TokenError::DecodeFailed));
        }
    }
}
