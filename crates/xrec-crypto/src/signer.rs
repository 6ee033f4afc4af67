use xrec_types::AccountId;

/// Ed25519 signing key (private).
pub struct SigningKey(ed25519_dalek::SigningKey);

/// Ed25519 verifying key (public).
#[derive(Clone, PartialEq, Eq)]
pub struct VerifyingKey(ed25519_dalek::VerifyingKey);

/// Ed25519 signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(ed25519_dalek::Signature);

impl SigningKey {
    /// Generate a new random signing key.
    pub fn generate() -> Self {
        let mut csprng = rand::thread_rng();
        Self(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    /// Create from raw 32-byte secret.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&bytes))
    }

    /// The corresponding public verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        use ed25519_dalek::Signer;
        Signature(self.0.sign(message))
    }
}

impl VerifyingKey {
    pub const LEN: usize = 32;

    /// Verify a signature on a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        use ed25519_dalek::Verifier;
        self.0
            .verify(message, &signature.0)
            .map_err(|_| SignatureError::InvalidSignature)
    }

    /// Account controlled by this key: the first 160 bits of a
    /// domain-separated BLAKE3 hash of the public key.
    pub fn account_id(&self) -> AccountId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"xrec-account-v1:");
        hasher.update(self.0.as_bytes());
        let hash = hasher.finalize();
        let mut raw = [0u8; 20];
        raw.copy_from_slice(&hash.as_bytes()[..20]);
        AccountId::from_array(raw)
    }

    /// Raw public key bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Parse a public key from a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| SignatureError::InvalidKey)?;
        let key = ed25519_dalek::VerifyingKey::from_bytes(&arr)
            .map_err(|_| SignatureError::InvalidKey)?;
        Ok(Self(key))
    }
}

impl Signature {
    pub const LEN: usize = 64;

    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_bytes()
    }

    /// Parse a signature from a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| SignatureError::InvalidSignature)?;
        Ok(Self(ed25519_dalek::Signature::from_bytes(&arr)))
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningKey(<redacted>)")
    }
}

impl std::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VerifyingKey({})", hex::encode(self.0.to_bytes()))
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", hex::encode(&self.0.to_bytes()[..8]))
    }
}

/// Errors from signing operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid key")]
    InvalidKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let sk = SigningKey::generate();
        let vk = sk.verifying_key();
        let sig = sk.sign(b"payload");
        assert!(vk.verify(b"payload", &sig).is_ok());
        assert_eq!(vk.verify(b"tampered", &sig), Err(SignatureError::InvalidSignature));
    }

    #[test]
    fn verify_fails_with_wrong_key() {
        let sig = SigningKey::generate().sign(b"message");
        assert!(SigningKey::generate().verifying_key().verify(b"message", &sig).is_err());
    }

    #[test]
    fn deterministic_from_seed() {
        let a = SigningKey::from_bytes([5; 32]);
        let b = SigningKey::from_bytes([5; 32]);
        assert_eq!(a.verifying_key(), b.verifying_key());
        assert_eq!(a.sign(b"x"), b.sign(b"x"));
    }

    #[test]
    fn account_id_is_stable() {
        let vk = SigningKey::from_bytes([1; 32]).verifying_key();
        assert_eq!(vk.account_id(), vk.account_id());
        assert_ne!(vk.account_id(), SigningKey::from_bytes([2; 32]).verifying_key().account_id());
    }

    #[test]
    fn byte_roundtrips() {
        let sk = SigningKey::from_bytes([9; 32]);
        let vk = sk.verifying_key();
        assert_eq!(VerifyingKey::from_slice(&vk.to_bytes()).unwrap(), vk);
        let sig = sk.sign(b"m");
        assert_eq!(Signature::from_slice(&sig.to_bytes()).unwrap(), sig);
        assert_eq!(Signature::from_slice(&[0u8; 10]), Err(SignatureError::InvalidSignature));
        assert!(matches!(VerifyingKey::from_slice(&[1, 2]), Err(SignatureError::InvalidKey)));
    }

    #[test]
    fn debug_redacts_signing_key() {
        let debug = format!("{:?}", SigningKey::generate());
        assert!(debug.contains("redacted"));
    }
}
