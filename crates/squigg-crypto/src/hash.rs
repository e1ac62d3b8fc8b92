use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Deterministic HMAC-SHA256 over credential strings.
///
/// A leaked document alone is not enough for a dictionary attack: the
/// attacker also needs the secret this hasher was built with.
#[derive(Clone)]
pub struct KeyedHasher {
    key: Vec<u8>,
}

impl KeyedHasher {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: secret.as_ref().to_vec(),
        }
    }

    /// Lowercase hex digest of `credential`.
    pub fn hash(&self, credential: &str) -> String {
        let mut mac = self.mac();
        mac.update(credential.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Constant-time check of `credential` against a digest produced by [`hash`](Self::hash).
    /// Malformed hex never verifies.
    pub fn verify(&self, credential: &str, expected_hex: &str) -> bool {
        let Ok(expected) = hex::decode(expected_hex) else {
            return false;
        };
        let mut mac = self.mac();
        mac.update(credential.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length")
    }
}

impl std::fmt::Debug for KeyedHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedHasher").finish_non_exhaustive()
    }
}
