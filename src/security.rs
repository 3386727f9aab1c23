//! Security helpers (room ids, token nonces, cookie signing key)

use rand::Rng;
use sha2::{Digest, Sha512};
use tower_sessions::cookie::Key;

/// Generate a fresh room id for the room chooser.
pub fn generate_room_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Random nonce embedded in video access tokens.
pub fn generate_nonce() -> u32 {
    rand::rng().random_range(100_000..u32::MAX)
}

/// Derive the cookie signing key from the configured session secret.
///
/// The key only depends on the secret, so browser sessions survive restarts
/// as long as the secret is unchanged.
pub fn session_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_ids_are_unique() {
        let a = generate_room_id();
        let b = generate_room_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_key_is_stable() {
        let a = session_key("a-test-session-secret-that-is-long-enough");
        let b = session_key("a-test-session-secret-that-is-long-enough");
        let c = session_key("another-secret-that-is-also-long-enough!");
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }
}
