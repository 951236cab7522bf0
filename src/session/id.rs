// Session identifier generation

use super::error::SessionError;
use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use rand::RngCore;
use rand::rngs::OsRng;

/// Number of random bytes behind each session identifier
pub const SESSION_ID_BYTES: usize = 64;

/// Length of an encoded identifier (padded URL-safe base64 of 64 bytes)
pub const SESSION_ID_LEN: usize = 88;

/// Generate a session identifier from the OS random source
pub fn generate_session_id() -> Result<String, SessionError> {
    generate_session_id_with(&mut OsRng)
}

/// Generate a session identifier from the given random source.
/// Fails instead of returning an empty identifier when the source errors.
pub fn generate_session_id_with<R: RngCore + ?Sized>(rng: &mut R) -> Result<String, SessionError> {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| SessionError::RandomnessFailure(e.to_string()))?;

    Ok(URL_SAFE.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use std::collections::HashSet;

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source unavailable"))
        }
    }

    #[test]
    fn test_session_id_format() {
        let id = generate_session_id().unwrap();

        assert_eq!(id.len(), SESSION_ID_LEN);
        assert!(
            id.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '=')
        );

        let decoded = URL_SAFE.decode(&id).unwrap();
        assert_eq!(decoded.len(), SESSION_ID_BYTES);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let ids: HashSet<String> = (0..100).map(|_| generate_session_id().unwrap()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_randomness_failure_is_reported() {
        let result = generate_session_id_with(&mut FailingRng);

        match result {
            Err(SessionError::RandomnessFailure(msg)) => {
                assert!(msg.contains("entropy source unavailable"))
            }
            other => panic!("expected RandomnessFailure, got {:?}", other),
        }
    }
}
