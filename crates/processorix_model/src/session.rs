//! # Session Codes
//!
//! A session is an isolated board identified by a short uppercase
//! alphanumeric code that participants type or share as a link. The
//! sentinel code `"NEW"` is never a real session: it instructs the app
//! to generate a fresh code and create the board under it.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of a generated session code.
pub const SESSION_CODE_LEN: usize = 4;

/// Sentinel code requesting a freshly generated session.
pub const NEW_SESSION_SENTINEL: &str = "NEW";

/// Alphabet for generated codes. Uppercase letters and digits only, so
/// codes survive being read out loud or scribbled on a whiteboard.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Identifier of a session (one shared board).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh session code.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let code: String = (0..SESSION_CODE_LEN)
            .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
            .collect();
        Self(code)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(raw: &str) -> Self {
        Self(raw.to_uppercase())
    }
}

/// What a raw session parameter from the entry surface asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionRequest {
    /// Join the session with the given code.
    Join(SessionId),
    /// Generate a code and create a new session.
    Create,
}

impl SessionRequest {
    /// Resolves a raw session parameter.
    ///
    /// `"NEW"` (any case) means create; anything else joins, with the
    /// code normalized to uppercase.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case(NEW_SESSION_SENTINEL) {
            Self::Create
        } else {
            Self::Join(SessionId::from(raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_code_format() {
        let mut rng = StdRng::seed_from_u64(5);
        let session = SessionId::generate(&mut rng);
        assert_eq!(session.as_str().len(), SESSION_CODE_LEN);
        assert!(session
            .as_str()
            .bytes()
            .all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_new_sentinel_requests_creation() {
        assert_eq!(SessionRequest::parse("NEW"), SessionRequest::Create);
        assert_eq!(SessionRequest::parse("new"), SessionRequest::Create);
        assert_eq!(
            SessionRequest::parse("abcd"),
            SessionRequest::Join(SessionId::from("ABCD"))
        );
    }
}
