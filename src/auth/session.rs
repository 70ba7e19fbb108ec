//! Session token generation

use uuid::Uuid;

/// Generate a fresh session token
///
/// UUID v4 textual form: 122 random bits from the OS CSPRNG, which
/// makes collisions over the process lifetime implausible and tokens
/// unguessable.
pub fn new_token() -> String {
    Uuid::new_v4().to_string()
}
