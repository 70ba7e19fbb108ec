//! Authentication core: hashing, tokens, policy and scheme variants

pub mod password;
pub mod policy;
pub mod scheme;
pub mod session;

pub use password::PasswordHasher;
pub use policy::requires_auth;
pub use scheme::AuthScheme;
