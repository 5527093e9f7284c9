//! Authentication module - JWT tokens, password hashing, request guards

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use password::{hash_password, verify_password};
