//! Password hashing and session token adapters.

mod argon2_password_hasher;
mod jwt_token_service;

pub use argon2_password_hasher::{Argon2PasswordHasher, HashingParams};
pub use jwt_token_service::{JwtTokenService, TOKEN_TTL_HOURS};
