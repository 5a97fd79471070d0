//! Cryptographic operations.
//!
//! - `password`: Argon2id password hashing with legacy SHA-256 verification

pub mod password;
