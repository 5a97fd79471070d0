//! Account services and the hashing port they depend on.

pub mod credential;
pub mod hash;
