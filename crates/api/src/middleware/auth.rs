//! # Authentication Module
//!
//! This module provides password hashing and verification for pursuits. A
//! pursuit's optional password gates the kickoff decision: only someone who
//! can present it (normally the pursuit creator) may schedule the kickoff or
//! change protected details.
//!
//! The implementation uses Argon2 so stored hashes resist rainbow tables and
//! brute force attempts.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use eyre::Result;
use uuid::Uuid;

/// Hashes a password using the Argon2 algorithm
///
/// Generates a fresh random salt per password and returns the hash in PHC
/// string format (algorithm, version, parameters, salt, and hash).
///
/// # Arguments
///
/// * `password` - The plain text password to hash
///
/// # Returns
///
/// * `Result<String>` - The hashed password string or an error
pub fn hash_password(password: &str) -> Result<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    // Create default Argon2 instance
    let argon2 = Argon2::default();

    // Hash the password with salt
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a password against the stored hash for a pursuit
///
/// Returns true when the password matches, and also when the pursuit has no
/// password set (an unprotected pursuit accepts any caller).
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `pursuit_id` - UUID of the pursuit to authenticate against
/// * `password` - Plain text password to verify
pub async fn verify_pursuit_password(
    pool: &sqlx::PgPool,
    pursuit_id: Uuid,
    password: &str,
) -> Result<bool> {
    // Delegate to the database repository for verification
    let is_valid =
        kickoff_db::repositories::pursuit::verify_password(pool, pursuit_id, password).await?;
    Ok(is_valid)
}
