//! Password hashing and verification using bcrypt

use crate::error::AppError;

/// Default work factor
pub const DEFAULT_COST: u32 = 10;

/// Password hasher with configurable work factor
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create hasher with the given bcrypt cost
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password
    ///
    /// bcrypt generates a fresh random salt per call, so hashing the same
    /// input twice never yields the same digest.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost).map_err(|e| {
            tracing::error!("Failed to hash password: {:?}", e);
            AppError::Internal(format!("Failed to hash password: {}", e))
        })
    }

    /// Verify a password against a stored digest
    ///
    /// Returns false on any mismatch, including a malformed digest. The
    /// comparison inside bcrypt is constant-time.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::debug!("Failed to parse password hash: {:?}", e);
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}
