//! Random token generation.

/// Length of the `access_uuid` claim in issued tokens.
pub const TOKEN_ID_LENGTH: usize = 32;

/// Generates a random alphanumeric token of the given length.
///
/// # Example
///
/// ```rust
/// use analytics_sessions::crypto::generate_token;
///
/// let token = generate_token(32);
/// assert_eq!(token.len(), 32);
/// ```
pub fn generate_token(length: usize) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_length() {
        assert_eq!(generate_token(TOKEN_ID_LENGTH).len(), TOKEN_ID_LENGTH);
        assert_eq!(generate_token(8).len(), 8);
    }

    #[test]
    fn test_generate_token_unique_and_alphanumeric() {
        let a = generate_token(TOKEN_ID_LENGTH);
        let b = generate_token(TOKEN_ID_LENGTH);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
