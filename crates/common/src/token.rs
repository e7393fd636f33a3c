//! Session token generation.

use uuid::Uuid;

/// Generator for opaque session tokens.
#[derive(Debug, Clone, Default)]
pub struct TokenGenerator {
    _private: (),
}

impl TokenGenerator {
    /// Create a new token generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a random session token.
    ///
    /// UUID v4 carries no time component, so tokens are not guessable from
    /// the moment they were issued.
    #[must_use]
    pub fn generate(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token() {
        let tokens = TokenGenerator::new();
        let a = tokens.generate();
        let b = tokens.generate();

        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
