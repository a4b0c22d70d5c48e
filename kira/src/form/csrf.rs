//! CSRF token verification at the form boundary.

/// Checks the CSRF token submitted with a form.
///
/// The token is read from the raw data field named by
/// `ValidationConfig::csrf_field`; where the expected token lives (session,
/// signed cookie) is up to the implementation.
#[cfg_attr(test, mockall::automock)]
pub trait CsrfVerifier: Send + Sync {
    /// True when `token` is the expected one.
    fn verify(&self, token: &str) -> bool;
}

/// Compares against one fixed token.
#[derive(Clone)]
pub struct StaticTokenVerifier {
    token: String,
}

impl StaticTokenVerifier {
    /// Creates a verifier expecting `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl std::fmt::Debug for StaticTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenVerifier").finish_non_exhaustive()
    }
}

impl CsrfVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> bool {
        let expected = self.token.as_bytes();
        let given = token.as_bytes();
        // Constant time over the expected length.
        expected.len() == given.len()
            && expected
                .iter()
                .zip(given)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token() {
        let verifier = StaticTokenVerifier::new("s3cret");
        assert!(verifier.verify("s3cret"));
        assert!(!verifier.verify("s3cre"));
        assert!(!verifier.verify("S3cret"));
        assert!(!verifier.verify(""));
    }

    #[test]
    fn test_debug_hides_token() {
        let verifier = StaticTokenVerifier::new("s3cret");
        assert!(!format!("{verifier:?}").contains("s3cret"));
    }
}
