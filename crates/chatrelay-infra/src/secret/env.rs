//! Environment variable secret provider.
//!
//! Provider API keys are read from the process environment, which `.env`
//! has already been merged into by [`super::load_dotenv`]. Values are
//! wrapped in [`SecretString`] immediately so they never reach `Debug` output.

use secrecy::SecretString;

/// Read-only lookup of secrets in environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self
    }

    /// Look up `key`. Unset, empty and non-Unicode values all count as missing.
    pub fn get(&self, key: &str) -> Option<SecretString> {
        match std::env::var(key) {
            Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val.trim().to_string())),
            Ok(_) => None,
            Err(std::env::VarError::NotPresent) => None,
            // Secrets must be valid strings; treat garbage as unset.
            Err(std::env::VarError::NotUnicode(_)) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_env_provider_get_existing() {
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var("CHATRELAY_TEST_SECRET_1", " test-value-123 ") };

        let value = EnvSecretProvider::new().get("CHATRELAY_TEST_SECRET_1");
        assert_eq!(value.unwrap().expose_secret(), "test-value-123");

        // SAFETY: set above, unique to this test.
        unsafe { std::env::remove_var("CHATRELAY_TEST_SECRET_1") };
    }

    #[test]
    fn test_env_provider_get_missing() {
        assert!(EnvSecretProvider::new().get("NONEXISTENT_VAR_XYZ_123").is_none());
    }

    #[test]
    fn test_env_provider_empty_is_missing() {
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var("CHATRELAY_TEST_SECRET_EMPTY", "   ") };
        assert!(EnvSecretProvider::new().get("CHATRELAY_TEST_SECRET_EMPTY").is_none());
        // SAFETY: set above, unique to this test.
        unsafe { std::env::remove_var("CHATRELAY_TEST_SECRET_EMPTY") };
    }
}
