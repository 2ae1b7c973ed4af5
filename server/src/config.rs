//! Failure-injection configuration
//!
//! One immutable snapshot built from the environment at process start.
//! Loading never fails: a missing or malformed value degrades to its
//! documented default, and each switch is interpreted independently of
//! the others.

/// Immutable snapshot of the failure switches and service endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct FailureConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub payment_api_url: String,
    pub email_api_url: String,
    pub cache_url: String,
    pub api_key: String,

    // Failure simulation switches; any subset may be active
    pub db_failure: bool,
    pub payment_timeout: bool,
    pub auth_failure: bool,
    pub email_failure: bool,
    pub critical_failure: bool,
}

impl Default for FailureConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl FailureConfig {
    /// Build the snapshot from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the snapshot from an arbitrary variable source; tests pass a
    /// map instead of mutating the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        // Case-insensitive "true" enables a switch; anything else is off
        let switch = |key: &str| lookup(key).is_some_and(|value| value.eq_ignore_ascii_case("true"));

        Self {
            database_url: string("DATABASE_URL", "ecommerce.db"),
            jwt_secret: string("JWT_SECRET", "your-secret-key"),
            payment_api_url: string("PAYMENT_API_URL", "https://api.payments.internal/v1"),
            email_api_url: string("EMAIL_API_URL", "https://api.notifications.internal/v1"),
            cache_url: string("CACHE_URL", "redis://localhost:6379"),
            api_key: string("API_KEY", "default_api_key"),
            db_failure: switch("SIMULATE_DB_FAILURE"),
            payment_timeout: switch("SIMULATE_PAYMENT_TIMEOUT"),
            auth_failure: switch("SIMULATE_AUTH_FAILURE"),
            email_failure: switch("SIMULATE_EMAIL_FAILURE"),
            critical_failure: switch("SIMULATE_CRITICAL_FAILURE"),
        }
    }
}
