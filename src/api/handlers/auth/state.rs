//! Auth configuration and process-wide auth state.
//!
//! The signing secret is loaded once at startup into an immutable
//! `AuthConfig` and handed to handlers through an `Arc<AuthState>` extension;
//! nothing reads it from ambient global state.

use secrecy::SecretString;

const DEFAULT_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;
const DEFAULT_FRONTEND_BASE_URL: &str = "http://localhost:5173";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    token_secret: SecretString,
    token_ttl_seconds: i64,
    frontend_base_url: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(token_secret: SecretString) -> Self {
        Self {
            token_secret,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            frontend_base_url: DEFAULT_FRONTEND_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_frontend_base_url(mut self, url: String) -> Self {
        self.frontend_base_url = url;
        self
    }

    #[must_use]
    pub fn token_secret(&self) -> &SecretString {
        &self.token_secret
    }

    #[must_use]
    pub fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }
}

pub struct AuthState {
    config: AuthConfig,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new(SecretString::from("secret"));

        assert_eq!(config.token_ttl_seconds(), DEFAULT_TOKEN_TTL_SECONDS);
        assert_eq!(config.frontend_base_url(), DEFAULT_FRONTEND_BASE_URL);
        assert_eq!(config.token_secret().expose_secret(), "secret");

        let config = config
            .with_token_ttl_seconds(600)
            .with_frontend_base_url("https://hub.example.edu".to_string());

        assert_eq!(config.token_ttl_seconds(), 600);
        assert_eq!(config.frontend_base_url(), "https://hub.example.edu");
    }

    #[test]
    fn auth_state_exposes_config() {
        let state = AuthState::new(AuthConfig::new(SecretString::from("secret")));
        assert_eq!(state.config().token_ttl_seconds(), DEFAULT_TOKEN_TTL_SECONDS);
    }
}
