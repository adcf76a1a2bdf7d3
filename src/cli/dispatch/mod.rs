//! Command-line argument dispatch and server initialization.
//!
//! This module maps validated CLI arguments to the appropriate action, such
//! as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::auth::{
    ARG_FRONTEND_BASE_URL, ARG_TOKEN_SECRET, ARG_TOKEN_TTL_SECONDS,
};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let token_secret = matches
        .get_one::<String>(ARG_TOKEN_SECRET)
        .cloned()
        .context("missing required argument: --token-secret")?;

    let token_ttl_seconds = matches
        .get_one::<i64>(ARG_TOKEN_TTL_SECONDS)
        .copied()
        .unwrap_or(86_400);

    let frontend_base_url = matches
        .get_one::<String>(ARG_FRONTEND_BASE_URL)
        .cloned()
        .context("missing required argument: --frontend-base-url")?;

    Ok(Action::Server(Args {
        port,
        dsn,
        token_secret: SecretString::from(token_secret),
        token_ttl_seconds,
        frontend_base_url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_secret_required() {
        temp_env::with_vars(
            [
                ("INNOHUB_TOKEN_SECRET", None::<&str>),
                (
                    "INNOHUB_DSN",
                    Some("postgres://user@localhost:5432/innohub"),
                ),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["innohub"]);
                let result = handler(&matches);
                assert!(result.is_err());
                if let Err(err) = result {
                    assert!(
                        err.to_string()
                            .contains("missing required argument: --token-secret")
                    );
                }
            },
        );
    }

    #[test]
    fn server_action_from_matches() {
        temp_env::with_vars(
            [
                ("INNOHUB_TOKEN_SECRET", Some("secret")),
                (
                    "INNOHUB_DSN",
                    Some("postgres://user@localhost:5432/innohub"),
                ),
                ("INNOHUB_TOKEN_TTL_SECONDS", Some("600")),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["innohub"]);
                let action = handler(&matches);
                assert!(action.is_ok());
                if let Ok(Action::Server(args)) = action {
                    assert_eq!(args.port, 8080);
                    assert_eq!(args.dsn, "postgres://user@localhost:5432/innohub");
                    assert_eq!(args.token_ttl_seconds, 600);
                    assert_eq!(args.frontend_base_url, "http://localhost:5173");
                }
            },
        );
    }
}
