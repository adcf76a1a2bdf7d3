use crate::api;
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub token_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub frontend_base_url: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let auth_config = api::handlers::auth::AuthConfig::new(args.token_secret)
        .with_token_ttl_seconds(args.token_ttl_seconds)
        .with_frontend_base_url(args.frontend_base_url);

    api::new(args.port, args.dsn, auth_config).await
}
