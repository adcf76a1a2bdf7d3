//! Compact HS256 bearer tokens carrying identity and scope claims.
//!
//! Validation is a bounded, offline computation: no database lookups, no
//! network. A token stays valid until its `exp` passes even if the subject
//! was deactivated in the meantime; the only revocation levers are secret
//! rotation and expiry.

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

use super::{role::Role, state::AuthConfig};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
}

impl TokenHeader {
    fn hs256() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (user id)
    pub sub: Uuid,
    pub role: Role,
    /// Scope anchor (college or incubator id); absent for `system_admin`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Uuid>,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Token cannot be parsed or is not the expected HS256 shape.
    #[error("malformed token")]
    Malformed,
    /// Signature does not verify against the current secret.
    #[error("invalid token signature")]
    SignatureInvalid,
    /// `exp` has passed; signature and structure were otherwise valid.
    #[error("token expired")]
    Expired,
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(value).map_err(|_| Error::Malformed)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Error> {
    let bytes = Base64UrlUnpadded::decode_vec(s).map_err(|_| Error::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| Error::Malformed)
}

fn mac(config: &AuthConfig, signing_input: &str) -> Result<HmacSha256, Error> {
    let mut mac = HmacSha256::new_from_slice(config.token_secret().expose_secret().as_bytes())
        .map_err(|_| Error::SignatureInvalid)?;
    mac.update(signing_input.as_bytes());
    Ok(mac)
}

/// Sign claims into a compact token string.
///
/// # Errors
///
/// Returns an error if the claims cannot be encoded.
pub fn sign(config: &AuthConfig, claims: &TokenClaims) -> Result<String, Error> {
    let header_b64 = b64e_json(&TokenHeader::hs256())?;
    let claims_b64 = b64e_json(claims)?;
    let signing_input = format!("{header_b64}.{claims_b64}");

    let signature = mac(config, &signing_input)?.finalize().into_bytes();
    let signature_b64 = Base64UrlUnpadded::encode_string(&signature);

    Ok(format!("{signing_input}.{signature_b64}"))
}

/// Issue a token for an authenticated identity, expiring after the
/// configured lifetime.
///
/// # Errors
///
/// Returns an error if the claims cannot be encoded.
pub fn issue(
    config: &AuthConfig,
    user_id: Uuid,
    role: Role,
    scope: Option<Uuid>,
    now_unix_seconds: i64,
) -> Result<String, Error> {
    let claims = TokenClaims {
        sub: user_id,
        role,
        scope,
        iat: now_unix_seconds,
        exp: now_unix_seconds.saturating_add(config.token_ttl_seconds()),
    };
    sign(config, &claims)
}

/// Verify a token and return its decoded claims.
///
/// # Errors
///
/// Returns an error if:
/// - the token is malformed or contains invalid base64/json (`Malformed`),
/// - the signature does not verify against the current secret
///   (`SignatureInvalid`),
/// - `exp` is in the past (`Expired`). Expiry is checked last so an expired
///   but genuine token never surfaces as a parse error.
pub fn verify(config: &AuthConfig, token: &str, now_unix_seconds: i64) -> Result<TokenClaims, Error> {
    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(Error::Malformed)?;
    let claims_b64 = parts.next().ok_or(Error::Malformed)?;
    let sig_b64 = parts.next().ok_or(Error::Malformed)?;
    if parts.next().is_some() {
        return Err(Error::Malformed);
    }

    let header: TokenHeader = b64d_json(header_b64)?;
    if header.alg != "HS256" || header.typ != "JWT" {
        return Err(Error::Malformed);
    }

    let signing_input = format!("{header_b64}.{claims_b64}");
    let signature = Base64UrlUnpadded::decode_vec(sig_b64).map_err(|_| Error::Malformed)?;
    mac(config, &signing_input)?
        .verify_slice(&signature)
        .map_err(|_| Error::SignatureInvalid)?;

    let claims: TokenClaims = b64d_json(claims_b64)?;
    if claims.exp <= now_unix_seconds {
        return Err(Error::Expired);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    const NOW: i64 = 1_700_000_000;

    fn config() -> AuthConfig {
        AuthConfig::new(SecretString::from("unit-test-secret")).with_token_ttl_seconds(3600)
    }

    fn claims(scope: Option<Uuid>) -> TokenClaims {
        TokenClaims {
            sub: Uuid::from_u128(7),
            role: Role::CollegeAdmin,
            scope,
            iat: NOW,
            exp: NOW + 3600,
        }
    }

    #[test]
    fn issue_then_verify_round_trips_claims() -> Result<(), Error> {
        let config = config();
        let college = Uuid::from_u128(1);
        let token = issue(&config, Uuid::from_u128(7), Role::CollegeAdmin, Some(college), NOW)?;

        let verified = verify(&config, &token, NOW + 1)?;
        assert_eq!(verified.sub, Uuid::from_u128(7));
        assert_eq!(verified.role, Role::CollegeAdmin);
        assert_eq!(verified.scope, Some(college));
        assert_eq!(verified.exp, NOW + 3600);
        Ok(())
    }

    #[test]
    fn verify_rejects_expired_even_with_valid_signature() -> Result<(), Error> {
        let config = config();
        let token = sign(&config, &claims(None))?;

        let result = verify(&config, &token, NOW + 3600);
        assert_eq!(result, Err(Error::Expired));
        Ok(())
    }

    #[test]
    fn verify_rejects_wrong_secret() -> Result<(), Error> {
        let config = config();
        let token = sign(&config, &claims(None))?;

        let other = AuthConfig::new(SecretString::from("a-different-secret"));
        let result = verify(&other, &token, NOW);
        assert_eq!(result, Err(Error::SignatureInvalid));
        Ok(())
    }

    #[test]
    fn verify_rejects_tampered_claims() -> Result<(), Error> {
        let config = config();
        let token = sign(&config, &claims(None))?;

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = b64e_json(&claims(Some(Uuid::from_u128(2))))?;
        parts[1] = &forged;
        let tampered = parts.join(".");

        let result = verify(&config, &tampered, NOW);
        assert_eq!(result, Err(Error::SignatureInvalid));
        Ok(())
    }

    #[test]
    fn verify_rejects_garbage_as_malformed() {
        let config = config();
        assert_eq!(verify(&config, "", NOW), Err(Error::Malformed));
        assert_eq!(verify(&config, "abc", NOW), Err(Error::Malformed));
        assert_eq!(verify(&config, "a.b", NOW), Err(Error::Malformed));
        assert_eq!(verify(&config, "a.b.c.d", NOW), Err(Error::Malformed));
        assert_eq!(verify(&config, "!!.!!.!!", NOW), Err(Error::Malformed));
    }

    #[test]
    fn verify_rejects_unexpected_algorithm() -> Result<(), Error> {
        let config = config();
        let header = TokenHeader {
            alg: "none".to_string(),
            typ: "JWT".to_string(),
        };
        let token = format!("{}.{}.", b64e_json(&header)?, b64e_json(&claims(None))?);

        let result = verify(&config, &token, NOW);
        assert_eq!(result, Err(Error::Malformed));
        Ok(())
    }

    #[test]
    fn scope_claim_is_omitted_when_absent() -> Result<(), Error> {
        let encoded = b64e_json(&claims(None))?;
        let bytes = Base64UrlUnpadded::decode_vec(&encoded).map_err(|_| Error::Malformed)?;
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|_| Error::Malformed)?;
        assert!(value.get("scope").is_none());
        Ok(())
    }
}
