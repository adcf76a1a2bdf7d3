//! Auth handlers and supporting modules.
//!
//! This module coordinates password login, bearer-token issuance and
//! validation, and per-request authorization.
//!
//! ## Token Lifecycle
//!
//! Tokens are stateless: claims are signed with a process-wide secret and
//! validated offline on every request. There is no server-side session
//! record, so a token cannot be revoked before its expiry; rotating the
//! secret or waiting out the TTL are the only levers.
//!
//! > **Warning:** Rotating the secret invalidates every outstanding token.
//!
//! ## Scope Anchors
//!
//! Each scoped role carries exactly one anchor (`college_id` or
//! `incubator_id`), embedded in the token claims at login. Handlers derive a
//! [`Visibility`] from the principal once and apply it to every scoped query.

pub(crate) mod login;
pub mod password;
pub mod principal;
pub mod role;
pub mod state;
pub(crate) mod storage;
pub mod token;
pub mod types;
pub mod visibility;

pub use principal::{AuthError, Principal, require_auth, require_role};
pub use role::Role;
pub use state::{AuthConfig, AuthState};
pub use visibility::Visibility;
