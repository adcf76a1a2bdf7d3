//! # Innohub (Innovation Hub portal API)
//!
//! `innohub` is the backend for a university innovation portal. It handles
//! password login, bearer-token issuance and validation, and role-scoped
//! visibility over portal resources (ideas, events, students).
//!
//! ## Scope Model (Colleges, Incubators)
//!
//! Colleges are the primary visibility boundary. Incubators sit above
//! colleges and may span several of them.
//!
//! - **Roles:** `student`, `mentor`, `college_admin`, `college_coordinator`,
//!   `incubator_manager`, `system_admin`. Every non-admin role carries exactly
//!   one scope anchor (a college or an incubator id).
//! - **Null anchors:** a resource without a scope anchor is globally scoped
//!   and visible only to `system_admin`.
//! - **Uniform filtering:** every list/read endpoint that returns scoped
//!   entities applies the same visibility predicate; no endpoint returns
//!   cross-college rows.
//!
//! ## Authentication
//!
//! Login verifies an Argon2 password hash and issues a signed, time-limited
//! bearer token carrying `{subject, role, scope}` claims. Token validation is
//! offline: it never touches the database, so a deactivated account keeps its
//! outstanding tokens until they expire. Revocation is only possible through
//! secret rotation or expiry.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
