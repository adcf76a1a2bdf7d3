//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub role: String,
    pub college_id: Option<String>,
    pub incubator_id: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginData {
    /// Opaque credential; the frontend stores and replays it verbatim.
    pub token: String,
    pub user: UserSummary,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub success: bool,
    pub data: LoginData,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MeData {
    pub user: UserSummary,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MeResponse {
    pub success: bool,
    pub data: MeData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn login_request_round_trips() -> Result<()> {
        let request = LoginRequest {
            email: "admin1@college1.edu".to_string(),
            password: "password123".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let email = value
            .get("email")
            .and_then(serde_json::Value::as_str)
            .context("missing email")?;
        assert_eq!(email, "admin1@college1.edu");
        let decoded: LoginRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.password, "password123");
        Ok(())
    }

    #[test]
    fn login_response_keeps_envelope_shape() -> Result<()> {
        let response = LoginResponse {
            success: true,
            data: LoginData {
                token: "opaque".to_string(),
                user: UserSummary {
                    id: "7".to_string(),
                    email: "admin1@college1.edu".to_string(),
                    role: "college_admin".to_string(),
                    college_id: Some("1".to_string()),
                    incubator_id: None,
                },
            },
        };
        let value = serde_json::to_value(&response)?;
        assert_eq!(value.get("success"), Some(&serde_json::Value::Bool(true)));
        let role = value
            .pointer("/data/user/role")
            .and_then(serde_json::Value::as_str)
            .context("missing role")?;
        assert_eq!(role, "college_admin");
        Ok(())
    }
}
