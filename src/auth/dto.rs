use serde::{Deserialize, Serialize};

/// Request body for signup and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Query string for email verification.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_uses_camel_case() {
        let response = TokenResponse {
            access_token: "abc".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["accessToken"], "abc");
    }
}
