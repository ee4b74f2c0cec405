/// Bearer token validation
///
/// Tokens are issued by the identity provider; this service only verifies
/// them. The HS256 key comes from [`AuthConfig`] and lives inside the
/// validator value held by the application state.
use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{AppError, Result};

/// Claims the identity provider puts in access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    pub username: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))
    }
}

pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &config.jwt_issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn validate(&self, token: &str) -> Result<TokenData<Claims>> {
        Ok(decode::<Claims>(token, &self.decoding_key, &self.validation)?)
    }
}

impl std::fmt::Debug for JwtValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtValidator")
            .field("algorithm", &"HS256")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "unit-test-secret-unit-test-secret";

    fn auth_config(issuer: Option<&str>) -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            jwt_issuer: issuer.map(str::to_string),
            leeway_secs: 0,
        }
    }

    fn token(sub: &str, exp_offset: i64, iss: Option<&str>) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            username: "alice".to_string(),
            exp: now + exp_offset,
            iat: now,
            iss: iss.map(str::to_string),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_valid_token() {
        let id = Uuid::new_v4();
        let validator = JwtValidator::new(&auth_config(None));
        let data = validator.validate(&token(&id.to_string(), 600, None)).unwrap();
        assert_eq!(data.claims.user_id().unwrap(), id);
        assert_eq!(data.claims.username, "alice");
    }

    #[test]
    fn rejects_expired_token() {
        let validator = JwtValidator::new(&auth_config(None));
        let err = validator
            .validate(&token(&Uuid::new_v4().to_string(), -600, None))
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn rejects_wrong_secret() {
        let mut config = auth_config(None);
        config.jwt_secret = "another-secret-another-secret-xx".to_string();
        let validator = JwtValidator::new(&config);
        assert!(validator
            .validate(&token(&Uuid::new_v4().to_string(), 600, None))
            .is_err());
    }

    #[test]
    fn enforces_issuer_when_configured() {
        let validator = JwtValidator::new(&auth_config(Some("identity")));
        let sub = Uuid::new_v4().to_string();
        assert!(validator.validate(&token(&sub, 600, Some("other"))).is_err());
        assert!(validator.validate(&token(&sub, 600, Some("identity"))).is_ok());
    }

    #[test]
    fn issued_at_is_optional() {
        let validator = JwtValidator::new(&auth_config(None));
        let id = Uuid::new_v4();
        let claims = serde_json::json!({
            "sub": id.to_string(),
            "username": "alice",
            "exp": Utc::now().timestamp() + 600,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let data = validator.validate(&token).unwrap();
        assert_eq!(data.claims.user_id().unwrap(), id);
        assert_eq!(data.claims.iat, 0);
    }

    #[test]
    fn non_uuid_subject_is_unauthorized() {
        let validator = JwtValidator::new(&auth_config(None));
        let data = validator.validate(&token("not-a-uuid", 600, None)).unwrap();
        assert!(matches!(data.claims.user_id(), Err(AppError::Unauthorized(_))));
    }
}
