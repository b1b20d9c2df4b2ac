pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Which secret a token was signed with and what it may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub token_type: TokenType,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, token_type: TokenType, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        let lifetime = match token_type {
            TokenType::Access => Duration::minutes(security.access_expiry_minutes),
            TokenType::Refresh => Duration::days(security.refresh_expiry_days),
        };

        Self {
            user_id,
            token_type,
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    Generation(String),

    #[error("Invalid or expired token")]
    Invalid,

    #[error("Token type not accepted here")]
    WrongType,
}

fn secret_for(security: &SecurityConfig, token_type: TokenType) -> Result<&str, TokenError> {
    let secret = match token_type {
        TokenType::Access => &security.access_secret,
        TokenType::Refresh => &security.refresh_secret,
    };

    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    Ok(secret)
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, TokenError> {
    let secret = secret_for(security, claims.token_type)?;
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| TokenError::Generation(e.to_string()))
}

/// Issue a fresh access token for `user_id`.
pub fn issue_access_token(user_id: Uuid, security: &SecurityConfig) -> Result<String, TokenError> {
    generate_jwt(&Claims::new(user_id, TokenType::Access, security), security)
}

/// Issue an access + refresh pair, each signed with its own secret.
pub fn issue_token_pair(user_id: Uuid, security: &SecurityConfig) -> Result<TokenPair, TokenError> {
    Ok(TokenPair {
        access_token: issue_access_token(user_id, security)?,
        refresh_token: generate_jwt(&Claims::new(user_id, TokenType::Refresh, security), security)?,
    })
}

/// Verify signature and expiry, then check the token was minted for `expected` use.
pub fn validate_jwt(
    token: &str,
    expected: TokenType,
    security: &SecurityConfig,
) -> Result<Claims, TokenError> {
    let secret = secret_for(security, expected)?;
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default()).map_err(|e| {
        tracing::debug!("JWT rejected: {}", e);
        TokenError::Invalid
    })?;

    if token_data.claims.token_type != expected {
        return Err(TokenError::WrongType);
    }

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn security() -> SecurityConfig {
        AppConfig::development().security
    }

    #[test]
    fn access_token_round_trips() {
        let security = security();
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, &security).unwrap();

        let claims = validate_jwt(&token, TokenType::Access, &security).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let security = security();
        let pair = issue_token_pair(Uuid::new_v4(), &security).unwrap();

        assert!(matches!(
            validate_jwt(&pair.refresh_token, TokenType::Access, &security),
            Err(TokenError::Invalid)
        ));
        assert!(validate_jwt(&pair.refresh_token, TokenType::Refresh, &security).is_ok());
        assert!(validate_jwt(&pair.access_token, TokenType::Refresh, &security).is_err());
    }

    #[test]
    fn same_secret_still_checks_token_type() {
        let mut security = security();
        security.refresh_secret = security.access_secret.clone();
        let pair = issue_token_pair(Uuid::new_v4(), &security).unwrap();

        assert!(matches!(
            validate_jwt(&pair.refresh_token, TokenType::Access, &security),
            Err(TokenError::WrongType)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let security = security();
        let now = Utc::now();
        let claims = Claims {
            user_id: Uuid::new_v4(),
            token_type: TokenType::Access,
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        };
        let token = generate_jwt(&claims, &security).unwrap();

        assert!(matches!(
            validate_jwt(&token, TokenType::Access, &security),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let mut security = security();
        security.access_secret.clear();
        assert!(matches!(
            issue_access_token(Uuid::new_v4(), &security),
            Err(TokenError::MissingSecret)
        ));
    }
}
