use crate::config::settings::JwtConfig;
use crate::database::models::UserRole;
use anyhow::{anyhow, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Verified caller identity carried by a signed token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub role: UserRole,
    pub email: String,
    pub dealer_id: Option<Uuid>,
    pub exp: usize,
}

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_seconds: u64,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    refresh_expiration_seconds: u64,
}

impl JwtManager {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            expiration_seconds: config.expiration_seconds,
            refresh_encoding_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_expiration_seconds: config.refresh_expiration_seconds,
        }
    }

    pub fn generate_token(
        &self,
        user_id: Uuid,
        role: UserRole,
        email: &str,
        dealer_id: Option<Uuid>,
    ) -> Result<String> {
        self.sign(
            user_id,
            role,
            email,
            dealer_id,
            &self.encoding_key,
            self.expiration_seconds,
        )
    }

    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
        role: UserRole,
        email: &str,
        dealer_id: Option<Uuid>,
    ) -> Result<String> {
        self.sign(
            user_id,
            role,
            email,
            dealer_id,
            &self.refresh_encoding_key,
            self.refresh_expiration_seconds,
        )
    }

    fn sign(
        &self,
        user_id: Uuid,
        role: UserRole,
        email: &str,
        dealer_id: Option<Uuid>,
        key: &EncodingKey,
        expiration_seconds: u64,
    ) -> Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;
        let claims = Claims {
            sub: user_id,
            role,
            email: email.to_string(),
            dealer_id,
            exp: now + expiration_seconds as usize,
        };
        let token = encode(&Header::default(), &claims, key)?;
        Ok(token)
    }

    /// Bad signature, malformed payload, and expiry all collapse into one
    /// uniform failure.
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| anyhow!("Invalid or expired token"))
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.refresh_decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| anyhow!("Invalid or expired refresh token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new(&JwtConfig {
            secret: "test-secret".into(),
            expiration_seconds: 3600,
            refresh_secret: "test-refresh-secret".into(),
            refresh_expiration_seconds: 7200,
        })
    }

    #[test]
    fn round_trip_preserves_identity() {
        let manager = manager();
        let user_id = Uuid::new_v4();
        let dealer_id = Uuid::new_v4();

        let token = manager
            .generate_token(user_id, UserRole::Dealer, "d@example.com", Some(dealer_id))
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, UserRole::Dealer);
        assert_eq!(claims.email, "d@example.com");
        assert_eq!(claims.dealer_id, Some(dealer_id));
    }

    #[test]
    fn admin_token_decodes_with_admin_role() {
        let manager = manager();
        let token = manager
            .generate_token(Uuid::new_v4(), UserRole::Admin, "a@example.com", None)
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.dealer_id, None);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let manager = manager();
        let mut token = manager
            .generate_token(Uuid::new_v4(), UserRole::Admin, "a@example.com", None)
            .unwrap();
        token.push('x');
        assert!(manager.validate_token(&token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = manager()
            .generate_token(Uuid::new_v4(), UserRole::Admin, "a@example.com", None)
            .unwrap();
        let other = JwtManager::new(&JwtConfig {
            secret: "different-secret".into(),
            expiration_seconds: 3600,
            refresh_secret: "other".into(),
            refresh_expiration_seconds: 7200,
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn access_token_is_not_a_valid_refresh_token() {
        let manager = manager();
        let token = manager
            .generate_token(Uuid::new_v4(), UserRole::Admin, "a@example.com", None)
            .unwrap();
        assert!(manager.validate_refresh_token(&token).is_err());
    }

    #[test]
    fn dealer_token_carries_its_tenant() {
        let manager = manager();
        let dealer_id = Uuid::new_v4();
        let token = manager
            .generate_refresh_token(Uuid::new_v4(), UserRole::Dealer, "d@example.com", Some(dealer_id))
            .unwrap();
        let claims = manager.validate_refresh_token(&token).unwrap();
        assert_eq!(claims.dealer_id, Some(dealer_id));
    }
}
