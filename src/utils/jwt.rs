use crate::entities::AccountRole;
use crate::error::{AppError, AppResult};
use crate::models::AuthContext;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // account_id
    pub role: AccountRole,
    pub restaurant_id: Option<i64>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn auth_context(&self) -> AppResult<AuthContext> {
        let account_id = self
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;
        Ok(AuthContext {
            account_id,
            role: self.role,
            restaurant_id: self.restaurant_id,
        })
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in: access_expires_in,
        }
    }

    pub fn generate_access_token(
        &self,
        account_id: i64,
        role: AccountRole,
        restaurant_id: Option<i64>,
    ) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expires_in);

        let claims = Claims {
            sub: account_id.to_string(),
            role,
            restaurant_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)
    }

    pub fn get_access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_carries_role_and_restaurant() {
        let jwt = JwtService::new("test-secret", 3600);
        let token = jwt
            .generate_access_token(9, AccountRole::RestaurantOwner, Some(4))
            .unwrap();
        let ctx = jwt.verify_access_token(&token).unwrap().auth_context().unwrap();
        assert_eq!(ctx.account_id, 9);
        assert_eq!(ctx.role, AccountRole::RestaurantOwner);
        assert_eq!(ctx.restaurant_id, Some(4));
    }

    #[test]
    fn test_rejects_foreign_secret() {
        let token = JwtService::new("a", 3600)
            .generate_access_token(1, AccountRole::SuperAdmin, None)
            .unwrap();
        assert!(JwtService::new("b", 3600).verify_access_token(&token).is_err());
    }
}
