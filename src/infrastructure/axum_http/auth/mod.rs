use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{
    config::config_loader,
    domain::value_objects::{actors::Actor, enums::user_roles::UserRole},
    infrastructure::axum_http::error_responses::AppError,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub email: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: UserRole,
}

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

/// Verifies an HS256 token. Tokens are issued elsewhere; only the signature,
/// expiry and claims shape are checked here.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| AppError::Unauthorized(format!("JWT validation failed: {}", e)))?;

    Ok(token_data.claims)
}

/// Unknown roles fall back to a plain user.
pub fn auth_user_from_claims(claims: Claims) -> Result<AuthUser, AppError> {
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;

    Ok(AuthUser {
        user_id,
        email: claims.email,
        role: UserRole::from_str(&claims.role).unwrap_or_default(),
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    warn!("auth: missing or malformed bearer token");
                    AppError::Unauthorized("Missing Authorization header".to_string())
                })?;

        let secret = config_loader::get_jwt_secret()?;
        let claims = validate_jwt(bearer.token(), &secret.secret).inspect_err(|err| {
            warn!(error = %err, "auth: token rejected");
        })?;

        auth_user_from_claims(claims)
    }
}
