use std::sync::Arc;

use axum::{
    Extension, RequestPartsExt, async_trait, extract::FromRequestParts, http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::axum_http::error_responses::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Commerce-platform user id.
    pub sub: String,
    pub email: Option<String>,
    pub exp: usize,
}

/// Checks HS256 session tokens issued for the commerce-platform identity.
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<SessionClaims> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;
        Ok(token_data.claims)
    }
}

/// Authenticated caller of a session-scoped endpoint.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub external_id: String,
    pub email: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Extension(verifier) = parts
            .extract::<Extension<Arc<SessionVerifier>>>()
            .await
            .map_err(|_| AppError::Internal(anyhow::anyhow!("session verifier is not installed")))?;

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::AuthenticationRequired)?;

        let claims = verifier.verify(bearer.token()).map_err(|err| {
            warn!(error = %err, "auth: session token rejected");
            AppError::AuthenticationRequired
        })?;

        let external_id = claims.sub.trim().to_string();
        if external_id.is_empty() {
            return Err(AppError::AuthenticationRequired);
        }

        Ok(SessionUser {
            external_id,
            email: claims.email,
        })
    }
}
