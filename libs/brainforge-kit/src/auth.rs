//! JWT issuance/verification and the bearer-token middleware

use crate::problem::Problem;
use crate::security::{Role, SecurityCtx};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Token errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// JWT claims carried by BrainForge access tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signed token plus its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// HS256 token service
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            ttl,
        }
    }

    /// Issue an access token for the given user
    pub fn issue(&self, user_id: Uuid, email: &str, role: Role) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AuthError::Signing(format!("token ttl out of range: {}", e)))?;
        let expires_at = now + ttl;

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, expires_at })
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify a token and build the caller's security context
    pub fn verify(&self, token: &str) -> Result<SecurityCtx, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Invalid(e.to_string()),
        })?;

        let claims = data.claims;
        Ok(SecurityCtx::new(claims.sub, claims.email, claims.role))
    }
}

/// Axum middleware enforcing `Authorization: Bearer <jwt>`.
///
/// On success the caller's [`SecurityCtx`] is placed in request extensions.
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Problem> {
    let token = bearer_token(&request).ok_or(AuthError::MissingToken).map_err(auth_problem)?;
    let ctx = tokens.verify(token).map_err(auth_problem)?;

    tracing::debug!(user_id = %ctx.user_id, "request authenticated");
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn auth_problem(error: AuthError) -> Problem {
    match error {
        AuthError::MissingToken => Problem::unauthorized("Missing bearer token"),
        AuthError::Expired => Problem::unauthorized("Token expired"),
        AuthError::Invalid(reason) => {
            tracing::debug!(%reason, "rejected access token");
            Problem::unauthorized("Invalid token")
        }
        AuthError::Signing(reason) => {
            tracing::error!(%reason, "token signing failed");
            Problem::internal()
        }
    }
}
