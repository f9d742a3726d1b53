/*!
 * # Authentication and Authorization Module
 *
 * JWT-based authentication with role-gated routes. Tokens are signed
 * HS256 with a 24 hour expiry and carry the user's id, email and role.
 * Passwords are hashed with Argon2.
 */

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::entities::user;
use crate::errors::ServiceError;

/// Application roles, ordered by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Analyst,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Analyst => "analyst",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "analyst" => Ok(Role::Analyst),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // Subject (user ID)
    pub email: String, // User's email
    pub role: String,  // User's role
    pub iat: i64,      // Issued at time
    pub exp: i64,      // Expiration time
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration_secs: usize,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, token_expiration_secs: usize) -> Self {
        Self {
            jwt_secret,
            token_expiration_secs,
        }
    }
}

/// Registration payload
#[derive(Debug, Deserialize, validator::Validate, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Defaults to manager when omitted
    pub role: Option<Role>,
}

/// Login payload. The selected role must match the stored one.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Authentication service that handles token issuance and validation
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::HashError(e.to_string()))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Register a new user. Duplicate emails are rejected with a conflict.
    pub async fn register(&self, req: RegisterRequest) -> Result<user::Model, ServiceError> {
        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(req.email.as_str()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "User with email {} already exists",
                req.email
            )));
        }

        let role = req.role.unwrap_or(Role::Manager);
        let password_hash = self.hash_password(&req.password)?;

        let model = user::ActiveModel {
            email: Set(req.email),
            password_hash: Set(password_hash),
            role: Set(role.as_str().to_string()),
            name: Set(req.name),
            ..Default::default()
        };

        let inserted = model.insert(&*self.db).await?;
        debug!(user_id = inserted.id, "registered user");
        Ok(inserted)
    }

    /// Authenticate a user.
    ///
    /// Succeeds only when the password verifies and the stored role equals
    /// the role supplied at login. A correct password with a mismatched
    /// role is treated as a failed login, not a forbidden one.
    pub async fn login(&self, req: LoginRequest) -> Result<(user::Model, String), ServiceError> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(req.email.as_str()))
            .one(&*self.db)
            .await?;

        let found = match found {
            Some(u) => u,
            None => return Err(ServiceError::Unauthorized("Invalid credentials".into())),
        };

        if !self.verify_password(&req.password, &found.password_hash) {
            return Err(ServiceError::Unauthorized("Invalid credentials".into()));
        }

        if found.role != req.role.as_str() {
            return Err(ServiceError::Unauthorized(
                "Invalid credentials for selected role".into(),
            ));
        }

        let token = self.generate_token(&found)?;
        Ok((found, token))
    }

    /// Generate a JWT token for a user
    pub fn generate_token(&self, user: &user::Model) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + ChronoDuration::seconds(self.config.token_expiration_secs as i64);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("Token creation failed: {}", e)))
    }

    /// Validate a JWT token and extract the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        Ok(claims)
    }
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Insufficient role")]
    InsufficientRole,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message): (StatusCode, &str, &str) = match &self {
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING_TOKEN",
                "No authentication token provided",
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Invalid authentication token",
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "AUTH_TOKEN_EXPIRED",
                "Token has expired",
            ),
            Self::InsufficientRole => (
                StatusCode::FORBIDDEN,
                "AUTH_INSUFFICIENT_ROLE",
                "Insufficient role for this resource",
            ),
        };

        let body = Json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Middleware that validates the bearer token and enforces role membership.
///
/// An empty allow-list means any authenticated user may pass. The resolved
/// `AuthUser` is inserted as a request extension for handlers.
pub async fn role_guard(
    State((auth_service, allowed)): State<(Arc<AuthService>, &'static [Role])>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(t) => t,
        None => return AuthError::MissingToken.into_response(),
    };

    let claims = match auth_service.validate_token(token) {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };

    let id = match claims.sub.parse::<i32>() {
        Ok(id) => id,
        Err(_) => return AuthError::InvalidToken.into_response(),
    };
    let role = match claims.role.parse::<Role>() {
        Ok(r) => r,
        Err(_) => return AuthError::InvalidToken.into_response(),
    };

    if !allowed.is_empty() && !allowed.contains(&role) {
        return AuthError::InsufficientRole.into_response();
    }

    request.extensions_mut().insert(AuthUser {
        id,
        email: claims.email,
        role,
    });

    next.run(request).await
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    /// Require a valid token
    fn with_auth(self, auth: Arc<AuthService>) -> Self;
    /// Require a valid token whose role is in `roles`
    fn with_roles(self, auth: Arc<AuthService>, roles: &'static [Role]) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self, auth: Arc<AuthService>) -> Self {
        const ANY: &[Role] = &[];
        self.layer(axum::middleware::from_fn_with_state(
            (auth, ANY),
            role_guard,
        ))
    }

    fn with_roles(self, auth: Arc<AuthService>, roles: &'static [Role]) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            (auth, roles),
            role_guard,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Database;

    async fn test_service() -> AuthService {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        AuthService::new(
            AuthConfig::new("unit-test-secret-key".into(), 86_400),
            Arc::new(db),
        )
    }

    fn test_user(role: &str) -> user::Model {
        user::Model {
            id: 7,
            email: "ops@example.com".into(),
            password_hash: String::new(),
            role: role.into(),
            name: "Ops".into(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn password_hash_round_trip() {
        let svc = test_service().await;
        let hash = svc.hash_password("correct horse battery").unwrap();
        assert!(svc.verify_password("correct horse battery", &hash));
        assert!(!svc.verify_password("wrong password", &hash));
    }

    #[tokio::test]
    async fn token_round_trip_preserves_claims() {
        let svc = test_service().await;
        let token = svc.generate_token(&test_user("manager")).unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.email, "ops@example.com");
        assert_eq!(claims.role, "manager");
        assert!(claims.exp - claims.iat == 86_400);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let svc = test_service().await;
        // Expired well beyond the default validation leeway
        let now = Utc::now();
        let claims = Claims {
            sub: "7".into(),
            email: "ops@example.com".into(),
            role: "manager".into(),
            iat: (now - ChronoDuration::hours(26)).timestamp(),
            exp: (now - ChronoDuration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(svc.config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            svc.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let svc = test_service().await;
        let token = svc.generate_token(&test_user("analyst")).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(matches!(
            svc.validate_token(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn role_parsing() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("manager".parse::<Role>(), Ok(Role::Manager));
        assert_eq!("analyst".parse::<Role>(), Ok(Role::Analyst));
        assert!("root".parse::<Role>().is_err());
    }
}
