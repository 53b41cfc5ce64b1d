/*!
 * # Authentication and Authorization Module
 *
 * Session tokens are HS256 JWTs carried either in an `Authorization: Bearer`
 * header or in the `token` cookie set at login. Passwords are hashed with
 * Argon2id. The `AuthUser`, `StaffUser` and `AdminUser` extractors gate
 * handlers by role; the role is re-read from the database on every request so
 * a demotion takes effect immediately.
 */

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::user::{self, Entity as UserEntity, UserRole},
    errors::ServiceError,
    AppState,
};

const EMAIL_TAKEN: &str = "Email is already registered";

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "token";

/// Claim structure for JWT tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: ChronoDuration,
    pub cookie_secure: bool,
}

impl AuthConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_ttl: ChronoDuration::seconds(config.jwt_expiration_secs as i64),
            cookie_secure: config.cookie_secure,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 7, max = 20, message = "Phone number is invalid"))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
    pub user: user::Model,
}

/// Authentication service that handles credential checks and token issuance
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    db: Arc<DbPool>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DbPool>) -> Self {
        Self { config, db }
    }

    pub fn cookie_secure(&self) -> bool {
        self.config.cookie_secure
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.config.token_ttl.num_seconds()
    }

    pub fn hash_password(password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!(error = %e, "Failed to hash password");
                ServiceError::InternalError("Failed to hash password".to_string())
            })
    }

    pub fn verify_password(password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }

    /// Creates a customer account.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<user::Model, ServiceError> {
        crate::validation::validate(&request)?;
        let db = &*self.db;
        let email = request.email.trim().to_lowercase();

        let existing = UserEntity::find()
            .filter(user::Column::Email.eq(email.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            email: Set(email),
            password_hash: Set(Self::hash_password(&request.password)?),
            role: Set(UserRole::Customer),
            phone: Set(request.phone),
            address: Set(request.address),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create user");
            ServiceError::unique_violation(e, EMAIL_TAKEN)
        })?;

        info!(user_id = %model.id, "User registered");
        Ok(model)
    }

    /// Checks credentials and issues a session token.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<IssuedToken, ServiceError> {
        crate::validation::validate(&request)?;
        let invalid = || ServiceError::Unauthorized("Invalid email or password".to_string());

        let user = UserEntity::find()
            .filter(user::Column::Email.eq(request.email.trim().to_lowercase()))
            .one(&*self.db)
            .await?
            .ok_or_else(invalid)?;

        if !Self::verify_password(&request.password, &user.password_hash) {
            warn!(user_id = %user.id, "Rejected login with wrong password");
            return Err(invalid());
        }

        let token = self.issue_token(&user)?;
        Ok(IssuedToken {
            token,
            expires_in: self.token_ttl_secs(),
            user,
        })
    }

    pub fn issue_token(&self, user: &user::Model) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.config.token_ttl).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| {
            error!(error = %e, "Failed to sign token");
            ServiceError::InternalError("Failed to sign token".to_string())
        })
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ServiceError::Unauthorized("Session expired, please log in again".to_string())
            }
            _ => ServiceError::Unauthorized("Invalid session token".to_string()),
        })
    }

    /// Resolves a token to the current user row.
    pub async fn authenticate(&self, token: &str) -> Result<user::Model, ServiceError> {
        let claims = self.decode_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("Invalid session token".to_string()))?;

        UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Account no longer exists".to_string()))
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<user::Model, ServiceError> {
        UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))
    }
}

/// `Set-Cookie` value carrying a fresh session token.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that expires the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Reads the session token from the bearer header, falling back to the cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, value)| value.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// Any signed-in user
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<user::Model> for AuthUser {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers)
            .ok_or_else(|| ServiceError::Unauthorized("Please log in to continue".to_string()))?;
        let user = state.auth.authenticate(&token).await?;
        Ok(AuthUser::from(user))
    }
}

/// Signed-in user with the Staff or Admin role
#[derive(Debug, Clone)]
pub struct StaffUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_staff() {
            return Err(ServiceError::Forbidden(
                "Staff access is required".to_string(),
            ));
        }
        Ok(StaffUser(user))
    }
}

/// Signed-in user with the Admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ServiceError::Forbidden(
                "Administrator access is required".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn service() -> AuthService {
        AuthService::new(
            AuthConfig {
                jwt_secret: "unit_test_secret_that_is_definitely_long_enough".into(),
                token_ttl: ChronoDuration::hours(1),
                cookie_secure: false,
            },
            Arc::new(sea_orm::DatabaseConnection::Disconnected),
        )
    }

    fn sample_user(role: UserRole) -> user::Model {
        let now = Utc::now();
        user::Model {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: String::new(),
            role,
            phone: None,
            address: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_tokens_decode_with_subject_and_role() {
        let svc = service();
        let user = sample_user(UserRole::Staff);
        let token = svc.issue_token(&user).unwrap();
        let claims = svc.decode_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, UserRole::Staff);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = service();
        let token = svc.issue_token(&sample_user(UserRole::Customer)).unwrap();
        let tampered = format!("{}x", token);
        assert!(matches!(
            svc.decode_token(&tampered),
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = AuthService::hash_password("correct horse").unwrap();
        assert!(AuthService::verify_password("correct horse", &hash));
        assert!(!AuthService::verify_password("wrong horse", &hash));
        assert!(!AuthService::verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn token_is_read_from_bearer_then_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=cookie-token"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("cookie-token"));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("header-token"));

        assert!(token_from_headers(&HeaderMap::new()).is_none());
    }

    #[test]
    fn session_cookie_flags() {
        let cookie = session_cookie("abc", 60, true);
        assert!(cookie.starts_with("token=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=60"));
        assert!(cookie.ends_with("; Secure"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
