use std::sync::Arc;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use squigg_types::api::ApiResponse;
use squigg_types::models::User;

use crate::error::ServiceError;
use crate::identity::IdentityService;

pub const SESSION_COOKIE: &str = "squigg_session";

const SESSION_DAYS: i64 = 30;

/// Session token payload. `sub` is the serialized user (its id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Outcome of a failed credential check or session lookup.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The caller is not who they claim to be. The reason never says which
    /// part of the credentials was wrong.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Service(ServiceError),
}

impl From<ServiceError> for AuthError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(reason) => AuthError::Rejected(reason),
            other => AuthError::Service(other),
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Service(rejection.into())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Rejected(reason) => {
                let body: ApiResponse = ApiResponse::failure(reason);
                (StatusCode::UNAUTHORIZED, Json(body)).into_response()
            }
            AuthError::Service(err) => err.into_response(),
        }
    }
}

/// Credential strategy plus session (de)serialization over the identity service.
pub struct Authenticator {
    identity: Arc<IdentityService>,
    encoding: EncodingKey,
    decoding: DecodingKey,
    secure_cookies: bool,
}

impl Authenticator {
    pub fn new(identity: Arc<IdentityService>, secret: &str, secure_cookies: bool) -> Self {
        Self {
            identity,
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            secure_cookies,
        }
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        Ok(self.identity.find_user_by_credentials(username, password)?)
    }

    pub fn serialize_user(&self, user: &User) -> String {
        user.id.clone()
    }

    /// Rejects ids that no longer resolve, e.g. a stale session after data loss.
    pub fn deserialize_user(&self, id: &str) -> Result<User, AuthError> {
        self.identity.find_user_by_id(id).map_err(|e| {
            if let ServiceError::NotFound(_) = e {
                warn!("Session refers to unknown user {}", id);
            }
            AuthError::from(e)
        })
    }

    /// Add a signed session cookie for `user` to the jar.
    pub fn start_session(&self, jar: CookieJar, user: &User) -> Result<CookieJar, AuthError> {
        let claims = Claims {
            sub: self.serialize_user(user),
            exp: (chrono::Utc::now() + chrono::Duration::days(SESSION_DAYS)).timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Service(ServiceError::Persistence(e.into())))?;

        let cookie = Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .max_age(time::Duration::days(SESSION_DAYS));

        debug!("Started session for {}", user.id);
        Ok(jar.add(cookie))
    }

    pub fn end_session(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }

    /// The signed-in user for this request's cookies.
    pub fn resolve(&self, jar: &CookieJar) -> Result<User, AuthError> {
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| AuthError::Rejected("Not signed in.".into()))?;

        let data = decode::<Claims>(&token, &self.decoding, &Validation::default())
            .map_err(|_| AuthError::Rejected("Session is invalid or expired.".into()))?;

        self.deserialize_user(&data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squigg_crypto::hash::KeyedHasher;
    use squigg_db::Database;

    fn authenticator(secret: &str) -> (Arc<IdentityService>, Authenticator) {
        let identity = Arc::new(IdentityService::new(
            Arc::new(Database::in_memory()),
            KeyedHasher::new(secret),
        ));
        (identity.clone(), Authenticator::new(identity, secret, false))
    }

    #[test]
    fn authenticate_does_not_reveal_which_part_failed() {
        let (identity, auth) = authenticator("s");
        identity.create_user("ada", "secret").unwrap();

        assert!(auth.authenticate("ada", "secret").is_ok());

        let wrong = auth.authenticate("ada", "nope").unwrap_err();
        let unknown = auth.authenticate("bob", "secret").unwrap_err();
        assert!(matches!(wrong, AuthError::Rejected(_)));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[test]
    fn serialize_deserialize_roundtrip() {
        let (identity, auth) = authenticator("s");
        let user = identity.create_user("ada", "secret").unwrap();

        let id = auth.serialize_user(&user);
        assert_eq!(id, user.id);
        assert_eq!(auth.deserialize_user(&id).unwrap(), user);
        assert!(matches!(
            auth.deserialize_user("gone").unwrap_err(),
            AuthError::Rejected(_)
        ));
    }

    #[test]
    fn session_cookie_resolves_to_user() {
        let (identity, auth) = authenticator("s");
        let user = identity.create_user("ada", "secret").unwrap();

        let jar = auth.start_session(CookieJar::new(), &user).unwrap();
        let cookie = jar.get(SESSION_COOKIE).unwrap();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
        assert_eq!(auth.resolve(&jar).unwrap(), user);
    }

    #[test]
    fn cookie_signed_with_other_secret_is_rejected() {
        let (identity, auth) = authenticator("s");
        let user = identity.create_user("ada", "secret").unwrap();
        let (_, other) = authenticator("different");

        let jar = other.start_session(CookieJar::new(), &user).unwrap();
        assert!(matches!(auth.resolve(&jar).unwrap_err(), AuthError::Rejected(_)));
    }

    #[test]
    fn missing_cookie_is_rejected() {
        let (_, auth) = authenticator("s");
        assert!(matches!(
            auth.resolve(&CookieJar::new()).unwrap_err(),
            AuthError::Rejected(_)
        ));
    }
}
