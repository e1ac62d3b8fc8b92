use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::{WithRejection, cookie::CookieJar};
use tracing::info;

use squigg_crypto::hash::KeyedHasher;
use squigg_db::Database;
use squigg_types::api::{ApiResponse, SignInRequest, SignUpRequest};
use squigg_types::models::User;

use crate::content::ContentService;
use crate::error::blocking;
use crate::identity::IdentityService;
use crate::session::{AuthError, Authenticator};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub identity: Arc<IdentityService>,
    pub content: ContentService,
    pub auth: Authenticator,
}

impl AppStateInner {
    /// Wire every service to the one store handle. `secret` keys both the
    /// credential hash and the session tokens.
    pub fn new(db: Arc<Database>, secret: &str, secure_cookies: bool) -> AppState {
        let identity = Arc::new(IdentityService::new(db.clone(), KeyedHasher::new(secret)));
        Arc::new(Self {
            content: ContentService::new(db),
            auth: Authenticator::new(identity.clone(), secret, secure_cookies),
            identity,
        })
    }
}

pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(req), _): WithRejection<Json<SignUpRequest>, AuthError>,
) -> Result<impl IntoResponse, AuthError> {
    let st = state.clone();
    let user = blocking(move || {
        st.identity
            .create_user(&req.username, &req.password)
            .map_err(AuthError::from)
    })
    .await?;
    let jar = state.auth.start_session(jar, &user)?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(ApiResponse::success("Signed up.", vec![user])),
    ))
}

pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(req), _): WithRejection<Json<SignInRequest>, AuthError>,
) -> Result<impl IntoResponse, AuthError> {
    let st = state.clone();
    let user = blocking(move || st.auth.authenticate(&req.username, &req.password)).await?;
    let jar = state.auth.start_session(jar, &user)?;
    info!("User {} signed in", user.id);

    Ok((jar, Json(ApiResponse::success("Signed in.", vec![user]))))
}

pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = state.auth.end_session(jar);
    (jar, Json(ApiResponse::<User>::success("Signed out.", vec![])))
}
