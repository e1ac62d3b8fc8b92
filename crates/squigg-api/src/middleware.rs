use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::AppState;
use crate::session::AuthError;

/// Resolve the session cookie to a user and attach it as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = state.auth.resolve(&jar)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
