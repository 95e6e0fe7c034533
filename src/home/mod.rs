//! Home page loader

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use tracing::{info, warn};

use crate::auth::handlers::passthrough;
use crate::error::{AppError, AuthError};
use crate::AppState;

/// Fetch the signed-in user's profile for the home page.
///
/// The session cookie is forwarded to `/users/me/` as a bearer token and a
/// 200 body is returned as-is. Requests without a cookie are answered with
/// 401 and never reach the upstream.
pub async fn home(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let cookie = req
        .cookie(&state.config.session.cookie_name)
        .filter(|c| !c.value().is_empty())
        .ok_or(AuthError::NotSignedIn)?;

    let response = state.auth_api.current_user(cookie.value()).await?;

    match response.status {
        StatusCode::OK => {
            let profile: serde_json::Value = response.json()?;
            info!("Loaded profile for home page");
            Ok(HttpResponse::Ok().json(profile))
        }
        status => {
            warn!("Profile lookup got upstream status {}", status);
            Ok(passthrough(response))
        }
    }
}
