use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::header::LOCATION;
use actix_web::HttpResponse;

use crate::config::SessionConfig;

pub const HOME_ROUTE: &str = "/";

/// Session cookie carrying the upstream bearer token
pub fn session_cookie(config: &SessionConfig, token: impl Into<String>) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), token.into())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(config.max_age_secs))
        .finish()
}

/// Cookie that tells the browser to drop the session
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(config.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .finish();
    cookie.make_removal();
    cookie
}

/// Redirect home with a fresh session cookie
pub fn signed_in(config: &SessionConfig, token: impl Into<String>) -> HttpResponse {
    HttpResponse::Found()
        .cookie(session_cookie(config, token))
        .insert_header((LOCATION, HOME_ROUTE))
        .finish()
}

/// Redirect home with the session cookie removed
pub fn signed_out(config: &SessionConfig) -> HttpResponse {
    HttpResponse::Found()
        .cookie(removal_cookie(config))
        .insert_header((LOCATION, HOME_ROUTE))
        .finish()
}
