use actix_web::{http::StatusCode, web, HttpResponse};
use tracing::{info, warn};

use super::models::{ActionFailure, ErrorDetail, FormFields, TokenResponse};
use super::session::{signed_in, signed_out};
use crate::error::AppError;
use crate::upstream::UpstreamResponse;
use crate::AppState;

/// Relay an upstream reply the handlers have no branch for, status and body untouched
pub fn passthrough(response: UpstreamResponse) -> HttpResponse {
    let mut builder = HttpResponse::build(response.status);
    if let Some(content_type) = response.content_type {
        builder.content_type(content_type);
    }
    builder.body(response.body)
}

pub async fn login(
    form: web::Form<FormFields>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    info!("Received login request for: {}", form.username());

    let response = state.auth_api.request_token(&form).await?;

    match response.status {
        StatusCode::OK => {
            let token: TokenResponse = response.json()?;
            info!("Login successful for: {}", form.username());
            Ok(signed_in(&state.config.session, token.access_token))
        }
        StatusCode::UNAUTHORIZED => {
            let detail: ErrorDetail = response.json()?;
            warn!("Login rejected for {}: {}", form.username(), detail.message());
            Ok(ActionFailure::new(StatusCode::UNAUTHORIZED, detail.message()).into_response())
        }
        status => {
            warn!("Login for {} got unhandled upstream status {}", form.username(), status);
            Ok(passthrough(response))
        }
    }
}

pub async fn signup(
    form: web::Form<FormFields>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner().with_default_measurement_system();
    info!("Received signup request for: {}", form.username());

    let response = state.auth_api.signup(&form).await?;

    match response.status {
        StatusCode::OK => {
            let token: TokenResponse = response.json()?;
            info!("Signup successful for: {}", form.username());
            Ok(signed_in(&state.config.session, token.access_token))
        }
        StatusCode::CONFLICT => {
            warn!("Signup rejected, username {} is taken", form.username());
            Ok(ActionFailure::username_conflict(form.username()).into_response())
        }
        status => {
            warn!("Signup for {} got unhandled upstream status {}", form.username(), status);
            Ok(passthrough(response))
        }
    }
}

pub async fn signout(state: web::Data<AppState>) -> HttpResponse {
    info!("Signing out");
    signed_out(&state.config.session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::MockAuthApi;
    use crate::Settings;
    use actix_web::{http::header::LOCATION, test, App};
    use serde_json::json;
    use std::sync::Arc;

    fn state(mock: MockAuthApi) -> web::Data<AppState> {
        let settings = Settings::defaults().expect("default settings");
        web::Data::new(AppState::with_auth_api(settings, Arc::new(mock)))
    }

    macro_rules! app {
        ($mock:expr) => {
            test::init_service(
                App::new()
                    .app_data(state($mock))
                    .route("/login", web::post().to(login))
                    .route("/signup", web::post().to(signup))
                    .route("/signout", web::post().to(signout)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_login_success_sets_cookie() {
        let mut mock = MockAuthApi::new();
        mock.expect_request_token()
            .withf(|form| {
                form.get("username") == Some("lifter")
                    && form.get("password") == Some("squat20242024")
            })
            .times(1)
            .returning(|_| {
                Ok(UpstreamResponse::json_body(
                    StatusCode::OK,
                    &json!({ "access_token": "jwt-token", "token_type": "bearer" }),
                ))
            });
        let app = app!(mock);

        let response = test::TestRequest::post()
            .uri("/login")
            .set_form([("username", "lifter"), ("password", "squat20242024")])
            .send_request(&app)
            .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
        let cookie = response
            .response()
            .cookies()
            .find(|c| c.name() == "token")
            .expect("token cookie");
        assert_eq!(cookie.value(), "jwt-token");
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[actix_web::test]
    async fn test_login_unauthorized_relays_detail() {
        let mut mock = MockAuthApi::new();
        mock.expect_request_token().times(1).returning(|_| {
            Ok(UpstreamResponse::json_body(
                StatusCode::UNAUTHORIZED,
                &json!({ "detail": "Incorrect username or password" }),
            ))
        });
        let app = app!(mock);

        let response = test::TestRequest::post()
            .uri("/login")
            .set_form([("username", "lifter"), ("password", "wrong")])
            .send_request(&app)
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.response().cookies().next().is_none());
        let body: ActionFailure = test::read_body_json(response).await;
        assert_eq!(body, ActionFailure {
            status: 401,
            message: "Incorrect username or password".to_string(),
        });
    }

    #[actix_web::test]
    async fn test_login_passes_through_other_statuses() {
        let mut mock = MockAuthApi::new();
        mock.expect_request_token().times(1).returning(|_| {
            Ok(UpstreamResponse::json_body(
                StatusCode::FORBIDDEN,
                &json!({ "detail": "Unauthorized." }),
            ))
        });
        let app = app!(mock);

        let response = test::TestRequest::post()
            .uri("/login")
            .set_form([("username", "lifter"), ("password", "squat20242024")])
            .send_request(&app)
            .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.response().cookies().next().is_none());
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body, json!({ "detail": "Unauthorized." }));
    }

    #[actix_web::test]
    async fn test_login_forwards_every_submitted_field() {
        let mut mock = MockAuthApi::new();
        mock.expect_request_token()
            .withf(|form| {
                *form
                    == FormFields::new([
                        ("username", "u"),
                        ("password", "p"),
                        ("scope", "me"),
                        ("grant_type", "password"),
                    ])
            })
            .times(1)
            .returning(|_| {
                Ok(UpstreamResponse::json_body(
                    StatusCode::OK,
                    &json!({ "access_token": "jwt-token" }),
                ))
            });
        let app = app!(mock);

        let response = test::TestRequest::post()
            .uri("/login")
            .set_form([
                ("username", "u"),
                ("password", "p"),
                ("scope", "me"),
                ("grant_type", "password"),
            ])
            .send_request(&app)
            .await;

        assert_eq!(response.status(), StatusCode::FOUND);
    }

    #[actix_web::test]
    async fn test_login_without_password_is_left_to_upstream() {
        let mut mock = MockAuthApi::new();
        mock.expect_request_token()
            .withf(|form| form.username() == "lifter" && form.get("password").is_none())
            .times(1)
            .returning(|_| {
                Ok(UpstreamResponse::json_body(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    &json!({ "detail": [{ "loc": ["body", "password"], "msg": "field required" }] }),
                ))
            });
        let app = app!(mock);

        let response = test::TestRequest::post()
            .uri("/login")
            .set_form([("username", "lifter")])
            .send_request(&app)
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.response().cookies().next().is_none());
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["detail"][0]["msg"], "field required");
    }

    #[actix_web::test]
    async fn test_login_malformed_body_is_bad_gateway() {
        let mut mock = MockAuthApi::new();
        mock.expect_request_token()
            .times(1)
            .returning(|_| Ok(UpstreamResponse::new(StatusCode::OK, "not json")));
        let app = app!(mock);

        let response = test::TestRequest::post()
            .uri("/login")
            .set_form([("username", "lifter"), ("password", "squat20242024")])
            .send_request(&app)
            .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.response().cookies().next().is_none());
    }

    #[actix_web::test]
    async fn test_signup_defaults_measurement_system() {
        let mut mock = MockAuthApi::new();
        mock.expect_signup()
            .withf(|form| form.get("measurement_system") == Some("imperial"))
            .times(1)
            .returning(|_| {
                Ok(UpstreamResponse::json_body(
                    StatusCode::OK,
                    &json!({ "access_token": "fresh-token" }),
                ))
            });
        let app = app!(mock);

        let response = test::TestRequest::post()
            .uri("/signup")
            .set_form([("username", "lifter"), ("password", "squat20242024")])
            .send_request(&app)
            .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        let cookie = response.response().cookies().next().expect("token cookie");
        assert_eq!(cookie.value(), "fresh-token");
    }

    #[actix_web::test]
    async fn test_signup_conflict_names_username() {
        let mut mock = MockAuthApi::new();
        mock.expect_signup()
            .withf(|form| form.get("measurement_system") == Some("metric"))
            .times(1)
            .returning(|_| {
                Ok(UpstreamResponse::json_body(
                    StatusCode::CONFLICT,
                    &json!({ "detail": "username lifter already exists!" }),
                ))
            });
        let app = app!(mock);

        let response = test::TestRequest::post()
            .uri("/signup")
            .set_form([
                ("username", "lifter"),
                ("password", "squat20242024"),
                ("measurement_system", "metric"),
            ])
            .send_request(&app)
            .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(response.response().cookies().next().is_none());
        let body: ActionFailure = test::read_body_json(response).await;
        assert_eq!(body.status, 409);
        assert!(body.message.contains("lifter"));
    }

    #[actix_web::test]
    async fn test_signout_without_session() {
        let mut mock = MockAuthApi::new();
        mock.expect_request_token().never();
        mock.expect_signup().never();
        mock.expect_current_user().never();
        let app = app!(mock);

        let response = test::TestRequest::post()
            .uri("/signout")
            .send_request(&app)
            .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
        let cookie = response.response().cookies().next().expect("removal cookie");
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "");
    }
}
