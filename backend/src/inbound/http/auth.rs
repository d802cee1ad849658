//! Account endpoints: registration, login, logout, and the current user.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Ada","email":"ada@example.com","password":"secret1","type":"ORGANIZER"}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"secret1"}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    CredentialsError, Email, Error, LoginCredentials, Password, Registration, UserName, UserType,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{SuccessResponse, UserResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_value, require};

const NAME: FieldName = FieldName::new("name");
const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");
const TYPE: FieldName = FieldName::new("type");

/// Sign-up payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name, 2 to 100 characters.
    pub name: Option<String>,
    /// Login email.
    pub email: Option<String>,
    /// At least six characters.
    pub password: Option<String>,
    /// `ORGANIZER` or `ATTENDEE`; defaults to `ATTENDEE`.
    #[serde(rename = "type")]
    pub user_type: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let name = require(value.name, NAME)?;
        let email = require(value.email, EMAIL)?;
        let password = require(value.password, PASSWORD)?;
        Ok(Self {
            name: UserName::new(&name).map_err(|err| invalid_field_error(NAME, err))?,
            email: Email::new(&email).map_err(|err| invalid_field_error(EMAIL, err))?,
            password: Password::new_secret(&password)
                .map_err(|err| invalid_field_error(PASSWORD, err))?,
            user_type: value
                .user_type
                .as_deref()
                .map(|raw| parse_value::<UserType>(raw, TYPE))
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Login payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password).map_err(map_credentials_error)
    }
}

fn map_credentials_error(err: CredentialsError) -> Error {
    let field = match err {
        CredentialsError::InvalidEmail => EMAIL,
        CredentialsError::EmptyPassword | CredentialsError::PasswordTooShort { .. } => PASSWORD,
    };
    invalid_field_error(field, err)
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let user = state.accounts.authenticate(&credentials).await?;
    session.persist_user(&user.id())?;
    info!(user_id = %user.id(), "session established");
    Ok(web::Json(UserResponse::from(&user)))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Session cleared", body = SuccessResponse)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> web::Json<SuccessResponse> {
    session.clear();
    web::Json(SuccessResponse { success: true })
}

/// The user owning the session.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let user = state.accounts_query.current_user(&user_id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
    use crate::inbound::http::test_utils::{login_cookie, memory_state, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case::short_name(json!({"name":"A","email":"a@example.com","password":"secret1"}), "name")]
    #[case::bad_email(json!({"name":"Ada","email":"nope","password":"secret1"}), "email")]
    #[case::short_password(json!({"name":"Ada","email":"a@example.com","password":"12345"}), "password")]
    #[case::missing_email(json!({"name":"Ada","password":"secret1"}), "email")]
    #[case::unknown_type(json!({"name":"Ada","email":"a@example.com","password":"secret1","type":"ADMIN"}), "type")]
    #[actix_web::test]
    async fn register_rejects_invalid_payloads(#[case] body: Value, #[case] field: &str) {
        let app = actix_test::init_service(test_app(memory_state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn register_defaults_to_attendee_and_rejects_duplicates() {
        let app = actix_test::init_service(test_app(memory_state())).await;
        let body = json!({"name":" Ada ","email":"Ada@Example.com","password":"secret1"});
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["type"], "ATTENDEE");
        assert_eq!(value["name"], "Ada");
        assert_eq!(value["email"], "ada@example.com");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[rstest]
    #[actix_web::test]
    async fn login_me_logout_round_trip() {
        let app = actix_test::init_service(test_app(memory_state())).await;
        let cookie = login_cookie(&app, "ada@example.com", "ORGANIZER").await;
        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/auth/me")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["email"], "ada@example.com");
        assert_eq!(value["type"], "ORGANIZER");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let cleared = res
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE_NAME)
            .expect("removal cookie");
        assert_eq!(cleared.value(), "");
    }

    #[rstest]
    #[actix_web::test]
    async fn wrong_password_is_unauthorised() {
        let app = actix_test::init_service(test_app(memory_state())).await;
        login_cookie(&app, "ada@example.com", "ATTENDEE").await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email":"ada@example.com","password":"wrong-password"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["message"], "invalid credentials");
    }

    #[rstest]
    #[actix_web::test]
    async fn me_requires_a_session() {
        let app = actix_test::init_service(test_app(memory_state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/auth/me").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
