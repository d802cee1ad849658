//! Invitation endpoints.
//!
//! ```text
//! GET  /api/v1/event-invitations?eventId=
//! POST /api/v1/event-invitations {"eventId":"…","email":"guest@example.com"}
//! GET  /api/v1/event-invitations/{token}
//! POST /api/v1/event-invitations/{token}/accept
//! POST /api/v1/event-invitations/{token}/decline
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{InvitationResponse as Answer, InviteRequest};
use crate::domain::{Email, Error, EventId, InvitationToken};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::InvitationResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_id, require};

const EVENT_ID: FieldName = FieldName::new("eventId");
const EMAIL: FieldName = FieldName::new("email");
const TOKEN: FieldName = FieldName::new("token");

/// Query for `GET /event-invitations`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct InvitationListQuery {
    /// Event whose invitations are listed.
    pub event_id: Option<String>,
}

/// Payload for inviting someone to an event.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteBody {
    /// Event to invite to.
    pub event_id: Option<String>,
    /// Invitee email.
    #[schema(example = "guest@example.com")]
    pub email: Option<String>,
}

fn token(raw: &str) -> Result<InvitationToken, Error> {
    InvitationToken::new(raw).map_err(|err| invalid_field_error(TOKEN, err))
}

async fn answer(
    state: &HttpState,
    session: &SessionContext,
    raw_token: &str,
    accept: bool,
) -> ApiResult<web::Json<InvitationResponse>> {
    let user_id = session.require_user_id()?;
    let invitation = state
        .invitations
        .respond(Answer {
            token: token(raw_token)?,
            user_id,
            accept,
        })
        .await?;
    Ok(web::Json(InvitationResponse::from(&invitation)))
}

/// Invitations of an event, for its organizer.
#[utoipa::path(
    get,
    path = "/api/v1/event-invitations",
    params(InvitationListQuery),
    responses(
        (status = 200, description = "Invitations", body = [InvitationResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the organizer", body = Error),
        (status = 404, description = "Event not found", body = Error)
    ),
    tags = ["invitations"],
    operation_id = "listInvitations"
)]
#[get("/event-invitations")]
pub async fn list_invitations(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<InvitationListQuery>,
) -> ApiResult<web::Json<Vec<InvitationResponse>>> {
    let organizer_id = session.require_user_id()?;
    let raw = require(query.into_inner().event_id, EVENT_ID)?;
    let event_id: EventId = parse_id(&raw, EVENT_ID)?;
    let invitations = state
        .invitations_query
        .list_for_event(organizer_id, event_id)
        .await?;
    Ok(web::Json(
        invitations.iter().map(InvitationResponse::from).collect(),
    ))
}

/// Invite an email address to an event.
#[utoipa::path(
    post,
    path = "/api/v1/event-invitations",
    request_body = InviteBody,
    responses(
        (status = 201, description = "Invitation issued", body = InvitationResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the organizer", body = Error),
        (status = 404, description = "Event not found", body = Error)
    ),
    tags = ["invitations"],
    operation_id = "createInvitation"
)]
#[post("/event-invitations")]
pub async fn create_invitation(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<InviteBody>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    let body = payload.into_inner();
    let raw_event = require(body.event_id, EVENT_ID)?;
    let raw_email = require(body.email, EMAIL)?;
    let request = InviteRequest {
        organizer_id,
        event_id: parse_id(&raw_event, EVENT_ID)?,
        email: Email::new(&raw_email).map_err(|err| invalid_field_error(EMAIL, err))?,
    };
    let invitation = state.invitations.invite(request).await?;
    Ok(HttpResponse::Created().json(InvitationResponse::from(&invitation)))
}

/// Look up an invitation from its link token.
#[utoipa::path(
    get,
    path = "/api/v1/event-invitations/{token}",
    params(("token" = String, Path, description = "Invitation token")),
    responses(
        (status = 200, description = "Invitation", body = InvitationResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["invitations"],
    operation_id = "getInvitation",
    security([])
)]
#[get("/event-invitations/{token}")]
pub async fn get_invitation(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<InvitationResponse>> {
    let invitation = state.invitations_query.get_by_token(&token(&path)?).await?;
    Ok(web::Json(InvitationResponse::from(&invitation)))
}

/// Accept a pending invitation.
#[utoipa::path(
    post,
    path = "/api/v1/event-invitations/{token}/accept",
    params(("token" = String, Path, description = "Invitation token")),
    responses(
        (status = 200, description = "Accepted", body = InvitationResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already answered", body = Error)
    ),
    tags = ["invitations"],
    operation_id = "acceptInvitation"
)]
#[post("/event-invitations/{token}/accept")]
pub async fn accept_invitation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<InvitationResponse>> {
    answer(&state, &session, &path, true).await
}

/// Decline a pending invitation.
#[utoipa::path(
    post,
    path = "/api/v1/event-invitations/{token}/decline",
    params(("token" = String, Path, description = "Invitation token")),
    responses(
        (status = 200, description = "Declined", body = InvitationResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already answered", body = Error)
    ),
    tags = ["invitations"],
    operation_id = "declineInvitation"
)]
#[post("/event-invitations/{token}/decline")]
pub async fn decline_invitation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<InvitationResponse>> {
    answer(&state, &session, &path, false).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{login_cookie, memory_state, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[actix_web::test]
    async fn invite_then_answer_once() {
        let app = actix_test::init_service(test_app(memory_state())).await;
        let organizer = login_cookie(&app, "org@example.com", "ORGANIZER").await;
        let guest = login_cookie(&app, "guest@example.com", "ATTENDEE").await;
        let event: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/events")
                .cookie(organizer.clone())
                .set_json(json!({"title": "Launch", "startDate": "2030-03-01T10:00:00Z"}))
                .to_request(),
        )
        .await;
        let event_id = event["id"].as_str().expect("event id").to_owned();

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/event-invitations")
                .cookie(organizer.clone())
                .set_json(json!({"eventId": event_id, "email": " Guest@Example.com "}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let invitation: Value = actix_test::read_body_json(res).await;
        assert_eq!(invitation["status"], "PENDING");
        assert_eq!(invitation["email"], "guest@example.com");
        let token = invitation["token"].as_str().expect("token").to_owned();

        let fetched: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/event-invitations/{token}"))
                .to_request(),
        )
        .await;
        assert_eq!(fetched["id"], invitation["id"]);

        let accepted: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/event-invitations/{token}/accept"))
                .cookie(guest.clone())
                .to_request(),
        )
        .await;
        assert_eq!(accepted["status"], "ACCEPTED");
        assert!(accepted["respondedAt"].is_string());

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/event-invitations/{token}/decline"))
                .cookie(guest.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/event-invitations?eventId={event_id}"))
                .cookie(guest)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let listed: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/event-invitations?eventId={event_id}"))
                .cookie(organizer)
                .to_request(),
        )
        .await;
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
    }

    #[rstest]
    #[actix_web::test]
    async fn answering_requires_a_session() {
        let app = actix_test::init_service(test_app(memory_state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/event-invitations/some-token/accept")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_tokens_are_not_found() {
        let app = actix_test::init_service(test_app(memory_state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/event-invitations/unknown")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
