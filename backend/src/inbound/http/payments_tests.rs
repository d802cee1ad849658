//! Tests for the payment endpoints.

use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{
    TEST_WEBHOOK_SECRET, login_cookie, memory_state, test_app,
};
use crate::inbound::http::webhook_signature::{
    WEBHOOK_SIGNATURE_HEADER, WebhookSecrets, sign_payload,
};

fn post_json(uri: &str, cookie: Option<&Cookie<'static>>, body: Value) -> Request {
    let mut req = actix_test::TestRequest::post().uri(uri).set_json(body);
    if let Some(cookie) = cookie {
        req = req.cookie(cookie.clone());
    }
    req.to_request()
}

/// Provider notification signed with `secret`, or unsigned when `None`.
fn webhook_request(provider: &str, body: &Value, secret: Option<&str>) -> Request {
    let raw = serde_json::to_vec(body).expect("encode notification");
    let mut req = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/payments/webhooks/{provider}"))
        .insert_header(("content-type", "application/json"));
    if let Some(secret) = secret {
        req = req.insert_header((WEBHOOK_SIGNATURE_HEADER, sign_payload(secret.as_bytes(), &raw)));
    }
    req.set_payload(raw).to_request()
}

fn get(uri: &str, cookie: &Cookie<'static>) -> Request {
    actix_test::TestRequest::get()
        .uri(uri)
        .cookie(cookie.clone())
        .to_request()
}

/// Published event with one 50.00 BRL ticket type; returns (event id, ticket id).
async fn seeded_event<S, B>(app: &S, organizer: &Cookie<'static>) -> (String, String)
where
    S: actix_web::dev::Service<
            Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let event: Value = actix_test::read_body_json(
        actix_test::call_service(
            app,
            post_json(
                "/api/v1/events",
                Some(organizer),
                json!({"title": "Festival", "startDate": "2030-07-01T12:00:00Z"}),
            ),
        )
        .await,
    )
    .await;
    let event_id = event["id"].as_str().expect("event id").to_owned();
    let ticket: Value = actix_test::read_body_json(
        actix_test::call_service(
            app,
            post_json(
                "/api/v1/event-tickets",
                Some(organizer),
                json!({"eventId": event_id, "name": "Day pass", "price": 50, "quantityTotal": 3}),
            ),
        )
        .await,
    )
    .await;
    let ticket_id = ticket["id"].as_str().expect("ticket id").to_owned();
    let res = actix_test::call_service(
        app,
        post_json(
            &format!("/api/v1/events/{event_id}/publish"),
            Some(organizer),
            json!({}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    (event_id, ticket_id)
}

#[rstest]
#[actix_web::test]
async fn checkout_webhook_balance_withdraw() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let organizer = login_cookie(&app, "org@example.com", "ORGANIZER").await;
    let buyer = login_cookie(&app, "fan@example.com", "ATTENDEE").await;
    let (event_id, ticket_id) = seeded_event(&app, &organizer).await;

    let res = actix_test::call_service(
        &app,
        post_json(
            "/api/v1/payments/checkout",
            Some(&buyer),
            json!({"eventId": event_id, "ticketId": ticket_id, "quantity": 2, "method": "PIX"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let checkout: Value = actix_test::read_body_json(res).await;
    assert_eq!(checkout["transaction"]["status"], "PENDING");
    assert_eq!(checkout["transaction"]["amount"].as_f64(), Some(100.0));
    assert_eq!(checkout["payment"]["provider"], "ZOOP");
    assert!(checkout["payment"]["pixQrCode"].is_string());
    let external_id = checkout["payment"]["externalId"]
        .as_str()
        .expect("external id")
        .to_owned();
    assert!(external_id.starts_with("zoop_"));

    let paid: Value = actix_test::call_and_read_body_json(
        &app,
        webhook_request(
            "zoop",
            &json!({"data": {"id": external_id, "status": "paid"}}),
            Some(TEST_WEBHOOK_SECRET),
        ),
    )
    .await;
    assert_eq!(paid["status"], "PAID");

    let tickets: Value =
        actix_test::call_and_read_body_json(&app, get("/api/v1/users/me/tickets", &buyer)).await;
    assert_eq!(tickets.as_array().map(Vec::len), Some(1));
    assert_eq!(tickets[0]["ticket"]["name"], "Day pass");

    let balance: Value =
        actix_test::call_and_read_body_json(&app, get("/api/v1/payments/balance", &organizer))
            .await;
    assert_eq!(balance["balance"]["amount"].as_f64(), Some(100.0));
    assert_eq!(balance["balance"]["currency"], "BRL");

    let res = actix_test::call_service(
        &app,
        post_json("/api/v1/payments/withdraw", Some(&organizer), json!({"amount": 30})),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let withdrawn: Value = actix_test::read_body_json(res).await;
    assert_eq!(withdrawn["balance"]["amount"].as_f64(), Some(70.0));

    let res = actix_test::call_service(
        &app,
        post_json("/api/v1/payments/withdraw", Some(&organizer), json!({"amount": 100})),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Insufficient balance");
}

#[rstest]
#[actix_web::test]
async fn checkout_beyond_inventory_conflicts() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let organizer = login_cookie(&app, "org@example.com", "ORGANIZER").await;
    let buyer = login_cookie(&app, "fan@example.com", "ATTENDEE").await;
    let (event_id, ticket_id) = seeded_event(&app, &organizer).await;

    let res = actix_test::call_service(
        &app,
        post_json(
            "/api/v1/payments/checkout",
            Some(&buyer),
            json!({
                "eventId": event_id,
                "ticketId": ticket_id,
                "quantity": 4,
                "method": "CREDIT_CARD",
                "provider": "paypal"
            }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Not enough tickets available");
}

#[rstest]
#[actix_web::test]
async fn paypal_checkout_returns_an_approval_url() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let organizer = login_cookie(&app, "org@example.com", "ORGANIZER").await;
    let buyer = login_cookie(&app, "fan@example.com", "ATTENDEE").await;
    let (event_id, ticket_id) = seeded_event(&app, &organizer).await;

    let checkout: Value = actix_test::call_and_read_body_json(
        &app,
        post_json(
            "/api/v1/payments/checkout",
            Some(&buyer),
            json!({
                "eventId": event_id,
                "ticketId": ticket_id,
                "quantity": 1,
                "method": "CREDIT_CARD",
                "provider": "PAYPAL"
            }),
        ),
    )
    .await;
    assert_eq!(checkout["payment"]["provider"], "PAYPAL");
    let url = checkout["payment"]["checkoutUrl"].as_str().expect("approval url");
    assert!(url.contains("token=paypal_"));
}

#[rstest]
#[case::unknown_provider("stripe", json!({"data": {"id": "x"}}), StatusCode::BAD_REQUEST)]
#[case::malformed_payload("zoop", json!({"resource": {"id": "x"}}), StatusCode::BAD_REQUEST)]
#[case::unknown_reference(
    "paypal",
    json!({"resource": {"id": "paypal_missing", "status": "COMPLETED"}}),
    StatusCode::NOT_FOUND
)]
#[actix_web::test]
async fn webhook_errors(#[case] provider: &str, #[case] body: Value, #[case] status: StatusCode) {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let res = actix_test::call_service(
        &app,
        webhook_request(provider, &body, Some(TEST_WEBHOOK_SECRET)),
    )
    .await;
    assert_eq!(res.status(), status);
}

#[rstest]
#[case::zero(json!({"amount": 0}), StatusCode::BAD_REQUEST)]
#[case::missing(json!({}), StatusCode::BAD_REQUEST)]
#[case::negative(json!({"amount": -5}), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn withdraw_validates_amount(#[case] body: Value, #[case] status: StatusCode) {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let organizer = login_cookie(&app, "org@example.com", "ORGANIZER").await;
    let res = actix_test::call_service(
        &app,
        post_json("/api/v1/payments/withdraw", Some(&organizer), body),
    )
    .await;
    assert_eq!(res.status(), status);
}

#[rstest]
#[actix_web::test]
async fn attendees_have_no_balance() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let buyer = login_cookie(&app, "fan@example.com", "ATTENDEE").await;
    let res = actix_test::call_service(&app, get("/api/v1/payments/balance", &buyer)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

async fn pending_zoop_charge<S, B>(app: &S) -> (Cookie<'static>, String)
where
    S: actix_web::dev::Service<
            Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let organizer = login_cookie(app, "org@example.com", "ORGANIZER").await;
    let buyer = login_cookie(app, "fan@example.com", "ATTENDEE").await;
    let (event_id, ticket_id) = seeded_event(app, &organizer).await;
    let checkout: Value = actix_test::call_and_read_body_json(
        app,
        post_json(
            "/api/v1/payments/checkout",
            Some(&buyer),
            json!({"eventId": event_id, "ticketId": ticket_id, "quantity": 1, "method": "PIX"}),
        ),
    )
    .await;
    let external_id = checkout["payment"]["externalId"]
        .as_str()
        .expect("external id")
        .to_owned();
    (buyer, external_id)
}

#[rstest]
#[case::unsigned(None)]
#[case::wrong_secret(Some("guessed"))]
#[actix_web::test]
async fn unsigned_or_forged_notifications_are_rejected(#[case] secret: Option<&str>) {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let (buyer, external_id) = pending_zoop_charge(&app).await;

    let res = actix_test::call_service(
        &app,
        webhook_request(
            "zoop",
            &json!({"data": {"id": external_id, "status": "paid"}}),
            secret,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");

    let tickets: Value =
        actix_test::call_and_read_body_json(&app, get("/api/v1/users/me/tickets", &buyer)).await;
    assert_eq!(tickets, Value::Array(Vec::new()));
}

#[rstest]
#[actix_web::test]
async fn signature_is_checked_before_the_payload_is_parsed() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/payments/webhooks/paypal")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let raw = b"{not json";
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/payments/webhooks/paypal")
        .insert_header((
            WEBHOOK_SIGNATURE_HEADER,
            sign_payload(TEST_WEBHOOK_SECRET.as_bytes(), raw),
        ))
        .set_payload(raw.as_slice())
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn webhooks_are_rejected_when_no_secret_is_configured() {
    let state = memory_state().with_webhook_secrets(WebhookSecrets::default());
    let app = actix_test::init_service(test_app(state)).await;
    let (_, external_id) = pending_zoop_charge(&app).await;

    let res = actix_test::call_service(
        &app,
        webhook_request(
            "zoop",
            &json!({"data": {"id": external_id, "status": "paid"}}),
            Some(TEST_WEBHOOK_SECRET),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
