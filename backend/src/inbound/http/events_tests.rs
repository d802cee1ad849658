//! Tests for the event endpoints.

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::inbound::http::test_utils::{login_cookie, memory_state, test_app};

fn create_request(cookie: &Cookie<'static>, body: Value) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/v1/events")
        .cookie(cookie.clone())
        .set_json(body)
        .to_request()
}

fn meetup() -> Value {
    json!({
        "title": "Rust Meetup",
        "description": "Talks about async Rust",
        "startDate": "2030-05-01T19:00:00Z",
        "location": "São Paulo",
        "capacity": 120
    })
}

#[rstest]
#[actix_web::test]
async fn organizers_create_drafts_with_unique_slugs() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let cookie = login_cookie(&app, "org@example.com", "ORGANIZER").await;

    let first: Value =
        actix_test::call_and_read_body_json(&app, create_request(&cookie, meetup())).await;
    assert_eq!(first["slug"], "rust-meetup");
    assert_eq!(first["status"], "DRAFT");

    let res = actix_test::call_service(&app, create_request(&cookie, meetup())).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let second: Value = actix_test::read_body_json(res).await;
    assert_eq!(second["slug"], "rust-meetup-2");

    let by_slug: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/events/slug/rust-meetup-2")
            .to_request(),
    )
    .await;
    assert_eq!(by_slug["id"], second["id"]);
}

#[rstest]
#[actix_web::test]
async fn attendees_cannot_create_events() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let cookie = login_cookie(&app, "fan@example.com", "ATTENDEE").await;
    let res = actix_test::call_service(&app, create_request(&cookie, meetup())).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn creating_requires_a_session() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/events")
            .set_json(meetup())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case::missing_title(json!({"startDate": "2030-05-01T19:00:00Z"}), "title")]
#[case::bad_date(json!({"title": "Party", "startDate": "tomorrow"}), "startDate")]
#[case::zero_capacity(json!({"title": "Party", "startDate": "2030-05-01T19:00:00Z", "capacity": 0}), "capacity")]
#[case::short_title(json!({"title": " A ", "startDate": "2030-05-01T19:00:00Z"}), "title")]
#[case::long_title(json!({"title": "a".repeat(256), "startDate": "2030-05-01T19:00:00Z"}), "title")]
#[case::long_location(
    json!({"title": "Party", "startDate": "2030-05-01T19:00:00Z", "location": "x".repeat(256)}),
    "location"
)]
#[actix_web::test]
async fn create_validates_fields(#[case] body: Value, #[case] field: &str) {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let cookie = login_cookie(&app, "org@example.com", "ORGANIZER").await;
    let res = actix_test::call_service(&app, create_request(&cookie, body)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(res).await;
    assert_eq!(value["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn publish_patch_and_filter() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let cookie = login_cookie(&app, "org@example.com", "ORGANIZER").await;
    let created: Value =
        actix_test::call_and_read_body_json(&app, create_request(&cookie, meetup())).await;
    let id = created["id"].as_str().expect("id").to_owned();

    let published: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/events/{id}/publish"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(published["status"], "PUBLISHED");

    let patched: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/events/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({ "location": null, "title": "Rust Meetup XL" }))
            .to_request(),
    )
    .await;
    assert_eq!(patched["title"], "Rust Meetup XL");
    assert_eq!(patched["location"], Value::Null);
    assert_eq!(patched["slug"], "rust-meetup");

    let listed: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/events?status=PUBLISHED&q=ASYNC")
            .to_request(),
    )
    .await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let drafts: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/events?status=draft")
            .to_request(),
    )
    .await;
    assert_eq!(drafts.as_array().map(Vec::len), Some(0));
}

#[rstest]
#[actix_web::test]
async fn other_organizers_cannot_touch_an_event() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let owner = login_cookie(&app, "owner@example.com", "ORGANIZER").await;
    let intruder = login_cookie(&app, "other@example.com", "ORGANIZER").await;
    let created: Value =
        actix_test::call_and_read_body_json(&app, create_request(&owner, meetup())).await;
    let id = created["id"].as_str().expect("id").to_owned();

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/events/{id}/publish"))
            .cookie(intruder.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/events/{id}"))
            .cookie(intruder)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/events/{id}"))
            .cookie(owner)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[case::bad_uuid("/api/v1/events/not-a-uuid", StatusCode::BAD_REQUEST)]
#[case::unknown("/api/v1/events/3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::NOT_FOUND)]
#[case::unknown_slug("/api/v1/events/slug/missing", StatusCode::NOT_FOUND)]
#[case::bad_filter("/api/v1/events?organizerId=nope", StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn lookups_report_errors(#[case] uri: &str, #[case] status: StatusCode) {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), status);
}

#[rstest]
fn blank_search_is_ignored() {
    let filter = EventFilter::try_from(EventListQuery {
        q: Some("   ".to_owned()),
        ..EventListQuery::default()
    })
    .expect("valid filter");
    assert!(filter.search.is_none());
}
