//! HTTP client tests against a mock SEES backend

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use sees_client::api::{CheckoutOutcome, EventApi, HttpEventApi};
use sees_client::config::ApiConfig;
use sees_client::models::{ContentKind, Event, EventFeed, LoginRequest, RegisterRequest, UpdateProfileRequest, ViewerRole};
use sees_client::services::{ServiceFactory, UpdateState};
use sees_client::state::Session;
use sees_client::utils::errors::{ApiError, SeesError};

const TOKEN: &str = "test-token";

/// Mock SEES backend
struct SeesMockServer {
    server: MockServer,
}

impl SeesMockServer {
    async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    fn api_config(&self, timeout_seconds: u64) -> ApiConfig {
        ApiConfig {
            base_url: self.server.uri(),
            timeout_seconds,
            user_agent: "SEES-Client/test".to_string(),
        }
    }

    fn client(&self, user_id: i64) -> HttpEventApi {
        HttpEventApi::new(&self.api_config(5), &Session::new(Some(user_id), Some(TOKEN.to_string())))
            .expect("client builds")
    }

    async fn mock_json(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}

fn event_json(id: i64, unread: bool) -> Value {
    json!({
        "id": id,
        "title": format!("Event {}", id),
        "description": "Workshop",
        "date": "2026-03-01T15:00:00Z",
        "event_type": "hybrid",
        "location": "Room 4",
        "virtual_location": "https://meet.example.com/abc",
        "ticket_price": "12.50",
        "organizers": [{"id": 1}],
        "speakers": [2],
        "attendees": ["3"],
        "has_unread_update": unread,
        "quizzes": [
            {"id": 10, "title": "Draft", "questions": [], "visible": false},
            {"id": 11, "title": "Published", "questions": [
                {"question": "Rust is memory safe?", "type": "true_false", "options": [], "correctAnswer": 0}
            ], "visible": true}
        ],
        "materials": [{"id": 20, "name": "Slides", "file": "/media/slides.pdf", "visible": true}]
    })
}

#[tokio::test]
async fn test_grouped_feed_classified_end_to_end() {
    let mock = SeesMockServer::new().await;
    mock.mock_json(
        "GET",
        "/api/events/",
        200,
        json!({
            "organized_events": [event_json(1, false)],
            "speaking_events": [event_json(1, false), event_json(2, true)],
            "attending_events": [event_json(2, true), event_json(3, false)]
        }),
    )
    .await;

    let services = ServiceFactory::new(Arc::new(mock.client(1)));
    let classified = services.load_my_events(&Session::new(Some(1), None)).await.unwrap();

    let ids = |role| classified.bucket(role).iter().map(|e| e.id).collect::<Vec<_>>();
    assert_eq!(ids(ViewerRole::Organizer), vec![1]);
    assert_eq!(ids(ViewerRole::Speaker), vec![2]);
    assert_eq!(ids(ViewerRole::Attendee), vec![3]);
    assert_eq!(classified.unread_count(), 1);
}

#[tokio::test]
async fn test_flat_feed_is_accepted() {
    let mock = SeesMockServer::new().await;
    mock.mock_json("GET", "/api/events/", 200, json!([event_json(5, false)])).await;

    let feed = mock.client(3).fetch_event_feed().await.unwrap();
    assert_matches!(feed, EventFeed::Flat(ref events) if events.len() == 1);
}

#[tokio::test]
async fn test_event_fields_decode_leniently() {
    let mock = SeesMockServer::new().await;
    mock.mock_json("GET", "/api/events/7/", 200, event_json(7, true)).await;

    let event = mock.client(1).fetch_event(7).await.unwrap();
    assert_eq!(event.ticket_price, Some(12.5));
    assert!(event.organizers.contains(&1));
    assert!(event.attendees.contains(&3));
    assert!(event.unread_update);
    assert_eq!(event.quizzes[1].questions[0].correct_choice(), Some("True"));
}

#[tokio::test]
async fn test_open_event_acknowledges_update() {
    let mock = SeesMockServer::new().await;
    mock.mock_json("GET", "/api/events/7/", 200, event_json(7, true)).await;
    Mock::given(method("POST"))
        .and(path("/api/events/7/mark-viewed/"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&mock.server)
        .await;

    let services = ServiceFactory::new(Arc::new(mock.client(3)));
    let detail = services.open_event(&Session::new(Some(3), None), 7, None).await.unwrap();

    assert_eq!(detail.role, ViewerRole::Attendee);
    assert_eq!(detail.state, UpdateState::Read);
    assert_eq!(detail.event.quizzes.len(), 1);
    assert_eq!(detail.event.quizzes[0].id, 11);
}

#[tokio::test]
async fn test_mark_viewed_server_error_keeps_unread() {
    let mock = SeesMockServer::new().await;
    mock.mock_json("GET", "/api/events/7/", 200, event_json(7, true)).await;
    mock.mock_json("POST", "/api/events/7/mark-viewed/", 500, json!({"error": "boom"})).await;

    let api = mock.client(1);
    let mut event = api.fetch_event(7).await.unwrap();
    let services = ServiceFactory::new(Arc::new(api));

    let result = services.tracker.mark_viewed(&mut event).await;
    assert_matches!(
        result,
        Err(SeesError::Api(ApiError::Status { status: 500, ref message, .. })) if message == "boom"
    );
    assert!(event.unread_update);
}

#[tokio::test]
async fn test_visibility_patch_sends_body_and_token() {
    let mock = SeesMockServer::new().await;
    Mock::given(method("PATCH"))
        .and(path("/api/quizzes/10/"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(body_json(json!({"visible": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 10, "visible": true})))
        .expect(1)
        .mount(&mock.server)
        .await;

    mock.client(1)
        .set_visibility(ContentKind::Quiz, 10, true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_material_toggle_rejected_by_backend() {
    let mock = SeesMockServer::new().await;
    mock.mock_json("GET", "/api/events/7/", 200, event_json(7, false)).await;
    mock.mock_json("PATCH", "/api/materials/20/", 403, json!({"detail": "Only organizers"})).await;

    let api = mock.client(1);
    let mut event = api.fetch_event(7).await.unwrap();
    let services = ServiceFactory::new(Arc::new(api));

    let result = services
        .visibility
        .set_visibility(ViewerRole::Organizer, 7, &mut event.materials, 20, false)
        .await;
    assert_matches!(result, Err(SeesError::Api(ApiError::Status { status: 403, .. })));
    assert!(event.materials[0].visible);
}

#[tokio::test]
async fn test_missing_event_maps_to_not_found() {
    let mock = SeesMockServer::new().await;
    mock.mock_json("GET", "/api/events/99/", 404, json!({"detail": "Not found."})).await;

    let result = mock.client(1).fetch_event(99).await;
    assert_matches!(result, Err(SeesError::EventNotFound { event_id: 99 }));
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let mock = SeesMockServer::new().await;
    mock.mock_json("GET", "/api/profile/", 401, json!({"detail": "Invalid token."})).await;

    let result = mock.client(1).fetch_profile().await;
    assert_matches!(result, Err(SeesError::Authentication(ref message)) if message == "Invalid token.");
}

#[tokio::test]
async fn test_checkout_outcomes() {
    let mock = SeesMockServer::new().await;
    mock.mock_json("POST", "/api/events/1/checkout/", 200, json!({"success": true})).await;
    mock.mock_json(
        "POST",
        "/api/events/2/checkout/",
        200,
        json!({"url": "https://checkout.stripe.com/pay/cs_test"}),
    )
    .await;
    mock.mock_json("POST", "/api/events/3/checkout/", 200, json!({})).await;

    let api = mock.client(1);
    assert_matches!(api.checkout(1).await, Ok(CheckoutOutcome::Registered));
    assert_matches!(
        api.checkout(2).await,
        Ok(CheckoutOutcome::Redirect(ref url)) if url.host_str() == Some("checkout.stripe.com")
    );
    assert_matches!(api.checkout(3).await, Err(SeesError::Api(ApiError::InvalidResponse { .. })));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let mock = SeesMockServer::new().await;
    Mock::given(method("GET"))
        .and(path("/api/events/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock.server)
        .await;

    let api = HttpEventApi::new(&mock.api_config(1), &Session::anonymous()).unwrap();
    let result = api.fetch_event_feed().await;
    assert_matches!(result, Err(SeesError::Api(ApiError::Timeout { .. })));
}

#[tokio::test]
async fn test_login_returns_session_with_token() {
    let mock = SeesMockServer::new().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .and(body_json(json!({"email": "ada@sees.dev", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "email": "ada@sees.dev", "first_name": "Ada", "last_name": "Lovelace", "token": "fresh-token"
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let anonymous = HttpEventApi::new(&mock.api_config(5), &Session::anonymous()).unwrap();
    let (response, session) = anonymous
        .login(&LoginRequest {
            email: "ada@sees.dev".to_string(),
            password: "hunter22".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.user.display_name(), "Ada Lovelace");
    assert_eq!(session.user_id(), Some(5));
    assert_eq!(session.token(), Some("fresh-token"));
    assert_eq!(anonymous.with_session(&session).token(), Some("fresh-token"));
}

#[tokio::test]
async fn test_register_checks_form_before_sending() {
    let mock = SeesMockServer::new().await;
    Mock::given(method("POST"))
        .and(path("/api/users/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9, "email": "ada@sees.dev"})))
        .expect(1)
        .mount(&mock.server)
        .await;

    let api = HttpEventApi::new(&mock.api_config(5), &Session::anonymous()).unwrap();
    let mut request = RegisterRequest {
        email: "ada@sees.dev".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        password: "hunter22".to_string(),
        password2: "hunter23".to_string(),
    };
    assert_matches!(api.register(&request).await, Err(SeesError::InvalidInput(_)));

    request.password2 = request.password.clone();
    request.email = "not-an-email".to_string();
    assert_matches!(api.register(&request).await, Err(SeesError::InvalidInput(_)));

    request.email = "ada@sees.dev".to_string();
    let profile = api.register(&request).await.unwrap();
    assert_eq!(profile.id, 9);
}

#[tokio::test]
async fn test_search_users_encodes_query() {
    let mock = SeesMockServer::new().await;
    Mock::given(method("GET"))
        .and(path("/api/users/search/"))
        .and(query_param("q", "ada & grace"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "email": "ada@sees.dev"},
            {"id": 6, "email": "grace@sees.dev"}
        ])))
        .expect(1)
        .mount(&mock.server)
        .await;

    let users = mock.client(1).search_users(" ada & grace ").await.unwrap();
    assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![5, 6]);
}

#[tokio::test]
async fn test_create_event_validates_before_posting() {
    let mock = SeesMockServer::new().await;
    Mock::given(method("POST"))
        .and(path("/api/events/"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(201).set_body_json(event_json(30, false)))
        .expect(1)
        .mount(&mock.server)
        .await;

    let api = mock.client(1);
    let session = Session::new(Some(1), Some(TOKEN.to_string()));
    let event: Event = serde_json::from_value(event_json(30, false)).unwrap();
    let mut valid = event.to_draft();
    valid.quizzes.clear();

    let mut untitled = valid.clone();
    untitled.title = "  ".to_string();
    assert_matches!(api.create_event(&session, &untitled).await, Err(SeesError::InvalidInput(_)));

    let mut no_link = valid.clone();
    no_link.virtual_location = None;
    assert_matches!(api.create_event(&session, &no_link).await, Err(SeesError::InvalidInput(_)));

    assert_matches!(
        api.create_event(&Session::anonymous(), &valid).await,
        Err(SeesError::Authentication(_))
    );

    let created = api.create_event(&session, &valid).await.unwrap();
    assert_eq!(created.id, 30);
}

#[tokio::test]
async fn test_update_profile_sends_only_changed_fields() {
    let mock = SeesMockServer::new().await;
    Mock::given(method("PUT"))
        .and(path("/api/profile/"))
        .and(body_json(json!({"phone": "555-0100"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "email": "ada@sees.dev", "first_name": "Ada", "last_name": "Lovelace", "phone": "555-0100"
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let profile = mock
        .client(1)
        .update_profile(&UpdateProfileRequest {
            phone: Some("555-0100".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(profile.phone.as_deref(), Some("555-0100"));
}
