//! Attendance and checkout tests

mod helpers;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use assert_matches::assert_matches;

use helpers::{event, FakeApi};
use sees_client::api::CheckoutOutcome;
use sees_client::services::AttendanceService;
use sees_client::state::Session;
use sees_client::utils::errors::SeesError;

#[tokio::test]
async fn test_toggle_attendance_round_trip() {
    let api = Arc::new(FakeApi::new(9).with_event(event(1)));
    let service = AttendanceService::new(api.clone());
    let session = Session::new(Some(9), Some("token".to_string()));
    let mut local = event(1);

    assert!(service.toggle_attendance(&session, &mut local).await.unwrap());
    assert!(local.is_attending(9));

    assert!(!service.toggle_attendance(&session, &mut local).await.unwrap());
    assert!(!local.is_attending(9));
    assert_eq!(api.calls(), vec!["update_event:1".to_string(), "update_event:1".to_string()]);
}

#[tokio::test]
async fn test_failed_update_leaves_event_alone() {
    let api = Arc::new(FakeApi::new(9).with_event(event(1)));
    api.fail_updates.store(true, Ordering::SeqCst);
    let service = AttendanceService::new(api.clone());
    let mut local = event(1);
    let before = local.clone();

    let result = service
        .toggle_attendance(&Session::new(Some(9), None), &mut local)
        .await;
    assert!(result.is_err());
    assert_eq!(local, before);
}

#[tokio::test]
async fn test_anonymous_viewer_cannot_attend_or_checkout() {
    let api = Arc::new(FakeApi::new(9).with_event(event(1)));
    let service = AttendanceService::new(api.clone());
    let mut local = event(1);

    assert_matches!(
        service.toggle_attendance(&Session::anonymous(), &mut local).await,
        Err(SeesError::Authentication(_))
    );
    assert_matches!(
        service.checkout(&Session::anonymous(), &mut local).await,
        Err(SeesError::Authentication(_))
    );
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_free_checkout_refreshes_event() {
    let api = Arc::new(FakeApi::new(9).with_event(event(1)));
    let service = AttendanceService::new(api.clone());
    let mut local = event(1);

    let outcome = service
        .checkout(&Session::new(Some(9), Some("token".to_string())), &mut local)
        .await
        .unwrap();

    assert_matches!(outcome, CheckoutOutcome::Registered);
    assert!(local.is_attending(9));
    assert_eq!(api.calls(), vec!["checkout:1".to_string(), "fetch_event:1".to_string()]);
}

#[tokio::test]
async fn test_paid_checkout_returns_payment_url() {
    let mut paid = event(2);
    paid.ticket_price = Some(25.0);
    let api = Arc::new(FakeApi::new(9).with_event(paid.clone()));
    *api.checkout_url.lock().unwrap() = Some("https://pay.example.com/session/1".to_string());
    let service = AttendanceService::new(api.clone());

    let outcome = service
        .checkout(&Session::new(Some(9), Some("token".to_string())), &mut paid)
        .await
        .unwrap();

    assert_matches!(outcome, CheckoutOutcome::Redirect(ref url) if url.path() == "/session/1");
    assert!(!paid.is_attending(9));
}
