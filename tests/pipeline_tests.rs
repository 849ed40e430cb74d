//! End-to-end tests of the client pipeline against a local HTTP backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use http::Method;
use serde_json::{json, Value};

use pos_client::session::{AuthSession, LoginRequest, SessionStore};
use pos_client::ApiError;

mod common;

#[tokio::test]
async fn test_repeat_get_served_from_cache() {
    let backend = common::start_mock_backend(r#"{"success":true,"data":[]}"#).await;
    let h = common::harness(&backend.base_url(), AuthSession::new());

    let first: Value = h.client.get_json("/api/products", &[("page", "0")]).await.unwrap();
    let second: Value = h.client.get_json("/api/products", &[("page", "0")]).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(backend.call_count(), 1);
    assert_eq!(backend.requests()[0].target, "/api/products?page=0");
}

#[tokio::test]
async fn test_mutation_invalidates_resource_family() {
    for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
        let backend = common::start_mock_backend(r#"{"success":true,"data":{}}"#).await;
        let h = common::harness(&backend.base_url(), AuthSession::new());

        let _: Value = h.client.get_json("/api/products", &[("page", "0")]).await.unwrap();
        let _: Value = h.client.get_json("/api/customers", &[]).await.unwrap();
        assert_eq!(backend.call_count(), 2);

        let _: Value = h
            .client
            .send_json(method.clone(), "/api/products/5", &json!({"price": 3.5}))
            .await
            .unwrap();
        assert_eq!(backend.call_count(), 3);

        // products refetched, customers still cached
        let _: Value = h.client.get_json("/api/products", &[("page", "0")]).await.unwrap();
        let _: Value = h.client.get_json("/api/customers", &[]).await.unwrap();
        assert_eq!(backend.call_count(), 4, "{method}");

        let seen = backend.requests();
        assert_eq!(seen[2].method, method.as_str());
        assert_eq!(seen[2].body, r#"{"price":3.5}"#);
        assert_eq!(seen[3].target, "/api/products?page=0");
    }
}

#[tokio::test]
async fn test_never_cache_endpoints_hit_network() {
    let backend = common::start_mock_backend(r#"{"status":"UP"}"#).await;
    let h = common::harness(&backend.base_url(), AuthSession::new());

    for path in ["/actuator/health", "/api/auth/me", "/api/images/products/7.png"] {
        let before = backend.call_count();
        for _ in 0..3 {
            let _: Value = h.client.get_json(path, &[]).await.unwrap();
        }
        assert_eq!(backend.call_count() - before, 3, "{path}");
    }
    assert!(h.client.cache().is_empty());
}

#[tokio::test]
async fn test_failed_get_is_not_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let backend = common::start_programmable_backend(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            (503, String::new())
        } else {
            (200, r#"{"success":true,"data":[]}"#.to_string())
        }
    })
    .await;
    let h = common::harness(&backend.base_url(), AuthSession::new());

    let err = h.client.get_json::<Value>("/api/orders", &[]).await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));

    let _: Value = h.client.get_json("/api/orders", &[]).await.unwrap();
    let _: Value = h.client.get_json("/api/orders", &[]).await.unwrap();
    assert_eq!(backend.call_count(), 2);
}

#[tokio::test]
async fn test_silent_401_still_expires_session() {
    let backend = common::start_programmable_backend(|_| (401, String::new())).await;
    let h = common::harness(&backend.base_url(), AuthSession::with_token("stale"));
    assert!(h.session.is_logged_in());

    let err = h
        .client
        .get_json_silent::<Value>("/api/users/me", &[])
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert!(!h.session.is_logged_in());
    assert_eq!(h.navigator.visits(), vec!["/login".to_string()]);
    assert!(h.notifier.notices().is_empty());

    let seen = &backend.requests()[0];
    assert_eq!(seen.header("authorization"), Some("Bearer stale"));
    assert_eq!(seen.header("x-silent-error"), None);
}

#[tokio::test]
async fn test_401_notice_uses_short_duration() {
    let backend = common::start_programmable_backend(|_| (401, String::new())).await;
    let h = common::harness(&backend.base_url(), AuthSession::with_token("stale"));

    let _ = h.client.get_json::<Value>("/api/orders", &[]).await;

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].code, "AU003");
    assert_eq!(notices[0].duration, Duration::from_millis(3000));
    assert_eq!(h.navigator.visits().len(), 1);
}

#[tokio::test]
async fn test_notice_durations_by_status() {
    let backend = common::start_programmable_backend(|req| {
        if req.target.starts_with("/api/reports") {
            (503, String::new())
        } else {
            (404, String::new())
        }
    })
    .await;
    let h = common::harness(&backend.base_url(), AuthSession::new());

    let _ = h.client.get_json::<Value>("/api/reports/daily", &[]).await;
    let _ = h.client.get_json::<Value>("/api/products/999", &[]).await;

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].code, "NW001");
    assert_eq!(notices[0].duration, Duration::from_millis(6000));
    assert_eq!(notices[1].code, "GN001");
    assert_eq!(notices[1].message, "The requested resource was not found.");
    assert_eq!(notices[1].duration, Duration::from_millis(5000));
}

#[tokio::test]
async fn test_backend_error_body_wins() {
    let backend = common::start_programmable_backend(|_| {
        (
            403,
            r#"{"errorCode":"AU004","message":"Only admins may delete users"}"#.to_string(),
        )
    })
    .await;
    let h = common::harness(&backend.base_url(), AuthSession::with_token("t"));

    let err = h.client.delete("/api/users/3").await.unwrap_err();

    assert!(matches!(err, ApiError::Status { .. }));
    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].code, "AU004");
    assert_eq!(notices[0].message, "Only admins may delete users");
    assert!(h.session.is_logged_in());
}

#[tokio::test]
async fn test_unreachable_backend() {
    let addr = common::closed_port().await;
    let h = common::harness(&format!("http://{addr}"), AuthSession::new());

    let err = h.client.get_json::<Value>("/api/products", &[]).await.unwrap_err();

    assert!(matches!(err, ApiError::Unreachable(_)));
    assert_eq!(err.status_code(), Some(0));
    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].code, "NW001");
    assert_eq!(notices[0].duration, Duration::from_millis(6000));
    assert!(h.client.cache().is_empty());
}

#[tokio::test]
async fn test_login_then_bearer_header() {
    let backend = common::start_programmable_backend(|req| {
        if req.target == "/api/auth/login" {
            (
                200,
                r#"{"success":true,"message":"Login successful","data":{"token":"jwt-1","tokenType":"Bearer","username":"maria","email":"maria@pos.local","role":"MANAGER"}}"#
                    .to_string(),
            )
        } else {
            (200, r#"{"success":true,"data":[]}"#.to_string())
        }
    })
    .await;
    let h = common::harness(&backend.base_url(), AuthSession::new());

    let envelope = h
        .client
        .login(&LoginRequest {
            username: "maria".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();
    assert!(envelope.success);
    assert!(h.session.is_admin_or_manager());

    let _: Value = h.client.get_json("/api/inventory", &[]).await.unwrap();

    let seen = backend.requests();
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].header("authorization"), None);
    assert_eq!(seen[1].header("authorization"), Some("Bearer jwt-1"));
    assert!(seen[1].header("x-request-id").is_some());
}
