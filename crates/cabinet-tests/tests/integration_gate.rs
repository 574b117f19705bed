// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Gate Integration Tests
//!
//! Every request goes through the full router with the clock frozen at
//! `TEST_NOW`.
//!
//! ## Test Categories
//!
//! - `test_missing_*`: absent token
//! - `test_invalid_*`: rejected token
//! - `test_admin_*`: admin-only rule
//! - `test_owner_*`: owner-or-admin rule
//! - `test_target_*`: malformed target id
//! - `test_scenario_*`: end-to-end scenarios

use cabinet_api::PrincipalIdClaim;
use cabinet_tests::common::init_test_logging;
use cabinet_tests::prelude::*;

const GUARDED_PATHS: [&str; 4] = [
    "/api/users",
    "/api/users/5",
    "/api/users/5/documents",
    "/api/me",
];

// =============================================================================
// Missing Token
// =============================================================================

#[tokio::test]
async fn test_missing_token_on_every_guarded_route() {
    init_test_logging();
    let app = TestApp::new();

    for path in GUARDED_PATHS {
        app.get(path).await.assert_missing_token();
    }
    assert_eq!(app.directory_calls(), 0);
}

#[tokio::test]
async fn test_missing_token_when_header_blank() {
    let app = TestApp::new();

    app.get_with_token("/api/users/5/documents", "")
        .await
        .assert_missing_token();
    app.get_with_token("/api/users/5/documents", "   ")
        .await
        .assert_missing_token();
}

#[tokio::test]
async fn test_missing_token_when_sent_in_another_header() {
    let app = TestApp::new();
    let token = app.token(5, 0).build();

    app.get_with_header("/api/users/5/documents", "authorization", &token)
        .await
        .assert_missing_token();
}

#[tokio::test]
async fn test_missing_token_before_malformed_target() {
    let app = TestApp::new();

    app.get("/api/users/abc/documents")
        .await
        .assert_missing_token();
}

// =============================================================================
// Invalid Token
// =============================================================================

#[tokio::test]
async fn test_invalid_garbage_token() {
    let app = TestApp::new();

    app.get_with_token("/api/me", "not-a-token")
        .await
        .assert_invalid_token();
}

#[tokio::test]
async fn test_invalid_foreign_signature() {
    let app = TestApp::new();
    let token = app.token(1, 1).secret(FOREIGN_SECRET).build();

    for path in GUARDED_PATHS {
        app.get_with_token(path, &token).await.assert_invalid_token();
    }
    assert_eq!(app.directory_calls(), 0);
}

#[tokio::test]
async fn test_invalid_tampered_signature() {
    let app = TestApp::new();
    let token = tamper_signature(&app.token(5, 0).build());

    app.get_with_token("/api/users/5/documents", &token)
        .await
        .assert_invalid_token();
}

#[tokio::test]
async fn test_invalid_bare_bearer_scheme() {
    let app = TestApp::new();

    app.get_with_token("/api/users/5/documents", "Bearer ")
        .await
        .assert_invalid_token();
}

#[tokio::test]
async fn test_invalid_expired_token() {
    let app = TestApp::new();
    let token = app.token(5, 0).expires_in(60).build();

    app.clock().advance(59);
    app.get_with_token("/api/me", &token)
        .await
        .assert_status(StatusCode::OK);

    app.clock().advance(1);
    app.get_with_token("/api/me", &token)
        .await
        .assert_invalid_token();
}

#[tokio::test]
async fn test_invalid_expired_admin_token_before_target_check() {
    let app = TestApp::new();
    let token = app
        .token(1, 1)
        .issued_at(TEST_NOW - 4 * DAY_SECS)
        .build();

    app.get_with_token("/api/users/abc", &token)
        .await
        .assert_invalid_token();
}

#[tokio::test]
async fn test_invalid_without_id_claim() {
    let app = TestApp::new();
    let token = app.token(5, 0).without_id().build();

    app.get_with_token("/api/me", &token)
        .await
        .assert_invalid_token();
}

#[tokio::test]
async fn test_invalid_when_id_under_other_claim() {
    let app = TestApp::new();
    let token = app.token(5, 0).id_claim(PrincipalIdClaim::UserId).build();

    app.get_with_token("/api/me", &token)
        .await
        .assert_invalid_token();
}

#[tokio::test]
async fn test_leeway_accepts_recently_expired_token() {
    let app = TestApp::with_config(TestAppConfig::new().leeway_secs(30));
    let token = app.token(5, 0).expires_in(60).build();

    app.clock().advance(75);
    app.get_with_token("/api/me", &token)
        .await
        .assert_status(StatusCode::OK);

    app.clock().advance(15);
    app.get_with_token("/api/me", &token)
        .await
        .assert_invalid_token();
}

// =============================================================================
// Admin-Only Rule
// =============================================================================

#[tokio::test]
async fn test_admin_only_refuses_regular_user() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::READER, 0).build();

    app.get_with_token("/api/users", &token)
        .await
        .assert_forbidden();
    assert_eq!(app.directory_calls(), 0);
}

#[tokio::test]
async fn test_admin_only_allows_every_admin_tier() {
    let app = TestApp::new();

    for role_id in [1, 2, 7] {
        let token = app.token(UserFixtures::ADMIN, role_id).build();
        let response = app.get_with_token("/api/users", &token).await;

        response.assert_status(StatusCode::OK);
        assert_eq!(response.total(), 4);
    }
}

#[tokio::test]
async fn test_admin_only_refuses_negative_role() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::READER, -1).build();

    app.get_with_token("/api/users", &token)
        .await
        .assert_forbidden();
}

// =============================================================================
// Owner-Or-Admin Rule
// =============================================================================

#[tokio::test]
async fn test_owner_reads_own_records() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::READER, 0).build();

    let response = app.get_with_token("/api/users/5", &token).await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body["username"], "reader");

    let response = app.get_with_token("/api/users/5/documents", &token).await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.item_ids(), vec![10, 11]);
}

#[tokio::test]
async fn test_owner_refused_on_other_user() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::READER, 0).build();

    app.get_with_token("/api/users/9", &token)
        .await
        .assert_forbidden();
    app.get_with_token("/api/users/9/documents", &token)
        .await
        .assert_forbidden();
    assert_eq!(app.directory_calls(), 0);
}

#[tokio::test]
async fn test_owner_rule_lets_admin_through() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::ADMIN, 1).build();

    let response = app.get_with_token("/api/users/9/documents", &token).await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.total(), DocumentFixtures::count_for(UserFixtures::OTHER) as u64);
}

#[tokio::test]
async fn test_owner_rule_allows_admin_owner() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::ADMIN, 1).build();

    app.get_with_token("/api/users/1", &token)
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_owner_rule_matches_leading_zero_target() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::READER, 0).build();

    app.get_with_token("/api/users/005/documents", &token)
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_owner_rule_with_user_id_claim() {
    let app = TestApp::with_config(TestAppConfig::new().id_claim(PrincipalIdClaim::UserId));
    let token = app.token(UserFixtures::READER, 0).build();

    app.get_with_token("/api/users/5/documents", &token)
        .await
        .assert_status(StatusCode::OK);
    app.get_with_token("/api/users/9/documents", &token)
        .await
        .assert_forbidden();
}

// =============================================================================
// Malformed Target
// =============================================================================

#[tokio::test]
async fn test_target_not_an_integer() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::READER, 0).build();

    for path in [
        "/api/users/abc",
        "/api/users/abc/documents",
        "/api/users/5x/documents",
        "/api/users/1.5",
        "/api/users/99999999999999999999",
    ] {
        app.get_with_token(path, &token).await.assert_invalid_target();
    }
    assert_eq!(app.directory_calls(), 0);
}

#[tokio::test]
async fn test_target_percent_encoded_is_refused() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::READER, 0).build();

    app.get_with_token("/api/users/%35/documents", &token)
        .await
        .assert_invalid_target();
    app.get_with_token("/api/users/5/documents", &token)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(app.directory_calls(), 1);
}

#[tokio::test]
async fn test_target_checked_before_admin_privilege() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::ADMIN, 1).build();

    app.get_with_token("/api/users/abc/documents", &token)
        .await
        .assert_invalid_target();
}

#[tokio::test]
async fn test_target_body_shape() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::READER, 0).build();

    let response = app.get_with_token("/api/users/abc", &token).await;
    response.assert_invalid_target();

    let keys: Vec<&str> = response
        .body
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&"error"));
    assert!(keys.contains(&"message"));
}

// =============================================================================
// Custom Header
// =============================================================================

#[tokio::test]
async fn test_custom_auth_header() {
    let app = TestApp::with_config(TestAppConfig::new().auth_header("x-token"));
    let token = app.token(UserFixtures::READER, 0).build();

    app.get_with_header("/api/me", "x-token", &token)
        .await
        .assert_status(StatusCode::OK);
    app.get_with_header("/api/me", DEFAULT_AUTH_HEADER, &token)
        .await
        .assert_missing_token();
}

#[tokio::test]
async fn test_header_name_is_case_insensitive() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::READER, 0).build();

    app.get_with_header("/api/me", "X-Docs-Cabinet-Authentication", &token)
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_bearer_prefix_tolerated() {
    let app = TestApp::new();
    let token = app.token(UserFixtures::READER, 0).build();

    app.get_with_token("/api/me", &format!("Bearer {}", token))
        .await
        .assert_status(StatusCode::OK);
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_scenario_owner_reads_own_documents() {
    let app = TestApp::new();
    let token = app.token(5, 0).build();

    let response = app.get_with_token("/api/users/5/documents", &token).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.total(), 2);
}

#[tokio::test]
async fn test_scenario_regular_user_refused_on_other_documents() {
    let app = TestApp::new();
    let token = app.token(5, 0).build();

    app.get_with_token("/api/users/9/documents", &token)
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn test_scenario_no_header() {
    let app = TestApp::new();

    app.get("/api/users/5/documents")
        .await
        .assert_missing_token();
}

#[tokio::test]
async fn test_scenario_token_older_than_policy() {
    let app = TestApp::new();
    let token = app
        .token(5, 0)
        .issued_at(TEST_NOW - 4 * DAY_SECS)
        .expires_in(3 * DAY_SECS)
        .build();

    app.get_with_token("/api/users/5/documents", &token)
        .await
        .assert_invalid_token();
}

#[tokio::test]
async fn test_scenario_health_needs_no_token() {
    let app = TestApp::new();

    let response = app.get("/health").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
