//! CSRF-protected contact form, driven through the full middleware stack.

use axum::http::{header, StatusCode};

use hello_forms::config::AppConfig;
use hello_forms::forms::CSRF_ERROR_MESSAGE;

mod common;

#[tokio::test]
async fn test_render_issues_token_and_session() {
    let router = common::server_with_tokens(5).router();
    let response = common::send(&router, common::get("/contact", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_owned();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));

    let html = common::body_text(response).await;
    let token = common::csrf_token(&html).unwrap();
    assert_eq!(token.len(), 36, "uuid token expected, got {token}");
}

#[tokio::test]
async fn test_existing_session_is_reused() {
    let router = common::server_with_tokens(5).router();
    let (cookie, first) = common::render_contact(&router, None).await;

    let response = common::send(&router, common::get("/contact", Some(&cookie))).await;
    assert!(common::session_cookie(&response).is_none(), "known session needs no new cookie");
    let second = common::csrf_token(&common::body_text(response).await).unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_valid_submission_redirects_and_flashes() {
    let router = common::server_with_tokens(5).router();
    let (cookie, token) = common::render_contact(&router, None).await;

    let response = common::send(
        &router,
        common::post_form("/contact", Some(&cookie), &common::contact_body(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/contact");

    let page = common::body_text(common::send(&router, common::get("/contact", Some(&cookie))).await).await;
    assert!(page.contains("Thanks, Alice! Your message was received."));

    // Flashes are shown once.
    let again = common::body_text(common::send(&router, common::get("/contact", Some(&cookie))).await).await;
    assert!(!again.contains("Thanks, Alice!"));
}

#[tokio::test]
async fn test_forged_token_is_rejected() {
    let router = common::server_with_tokens(5).router();
    let (cookie, _) = common::render_contact(&router, None).await;

    let response = common::send(
        &router,
        common::post_form("/contact", Some(&cookie), &common::contact_body("forged")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = common::body_text(response).await;
    assert!(html.contains(CSRF_ERROR_MESSAGE));
    // Submitted values survive the re-render, and a fresh token is offered.
    assert!(html.contains(r#"value="Alice""#));
    assert!(common::csrf_token(&html).is_some_and(|t| t != "forged"));
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let router = common::server_with_tokens(5).router();
    let (cookie, _) = common::render_contact(&router, None).await;

    let response = common::send(
        &router,
        common::post_form(
            "/contact",
            Some(&cookie),
            "name=Alice&email=alice%40example.com&message=Hi",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::body_text(response).await.contains(CSRF_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_token_from_another_session_is_rejected() {
    let router = common::server_with_tokens(5).router();
    let (_, token) = common::render_contact(&router, None).await;
    let (other_cookie, _) = common::render_contact(&router, None).await;

    let response = common::send(
        &router,
        common::post_form("/contact", Some(&other_cookie), &common::contact_body(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::body_text(response).await.contains(CSRF_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_token_without_session_cookie_is_rejected() {
    let router = common::server_with_tokens(5).router();
    let (_, token) = common::render_contact(&router, None).await;

    let response = common::send(&router, common::post_form("/contact", None, &common::contact_body(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::body_text(response).await.contains(CSRF_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_token_can_be_replayed() {
    let router = common::server_with_tokens(5).router();
    let (cookie, token) = common::render_contact(&router, None).await;

    for _ in 0..2 {
        let response = common::send(
            &router,
            common::post_form("/contact", Some(&cookie), &common::contact_body(&token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}

#[tokio::test]
async fn test_oldest_tokens_are_evicted() {
    let router = common::server_with_tokens(3).router();
    let (cookie, t1) = common::render_contact(&router, None).await;
    let mut tokens = vec![t1];
    for _ in 0..3 {
        let (_, t) = common::render_contact(&router, Some(&cookie)).await;
        tokens.push(t);
    }
    // Outstanding: t2, t3, t4. Each submission issues one more token first.

    let response = common::send(
        &router,
        common::post_form("/contact", Some(&cookie), &common::contact_body(&tokens[0])),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::body_text(response).await.contains(CSRF_ERROR_MESSAGE));

    // Outstanding now: t3, t4, t5.
    let response = common::send(
        &router,
        common::post_form("/contact", Some(&cookie), &common::contact_body(&tokens[3])),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_zero_token_bound_rejects_every_submission() {
    let router = common::server_with_tokens(0).router();
    let (cookie, token) = common::render_contact(&router, None).await;

    let response = common::send(
        &router,
        common::post_form("/contact", Some(&cookie), &common::contact_body(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::body_text(response).await.contains(CSRF_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_field_errors_are_rendered() {
    let router = common::server_with_tokens(5).router();
    let (cookie, token) = common::render_contact(&router, None).await;

    let body = format!("name=&email=not-an-email&message=Hi&csrf_token={}", token);
    let response = common::send(&router, common::post_form("/contact", Some(&cookie), &body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = common::body_text(response).await;
    assert!(html.contains("This field is required."));
    assert!(html.contains("Invalid email address."));
    assert!(!html.contains(CSRF_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_wrong_content_type_is_bad_request() {
    let router = common::server_with_tokens(5).router();
    let (cookie, _) = common::render_contact(&router, None).await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/contact")
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{}"))
        .unwrap();
    let response = common::send(&router, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reloaded_token_bound_applies_to_next_request() {
    let server = common::server_with_tokens(5);
    let router = server.router();
    let (cookie, token) = common::render_contact(&router, None).await;

    let mut config = AppConfig::default();
    config.forms.csrf_tokens = 0;
    server.state().config.store(config);

    let response = common::send(
        &router,
        common::post_form("/contact", Some(&cookie), &common::contact_body(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::body_text(response).await.contains(CSRF_ERROR_MESSAGE));
}
