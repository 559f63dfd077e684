//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use tower::ServiceExt;

use hello_forms::config::AppConfig;
use hello_forms::HttpServer;

/// Server with default config except for the CSRF token bound.
pub fn server_with_tokens(csrf_tokens: i64) -> HttpServer {
    let mut config = AppConfig::default();
    config.forms.csrf_tokens = csrf_tokens;
    HttpServer::new(config).unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// POST an already url-encoded body.
pub fn post_form(path: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` pair of the session cookie set by a response.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_owned)
}

/// Value of the hidden `csrf_token` input in rendered HTML.
pub fn csrf_token(html: &str) -> Option<String> {
    let field = html.find(r#"name="csrf_token""#)?;
    let rest = &html[field..];
    let start = rest.find(r#"value=""#)? + r#"value=""#.len();
    let end = rest[start..].find('"')?;
    Some(rest[start..start + end].to_owned())
}

/// Render the contact form, returning the session cookie (new or reused) and the token.
pub async fn render_contact(router: &Router, cookie: Option<&str>) -> (String, String) {
    let response = send(router, get("/contact", cookie)).await;
    assert_eq!(response.status(), 200);
    let cookie = session_cookie(&response)
        .or_else(|| cookie.map(str::to_owned))
        .expect("session cookie");
    let token = csrf_token(&body_text(response).await).expect("csrf token in form");
    (cookie, token)
}

pub fn contact_body(token: &str) -> String {
    format!(
        "name=Alice&email=alice%40example.com&message=Hello+there&csrf_token={}",
        token
    )
}
