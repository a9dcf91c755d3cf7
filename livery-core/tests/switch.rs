use anyhow::Result;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use cookie::Cookie;
use livery_core::{
    CookieOptions, ThemeLayer, ThemeRegistry,
    switch::{SwitchState, switch_router},
};
use serde_json::Value;
use tower::ServiceExt;

fn layer() -> ThemeLayer {
    let registry = ThemeRegistry::new(["light", "dark"], "light").unwrap();
    ThemeLayer::builder(registry)
        .cookie(CookieOptions::new("theme"))
        .build()
}

fn standalone_app() -> Router {
    switch_router(SwitchState::from_layer(&layer()))
}

fn layered_app() -> Router {
    let layer = layer();
    switch_router(SwitchState::from_layer(&layer)).layer(layer)
}

fn theme_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse(value.to_string()).ok())
        .filter(|cookie| cookie.name() == "theme")
        .map(|cookie| cookie.value().to_string())
        .collect()
}

fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn switch_redirects_to_referer_and_sets_cookie() -> Result<()> {
    let request = Request::builder()
        .uri("/theme/switch?theme=dark")
        .header(header::HOST, "example.com")
        .header(header::REFERER, "https://example.com/articles/7")
        .body(Body::empty())?;

    let response = standalone_app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("https://example.com/articles/7"));
    assert_eq!(theme_cookies(&response), vec!["dark".to_string()]);
    Ok(())
}

#[tokio::test]
async fn switch_without_referer_redirects_home() -> Result<()> {
    let request = Request::builder()
        .uri("/theme/switch?theme=light")
        .body(Body::empty())?;

    let response = standalone_app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/"));
    Ok(())
}

#[tokio::test]
async fn foreign_referer_redirects_home() -> Result<()> {
    let request = Request::builder()
        .uri("/theme/switch?theme=dark")
        .header(header::HOST, "example.com")
        .header(header::REFERER, "https://evil.example/phish")
        .body(Body::empty())?;

    let response = standalone_app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/"));
    assert_eq!(theme_cookies(&response), vec!["dark".to_string()]);
    Ok(())
}

#[tokio::test]
async fn unknown_theme_is_not_found() -> Result<()> {
    let request = Request::builder()
        .uri("/theme/switch?theme=neon")
        .body(Body::empty())?;

    let response = standalone_app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let json: Value = serde_json::from_slice(&body)?;
    assert_eq!(json["error"]["status"], 404);
    assert_eq!(json["error"]["message"], "unknown theme `neon`");
    Ok(())
}

#[tokio::test]
async fn missing_theme_parameter_is_rejected() -> Result<()> {
    let request = Request::builder()
        .uri("/theme/switch")
        .body(Body::empty())?;

    let response = standalone_app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn layered_switch_overrides_cookie_theme_once() -> Result<()> {
    let request = Request::builder()
        .uri("/theme/switch?theme=light")
        .header(header::COOKIE, "theme=dark")
        .body(Body::empty())?;

    let response = layered_app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(theme_cookies(&response), vec!["light".to_string()]);
    Ok(())
}

#[tokio::test]
async fn layered_switch_to_cookie_theme_sets_single_cookie() -> Result<()> {
    let request = Request::builder()
        .uri("/theme/switch?theme=dark")
        .header(header::COOKIE, "theme=dark")
        .body(Body::empty())?;

    let response = layered_app().oneshot(request).await?;

    assert_eq!(theme_cookies(&response), vec!["dark".to_string()]);
    Ok(())
}
