//! End-to-end resolution through the HTTP service.

use std::time::Duration;

use domain_culture::DomainCulture;
use reqwest::StatusCode;

mod common;

async fn fetch(
    server: &common::TestServer,
    path_and_query: &str,
    headers: &[(&str, &str)],
) -> DomainCulture {
    let mut request = common::client().get(server.url(path_and_query));
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    let response = request.send().await.expect("server reachable");
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.expect("json body")
}

fn expected(domain: &str, culture: &str, language: &str, accept_language: &str) -> DomainCulture {
    DomainCulture {
        domain: domain.into(),
        culture: culture.into(),
        language: language.into(),
        accept_language: accept_language.into(),
    }
}

#[tokio::test]
async fn test_headers_only() {
    let server = common::start_server(common::test_config()).await;

    let result = fetch(
        &server,
        "/",
        &[("accept-language", "en-US"), ("domain", "com")],
    )
    .await;
    assert_eq!(result, expected("com", "en-US", "en", "en-US"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_weighted_accept_language() {
    let server = common::start_server(common::test_config()).await;

    let result = fetch(
        &server,
        "/products/42",
        &[("Accept-Language", "da, fr-CA;q=0.8, en;q=0.7"), ("Domain", "com")],
    )
    .await;
    assert_eq!(
        result,
        expected("com", "fr-CA", "fr", "da, fr-CA;q=0.8, en;q=0.7")
    );

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_query_domain_only_with_custom_name() {
    let mut config = common::test_config();
    config.culture.query_params.domain = "domainquery".into();
    let server = common::start_server(config).await;

    let result = fetch(&server, "/?domainquery=commx", &[]).await;
    assert_eq!(result, expected("commx", "es-MX", "es", "es-MX, es, *"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_query_params_beat_headers() {
    let mut config = common::test_config();
    config.culture.query_params.domain = "domainquery".into();
    config.culture.query_params.culture = "culturequery".into();
    let server = common::start_server(config).await;

    let result = fetch(
        &server,
        "/?culturequery=en-US&domainquery=commx",
        &[("accept-language", "en-US"), ("domain", "com")],
    )
    .await;
    assert_eq!(result, expected("commx", "en-US", "en", "en-US, en, *"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_ignored_query_params() {
    let mut config = common::test_config();
    config.culture.query_params.domain = "domainquery".into();
    config.culture.query_params.culture = "culturequery".into();
    config.culture.query_params.ignore = true;
    let server = common::start_server(config).await;

    let result = fetch(
        &server,
        "/?culturequery=en-US&domainquery=commx",
        &[("accept-language", "fr-CA"), ("domain", "com")],
    )
    .await;
    assert_eq!(result, expected("com", "fr-CA", "fr", "fr-CA"));

    let result = fetch(&server, "/?domainquery=commx", &[]).await;
    assert_eq!(result, expected("com", "en-US", "en", "en-US, en, *"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_invalid_signals_fall_back() {
    let server = common::start_server(common::test_config()).await;

    let unknown_culture = fetch(&server, "/?domain=commx&culture=klingon-MX", &[]).await;
    assert_eq!(unknown_culture, expected("commx", "es-MX", "es", "es-MX, es, *"));

    let unknown_domain = fetch(&server, "/?domain=foobar&culture=en-US", &[]).await;
    assert_eq!(unknown_domain, expected("com", "en-US", "en", "en-US, en, *"));

    let uppercase = fetch(&server, "/?domain=COMMX&culture=en-US", &[]).await;
    assert_eq!(uppercase, expected("commx", "en-US", "en", "en-US, en, *"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_reload_applies_new_whitelist() {
    let server = common::start_server(common::test_config()).await;

    let before = fetch(&server, "/", &[]).await;
    assert_eq!(before.domain, "com");

    let mut updated = common::test_config();
    updated.culture.default = "commx".into();
    server.config_updates.send(updated).unwrap();

    let mut after = None;
    for _ in 0..50 {
        let current = fetch(&server, "/", &[]).await;
        if current.domain == "commx" {
            after = Some(current);
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let after = after.expect("reload applied");
    assert_eq!(after, expected("commx", "es-MX", "es", "es-MX, es, *"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_health_and_graceful_shutdown() {
    let server = common::start_server(common::test_config()).await;

    let response = common::client()
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "ok");

    server.shutdown.trigger();
    let finished = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server stops after shutdown");
    assert!(finished.unwrap().is_ok());
}
