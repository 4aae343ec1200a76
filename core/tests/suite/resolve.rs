use std::sync::Arc;
use std::time::Duration;

use airoute_core::ChannelNavigator;
use airoute_core::FallbackReason;
use airoute_core::ResolutionEngine;
use airoute_core::ResolutionOutcome;
use airoute_core::ResolutionRequest;
use airoute_core::ResolverConfig;
use airoute_protocol::NavigationCommand;
use airoute_protocol::TabId;
use airoute_protocol::TabTarget;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::any;

use super::engine_for;
use super::fallback;
use super::mount_record;

#[tokio::test]
async fn sovereign_app_navigates_to_interface() {
    let server = MockServer::start().await;
    mount_record(
        &server,
        "agent.test",
        200,
        json!({
            "mode": "sovereign_app",
            "record": {"endpoint": {"interface": "https://agent.test/chat"}},
        }),
    )
    .await;
    let engine = engine_for(&server);
    let (navigator, mut navigations) = ChannelNavigator::new();

    let command = engine
        .handle(ResolutionRequest::new("ai://agent.test", None), &navigator)
        .await;

    let expected = NavigationCommand {
        tab: TabTarget::Active,
        url: "https://agent.test/chat".to_string(),
    };
    assert_eq!(command, Some(expected.clone()));
    assert_eq!(navigations.recv().await, Some(expected));
}

#[tokio::test]
async fn not_found_falls_back_to_profile() {
    let server = MockServer::start().await;
    mount_record(&server, "legacy.test", 404, json!({"detail": "Not Found"})).await;
    let engine = engine_for(&server);
    let (navigator, mut navigations) = ChannelNavigator::new();

    let command = engine
        .handle(ResolutionRequest::new("mcp://legacy.test", None), &navigator)
        .await
        .expect("navigation");

    assert_eq!(command.url, fallback(&server, "legacy.test"));
    assert_eq!(navigations.recv().await.map(|c| c.url), Some(command.url));
}

#[tokio::test]
async fn legacy_endpoint_must_look_like_a_url() {
    let server = MockServer::start().await;
    mount_record(
        &server,
        "good",
        200,
        json!({"mode": "legacy_mcp", "endpoint": "https://legacy.example/y"}),
    )
    .await;
    mount_record(
        &server,
        "bad",
        200,
        json!({"mode": "legacy_mcp", "endpoint": "notaurl"}),
    )
    .await;
    let engine = engine_for(&server);

    let good = engine.resolve_raw("mcp://good").await.expect("identity");
    assert_eq!(good.target, "https://legacy.example/y");
    assert_eq!(good.outcome, ResolutionOutcome::LegacyEndpoint);

    let bad = engine.resolve_raw("mcp://bad").await.expect("identity");
    assert_eq!(bad.target, fallback(&server, "bad"));
    assert_eq!(
        bad.outcome,
        ResolutionOutcome::Fallback(FallbackReason::LegacyEndpointNotUrl {
            endpoint: Some("notaurl".to_string()),
        })
    );
}

#[tokio::test]
async fn server_error_uses_normalized_identity_in_fallback() {
    let server = MockServer::start().await;
    mount_record(&server, "witchborn%40webai", 500, json!({})).await;
    let engine = engine_for(&server);

    let resolution = engine
        .resolve_raw("ai://WITCHBORN@WEBAI   ")
        .await
        .expect("identity");

    assert_eq!(resolution.identity.as_str(), "witchborn@webai");
    assert_eq!(resolution.target, fallback(&server, "witchborn%40webai"));
    assert_eq!(
        resolution.outcome,
        ResolutionOutcome::Fallback(FallbackReason::Status { status: 500 })
    );
}

#[tokio::test]
async fn malformed_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;
    let engine = engine_for(&server);

    let resolution = engine.resolve_raw("acme").await.expect("identity");

    assert_eq!(resolution.target, fallback(&server, "acme"));
    assert!(matches!(
        resolution.outcome,
        ResolutionOutcome::Fallback(FallbackReason::MalformedBody { .. })
    ));
    assert_eq!(resolution.record, None);
}

#[tokio::test]
async fn unreachable_directory_falls_back() {
    // Reserve a port, then release it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let uri = format!("http://127.0.0.1:{port}");
    let config = Arc::new(ResolverConfig::with_root(&uri));
    let engine = ResolutionEngine::new(config).expect("engine");

    let resolution = engine.resolve_raw("ai://acme").await.expect("identity");

    assert_eq!(resolution.target, format!("{uri}/codex/profile?query=acme"));
    assert!(matches!(
        resolution.outcome,
        ResolutionOutcome::Fallback(FallbackReason::Transport { .. })
    ));
}

#[tokio::test]
async fn hanging_directory_is_bounded_by_timeout() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"mode": "legacy_mcp", "endpoint": "https://late.example"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let config = Arc::new(ResolverConfig {
        timeout_ms: 100,
        ..ResolverConfig::with_root(&server.uri())
    });
    let engine = ResolutionEngine::new(config).expect("engine");

    let resolution = engine.resolve_raw("acme").await.expect("identity");

    assert_eq!(resolution.target, fallback(&server, "acme"));
    assert!(matches!(
        resolution.outcome,
        ResolutionOutcome::Fallback(FallbackReason::Transport {
            timed_out: true,
            ..
        })
    ));
}

#[tokio::test]
async fn blank_identity_issues_no_lookup_and_no_navigation() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let engine = engine_for(&server);
    let (navigator, mut navigations) = ChannelNavigator::new();

    for raw in ["", "   ", "ai://", " MCP://  "] {
        let command = engine
            .handle(ResolutionRequest::new(raw, Some(TabId(1))), &navigator)
            .await;
        assert_eq!(command, None, "{raw:?}");
    }

    drop(navigator);
    assert_eq!(navigations.recv().await, None);
}

#[tokio::test]
async fn navigation_targets_origin_tab() {
    let server = MockServer::start().await;
    mount_record(
        &server,
        "acme",
        200,
        json!({"mode": "legacy_mcp", "endpoint": "http://acme.local"}),
    )
    .await;
    let engine = engine_for(&server);
    let (navigator, _navigations) = ChannelNavigator::new();

    let command = engine
        .handle(ResolutionRequest::new("acme", Some(TabId(17))), &navigator)
        .await
        .expect("navigation");

    assert_eq!(command.tab, TabTarget::Tab(TabId(17)));
    assert_eq!(command.url, "http://acme.local");
}

#[tokio::test]
async fn sovereign_interface_is_not_reinterpreted() {
    let server = MockServer::start().await;
    mount_record(
        &server,
        "rel.test",
        200,
        json!({"mode": "sovereign_app", "record": {"endpoint": {"interface": "app.example/x"}}}),
    )
    .await;
    mount_record(
        &server,
        "blank.test",
        200,
        json!({"mode": "sovereign_app", "record": {"endpoint": {"interface": ""}}}),
    )
    .await;
    let engine = engine_for(&server);

    let kept = engine.resolve_raw("ai://rel.test").await.expect("identity");
    assert_eq!(kept.target, "app.example/x");
    assert_eq!(kept.outcome, ResolutionOutcome::Interface);

    let blank = engine.resolve_raw("ai://blank.test").await.expect("identity");
    assert_eq!(blank.target, fallback(&server, "blank.test"));
    assert_eq!(
        blank.outcome,
        ResolutionOutcome::Fallback(FallbackReason::MissingInterface)
    );
}
