use std::sync::Arc;
use std::time::Duration;

use airoute_core::ChannelNavigator;
use airoute_core::Navigator;
use airoute_core::bridge;
use airoute_protocol::Ack;
use airoute_protocol::TabId;
use airoute_protocol::TabTarget;
use airoute_protocol::TriggerEnvelope;
use airoute_protocol::TriggerMessage;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

use super::engine_for;
use super::fallback;
use super::mount_record;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_requests_each_navigate_their_own_tab() {
    let server = MockServer::start().await;
    // The slow lookup must not hold back the fast one.
    Mock::given(method("GET"))
        .and(path("/codex/resolve/slow.test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"mode": "legacy_mcp", "endpoint": "https://slow.test/"}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_record(&server, "fast.test", 404, json!({})).await;

    let engine = engine_for(&server);
    let (navigator, mut navigations) = ChannelNavigator::new();
    let navigator: Arc<dyn Navigator> = Arc::new(navigator);
    let (client, server_half) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let serving = tokio::spawn(server_half.serve(engine, navigator));

    let slow = client
        .send(TriggerEnvelope::new(
            TriggerMessage::resolve_identity("ai://slow.test"),
            Some(TabId(1)),
        ))
        .await
        .expect("ack");
    let fast = client
        .send(TriggerEnvelope::new(
            TriggerMessage::resolve_identity("mcp://fast.test"),
            Some(TabId(2)),
        ))
        .await
        .expect("ack");
    assert_eq!(slow, Ack::Resolving);
    assert_eq!(fast, Ack::Resolving);

    let first = navigations.recv().await.expect("first navigation");
    let second = navigations.recv().await.expect("second navigation");
    assert_eq!(first.tab, TabTarget::Tab(TabId(2)));
    assert_eq!(first.url, fallback(&server, "fast.test"));
    assert_eq!(second.tab, TabTarget::Tab(TabId(1)));
    assert_eq!(second.url, "https://slow.test/");

    drop(client);
    assert_eq!(serving.await.expect("serve task"), 2);
    assert!(navigations.try_recv().is_err());
}

#[tokio::test]
async fn requests_sent_before_serving_are_not_lost() {
    let server = MockServer::start().await;
    mount_record(
        &server,
        "early.test",
        200,
        json!({"mode": "sovereign_app", "record": {"endpoint": {"interface": "https://early.test/app"}}}),
    )
    .await;

    let (client, server_half) = bridge::channel(4);
    let pending = tokio::spawn(async move {
        client
            .send(TriggerEnvelope::new(
                TriggerMessage::resolve_identity("early.test"),
                None,
            ))
            .await
    });

    let (navigator, mut navigations) = ChannelNavigator::new();
    let serving = tokio::spawn(server_half.serve(engine_for(&server), Arc::new(navigator)));

    assert_eq!(pending.await.expect("send task").expect("ack"), Ack::Resolving);
    let command = navigations.recv().await.expect("navigation");
    assert_eq!(command.tab, TabTarget::Active);
    assert_eq!(command.url, "https://early.test/app");
    assert_eq!(serving.await.expect("serve task"), 1);
}

#[tokio::test]
async fn blank_identity_is_acknowledged_but_never_navigates() {
    let server = MockServer::start().await;
    let (client, server_half) = bridge::channel(4);
    let (navigator, mut navigations) = ChannelNavigator::new();
    let serving = tokio::spawn(server_half.serve(engine_for(&server), Arc::new(navigator)));

    let ack = client
        .send(TriggerEnvelope::new(
            TriggerMessage::resolve_identity("   "),
            Some(TabId(5)),
        ))
        .await
        .expect("ack");
    assert_eq!(ack, Ack::Resolving);

    drop(client);
    assert_eq!(serving.await.expect("serve task"), 1);
    assert_eq!(navigations.recv().await, None);
}
