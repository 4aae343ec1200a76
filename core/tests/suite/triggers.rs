use std::sync::Arc;

use airoute_core::ChannelNavigator;
use airoute_core::bridge;
use airoute_core::triggers::ManualInput;
use airoute_core::triggers::detect_search_query;
use airoute_core::triggers::omnibox_request;
use airoute_protocol::Ack;
use airoute_protocol::TabId;
use airoute_protocol::TabTarget;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::MockServer;

use super::engine_for;
use super::fallback;
use super::mount_record;

#[tokio::test]
async fn intercepted_search_navigates_the_searching_tab() {
    let server = MockServer::start().await;
    mount_record(
        &server,
        "witchborn%40webai",
        200,
        json!({
            "mode": "sovereign_app",
            "record": {"endpoint": {"interface": "https://witchborn.example/app"}},
        }),
    )
    .await;
    let engine = engine_for(&server);
    let (navigator, mut navigations) = ChannelNavigator::new();
    let (client, server_half) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let serving = tokio::spawn(server_half.serve(Arc::clone(&engine), Arc::new(navigator)));

    let interception = detect_search_query(
        "https://www.google.com/search?q=ai%3A%2F%2FWitchborn%40WebAI",
        engine.config(),
    )
    .expect("identity search");
    let ack = client
        .forward(interception.into_envelope(Some(TabId(42))))
        .await;

    assert_eq!(ack, Some(Ack::Resolving));
    let command = navigations.recv().await.expect("navigation");
    assert_eq!(command.tab, TabTarget::Tab(TabId(42)));
    assert_eq!(command.url, "https://witchborn.example/app");

    drop(client);
    assert_eq!(serving.await.expect("serve task"), 1);
}

#[tokio::test]
async fn manual_and_omnibox_requests_target_the_active_tab() {
    let server = MockServer::start().await;
    mount_record(&server, "acme%40webai", 404, json!({})).await;
    mount_record(
        &server,
        "agent.test",
        200,
        json!({"mode": "legacy_mcp", "endpoint": "http://agent.test:8080/"}),
    )
    .await;
    let engine = engine_for(&server);
    let (navigator, mut navigations) = ChannelNavigator::new();
    let (client, server_half) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let serving = tokio::spawn(server_half.serve(Arc::clone(&engine), Arc::new(navigator)));

    let mut input = ManualInput::with_value(engine.config(), "name@authority");
    input.focus();
    assert_eq!(input.submit(), None);
    input.set_value(" Acme@WebAI ");
    let manual = input.submit().expect("manual envelope");
    assert_eq!(client.forward(manual).await, Some(Ack::Resolving));
    let command = navigations.recv().await.expect("manual navigation");
    assert_eq!(command.tab, TabTarget::Active);
    assert_eq!(command.url, fallback(&server, "acme%40webai"));

    let omnibox = omnibox_request("Agent.Test").expect("omnibox envelope");
    assert_eq!(client.forward(omnibox).await, Some(Ack::Resolving));
    let command = navigations.recv().await.expect("omnibox navigation");
    assert_eq!(command.tab, TabTarget::Active);
    assert_eq!(command.url, "http://agent.test:8080/");

    drop(client);
    assert_eq!(serving.await.expect("serve task"), 2);
}

#[tokio::test]
async fn forwarding_without_a_resolver_is_dropped_quietly() {
    let (client, server_half) = bridge::channel(1);
    drop(server_half);

    let envelope = omnibox_request("acme").expect("envelope");
    assert_eq!(client.forward(envelope).await, None);
}
