use std::sync::Arc;

use airoute_core::ResolutionEngine;
use airoute_core::ResolverConfig;
use serde_json::Value;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

mod bridge;
mod resolve;
mod triggers;

/// Engine whose directory and profile URLs both live on `server`.
pub(crate) fn engine_for(server: &MockServer) -> Arc<ResolutionEngine> {
    let config = Arc::new(ResolverConfig::with_root(&server.uri()));
    Arc::new(ResolutionEngine::new(config).expect("engine"))
}

/// Answer `GET /codex/resolve/<encoded>` with `status` and a JSON body.
pub(crate) async fn mount_record(server: &MockServer, encoded: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/codex/resolve/{encoded}")))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

pub(crate) fn fallback(server: &MockServer, encoded: &str) -> String {
    format!("{}/codex/profile?query={encoded}", server.uri())
}
