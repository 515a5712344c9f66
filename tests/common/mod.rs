use std::sync::Arc;

use sekolah::sekolah_client::OverrideClient;
use sekolah::sekolah_config::BackendConfig;
use sekolah::testing::{MockBackend, spawn_mock_backend};
use serde_json::{Value, json};
use uuid::Uuid;

/// Start a mock backend and return a client pointed at it.
pub async fn setup_backend() -> (OverrideClient, Arc<MockBackend>) {
    let (base_url, backend) = spawn_mock_backend()
        .await
        .expect("Failed to start mock backend");
    let config = BackendConfig::new(base_url).with_token("test-token");
    let client = OverrideClient::new(config).expect("Failed to build client");
    (client, backend)
}

#[allow(dead_code)]
pub fn generate_unique_user_id() -> String {
    format!("user-{}", Uuid::new_v4())
}

/// An override as the backend would send it.
#[allow(dead_code)]
pub fn raw_override(id: i64, target_type: &str, target_id: &str, resource_key: &str) -> Value {
    json!({
        "id_override": id,
        "target_type": target_type,
        "target_id": target_id,
        "resource_key": resource_key,
        "view": true,
        "create": true,
        "edit": true,
        "delete": true
    })
}
