use apolo_api_client::ApiClient;
use serde_json::{json, Value};
use url::Url;
use wiremock::MockServer;

pub const API_TOKEN: &str = "test-api-token";
pub const AUTHORIZATION: &str = "Bearer test-api-token";

pub fn job(id: &str) -> Value {
    json!({
        "id": id,
        "org_name": "test-org",
        "project_name": "test-project",
        "name": "test-name",
        "status": "running",
        "http_url": "http://my_host:8889",
        "scheduler_enabled": true,
        "owner": "test-owner",
        "cluster_name": "default",
        "schedule_timeout": 3600,
        "uri": format!("job://default/test-owner/{id}"),
        "total_price_credits": "10.01",
        "price_credits_per_hour": "20",
        "restart_policy": "always",
        "tags": ["test-tag"],
        "priority": "high",
        "container": {
            "image": "test-image-name",
            "command": "test-command",
            "http": {"port": 8181},
            "resources": {
                "memory": 4096u64 << 20,
                "cpu": 7.0,
                "tpu": {"type": "v3-8", "software_version": "1.14"}
            },
            "secret_env": {"TEST_SECRET": "secret://test-user/secret"},
            "volumes": [{
                "src_storage_uri": "storage://test-user/path_read_only",
                "dst_path": "/container/read_only",
                "read_only": true
            }],
            "secret_volumes": [{
                "src_secret_uri": "secret://test-user/secret",
                "dst_path": "/container/read_only"
            }],
            "disk_volumes": [{
                "src_disk_uri": "disk://test-user/path_read_only",
                "dst_path": "/container/read_only"
            }]
        },
        "statuses": [{
            "status": "pending",
            "transition_time": "2025-03-26T09:10:10+00:00",
            "reason": "Creating"
        }],
        "history": {
            "status": "running",
            "created_at": "2025-03-26T09:10:10+00:00",
            "started_at": "2025-03-26T09:10:14+00:00",
            "run_time_seconds": 4.168895,
            "restarts": 0
        }
    })
}

pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(Url::parse(&server.uri()).unwrap(), API_TOKEN)
}

pub fn open_client(server: &MockServer) -> ApiClient {
    let client = client_for(server);
    client.open().unwrap();
    client
}
