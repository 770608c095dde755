#![allow(dead_code)]
use batch_sandbox::config::{
    Config, EdgeConfig, LogFormat, SandboxConfig, ServerConfig, TelemetryConfig, TimeoutConfig,
};
use batch_sandbox::domain::routing_plan::RoutingPlanTable;
use batch_sandbox::AppBuilder;
use serde_json::{Value, json};
use std::sync::Once;
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub const SEND_PATH: &str = "/api/v1/send";
pub const VALID_ROUTING_PLAN_ID: &str = "b838b13c-f98c-4def-93f0-515d4e4f4ee1";
pub const GLOBAL_NHS_APP_ROUTING_PLAN_ID: &str = "00000000-0000-0000-0000-000000000001";

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("batch_sandbox=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mgmt_port: 0,
            shutdown_timeout_secs: 1,
        },
        sandbox: SandboxConfig { client_id: "sandbox_client_id".to_string(), routing_plans_file: None },
        edge: EdgeConfig { enabled: true },
        timeouts: TimeoutConfig { downstream_timeout_ms: 200 },
        telemetry: TelemetryConfig { log_format: LogFormat::Text },
    }
}

/// A batch body with the given routing plan and messages.
pub fn batch_body(routing_plan_id: &str, messages: Value) -> Value {
    json!({
        "data": {
            "type": "MessageBatch",
            "attributes": {
                "routingPlanId": routing_plan_id,
                "messageBatchReference": "request-ref-id",
                "messages": messages,
            }
        }
    })
}

/// A batch body with two plain messages referenced "1" and "2".
pub fn simple_batch(routing_plan_id: &str) -> Value {
    batch_body(routing_plan_id, json!([{ "messageReference": "1" }, { "messageReference": "2" }]))
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub config: Config,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(get_test_config()).await
    }

    pub async fn spawn_with_config(config: Config) -> Self {
        Self::spawn_with(config, None).await
    }

    pub async fn spawn_with_routing_plans(routing_plans: RoutingPlanTable) -> Self {
        Self::spawn_with(get_test_config(), Some(routing_plans)).await
    }

    async fn spawn_with(config: Config, routing_plans: Option<RoutingPlanTable>) -> Self {
        setup_tracing();

        let mut builder = AppBuilder::new(config.clone());
        if let Some(routing_plans) = routing_plans {
            builder = builder.with_routing_plans(routing_plans);
        }
        let app = builder.build().expect("Failed to build app");

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", listener.local_addr().unwrap());
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app.api).await.unwrap();
        });
        tokio::spawn(async move {
            axum::serve(mgmt_listener, app.mgmt).await.unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), config }
    }

    pub async fn send(&self, body: &Value) -> reqwest::Response {
        self.client.post(format!("{}{SEND_PATH}", self.server_url)).json(body).send().await.unwrap()
    }

    pub async fn send_raw(&self, body: &'static str) -> reqwest::Response {
        self.client
            .post(format!("{}{SEND_PATH}", self.server_url))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap()
    }
}

/// Asserts a `{"message": ...}` error response and that it is JSON.
pub async fn assert_message(resp: reqwest::Response, status: u16, message: &str) {
    assert_eq!(resp.status().as_u16(), status);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap().to_string();
    assert!(content_type.contains("json"), "unexpected content type {content_type}");

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": message }));
}
