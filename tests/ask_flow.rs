//! End-to-end tests: real server, real completion client, mock provider.

use std::time::{Duration, Instant};

use qa_agent::http::{AskResponse, HealthResponse};
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_ask_returns_provider_answer() {
    let provider = common::start_mock_provider(|| async { (200, common::completion_body("4")) }).await;
    let agent = common::start_agent(common::agent_config(&provider.base_url())).await;

    let res = common::http_client()
        .post(agent.url("/ask"))
        .json(&json!({"text": "2+2?"}))
        .send()
        .await
        .expect("agent unreachable");

    assert_eq!(res.status(), 200);
    let body: AskResponse = res.json().await.unwrap();
    assert_eq!(body.answer, "4");

    let request = provider.last_request().expect("provider was not called");
    assert!(request.head.starts_with("POST /v1/chat/completions"), "{}", request.head);
    assert!(
        request.head.to_lowercase().contains("authorization: bearer sk-test"),
        "{}",
        request.head
    );
    let sent: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(
        sent,
        json!({"model": "gpt-4o-mini", "messages": [{"role": "user", "content": "2+2?"}]})
    );

    agent.shutdown.trigger();
}

#[tokio::test]
async fn test_provider_error_is_not_leaked() {
    let provider = common::start_mock_provider(|| async {
        (
            500,
            json!({"error": {"message": "upstream exploded: secret-detail"}}).to_string(),
        )
    })
    .await;
    let agent = common::start_agent(common::agent_config(&provider.base_url())).await;

    let res = common::http_client()
        .post(agent.url("/ask"))
        .json(&json!({"text": "2+2?"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let text = res.text().await.unwrap();
    assert!(!text.contains("secret-detail"));
    assert_eq!(
        serde_json::from_str::<Value>(&text).unwrap(),
        json!({"error": "llm_failed"})
    );
    assert_eq!(provider.request_count(), 1, "no retries expected");

    agent.shutdown.trigger();
}

#[tokio::test]
async fn test_provider_timeout_fails_request() {
    let provider = common::start_mock_provider(|| async {
        tokio::time::sleep(Duration::from_secs(4)).await;
        (200, common::completion_body("too late"))
    })
    .await;
    let mut config = common::agent_config(&provider.base_url());
    config.llm.timeout_secs = 1;
    let agent = common::start_agent(config).await;

    let start = Instant::now();
    let res = common::http_client()
        .post(agent.url("/ask"))
        .json(&json!({"text": "2+2?"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"error": "llm_failed"}));
    assert!(start.elapsed() < Duration::from_secs(4));

    agent.shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_provider_body_fails_request() {
    let provider = common::start_mock_provider(|| async { (200, "not json".to_string()) }).await;
    let agent = common::start_agent(common::agent_config(&provider.base_url())).await;

    let res = common::http_client()
        .post(agent.url("/ask"))
        .json(&json!({"text": "hello"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"error": "llm_failed"}));

    agent.shutdown.trigger();
}

#[tokio::test]
async fn test_missing_api_key_never_calls_provider() {
    let provider = common::start_mock_provider(|| async { (200, common::completion_body("4")) }).await;
    let mut config = common::agent_config(&provider.base_url());
    config.llm.api_key = None;
    let agent = common::start_agent(config).await;

    let res = common::http_client()
        .post(agent.url("/ask"))
        .json(&json!({"text": "2+2?"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(provider.request_count(), 0);

    agent.shutdown.trigger();
}

#[tokio::test]
async fn test_health_does_not_depend_on_provider() {
    // Nothing listens on port 1.
    let agent = common::start_agent(common::agent_config("http://127.0.0.1:1/v1")).await;
    let client = common::http_client();

    let res = client.get(agent.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    let body: HealthResponse = res.json().await.unwrap();
    assert_eq!(
        body,
        HealthResponse {
            ok: true,
            service: "integration-agent".to_string()
        }
    );

    let res = client
        .post(agent.url("/ask"))
        .json(&json!({"text": "2+2?"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);

    agent.shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_questions_are_independent() {
    let provider = common::start_mock_provider(|| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        (200, common::completion_body("ok"))
    })
    .await;
    let agent = common::start_agent(common::agent_config(&provider.base_url())).await;
    let client = common::http_client();

    let mut handles = Vec::new();
    for i in 0..10 {
        let client = client.clone();
        let url = agent.url("/ask");
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({"text": format!("question {}", i)}))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), 200);
    }
    assert_eq!(provider.request_count(), 10);

    agent.shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_server() {
    let agent = common::start_agent(common::agent_config("http://127.0.0.1:1/v1")).await;

    let res = common::http_client().get(agent.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    agent.shutdown.trigger();
    let stopped = tokio::time::timeout(Duration::from_secs(5), agent.task)
        .await
        .expect("server did not stop");
    assert!(stopped.unwrap().is_ok());
}
