//! Integration tests for credential rotation, backoff and the attempt budget

use super::test_utils::{blueprint, call, executor, quota, ScriptedClient};
use aegis::error::AegisError;
use aegis::executor::RequestExecutor;
use aegis::provider::{GenerationResponse, RemoteError};
use aegis::schema::SchemaContract;
use aegis::{CredentialPool, ExecutionPolicy};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_quota_on_first_key_rotates_without_backoff() {
    let client = ScriptedClient::exhausted_keys(&["k1"], blueprint(2));
    let executor = executor(&["k1", "k2"], client.clone());

    let started = Instant::now();
    let payload = executor
        .execute(&call(), &SchemaContract::blueprint())
        .await
        .unwrap();

    assert_eq!(payload.as_array().unwrap().len(), 2);
    assert_eq!(client.seen(), vec!["k1", "k2"]);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(executor.pool().current_index(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_single_key_waits_before_retrying() {
    let body = blueprint(1).to_string();
    let client = ScriptedClient::new(move |_, n| {
        if n == 1 {
            Err(quota())
        } else {
            Ok(GenerationResponse::text(body.clone()))
        }
    });
    let executor = executor(&["only"], client.clone());

    let started = Instant::now();
    executor
        .execute(&call(), &SchemaContract::blueprint())
        .await
        .unwrap();

    assert_eq!(client.calls(), 2);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(4), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_pool_fails_after_two_cycles() {
    let client = ScriptedClient::exhausted_keys(&["k1", "k2"], blueprint(1));
    let executor = executor(&["k1", "k2"], client.clone());

    let started = Instant::now();
    let err = executor
        .execute(&call(), &SchemaContract::blueprint())
        .await
        .unwrap_err();

    assert!(matches!(err, AegisError::QuotaExceeded(_)));
    assert!(err.to_string().contains("RESOURCE_EXHAUSTED"));
    assert_eq!(client.seen(), vec!["k1", "k2", "k1", "k2"]);
    // One wrap between the cycles; no pause after the final attempt.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(4), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_attempt_budget_scales_with_pool() {
    for size in 1..=4usize {
        let keys: Vec<String> = (0..size).map(|i| format!("key-{}", i)).collect();
        let client = ScriptedClient::new(|_, _| Err(quota()));
        let pool = Arc::new(CredentialPool::new(&keys).unwrap());
        let executor = RequestExecutor::with_policy(
            pool,
            client.clone(),
            ExecutionPolicy {
                backoff: Duration::from_millis(10),
                ..ExecutionPolicy::default()
            },
        );

        let err = executor
            .execute(&call(), &SchemaContract::blueprint())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "quota_exceeded");
        assert_eq!(client.calls(), 2 * size, "pool of {}", size);
    }
}

#[tokio::test(start_paused = true)]
async fn test_non_quota_failure_is_not_retried() {
    let client = ScriptedClient::new(|_, _| {
        Err(RemoteError::new(
            Some(403),
            "PERMISSION_DENIED: API key not valid",
        ))
    });
    let executor = executor(&["k1", "k2", "k3"], client.clone());

    let err = executor
        .execute(&call(), &SchemaContract::blueprint())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "request");
    assert_eq!(client.seen(), vec!["k1"]);
    assert_eq!(executor.pool().current_index(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_wording_without_status_is_retriable() {
    let body = blueprint(1).to_string();
    let client = ScriptedClient::new(move |key, _| {
        if key == "k1" {
            Err(RemoteError::new(None, "quota Exhausted for project"))
        } else {
            Ok(GenerationResponse::text(body.clone()))
        }
    });
    let executor = executor(&["k1", "k2"], client.clone());

    executor
        .execute(&call(), &SchemaContract::blueprint())
        .await
        .unwrap();
    assert_eq!(client.seen(), vec!["k1", "k2"]);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_payload_is_terminal() {
    let client = ScriptedClient::new(|_, _| {
        Ok(GenerationResponse::text(blueprint(13).to_string()))
    });
    let executor = executor(&["k1", "k2"], client.clone());

    let err = executor
        .execute(&call(), &SchemaContract::blueprint())
        .await
        .unwrap_err();
    match err {
        AegisError::Validation(e) => assert_eq!(e.field, "$"),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_failures_on_same_key_rotate_once() {
    let client = ScriptedClient::exhausted_keys(&["k1"], blueprint(1));
    let executor = executor(&["k1", "k2", "k3"], client.clone());
    let contract = SchemaContract::blueprint();
    let call = call();

    let results = join_all((0..4).map(|_| executor.execute(&call, &contract))).await;

    assert!(results.iter().all(Result::is_ok));
    let seen = client.seen();
    assert!(!seen.iter().any(|k| k == "k3"), "seen {:?}", seen);
    assert_eq!(executor.pool().current_index(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_bounds_the_retry_loop() {
    let client = ScriptedClient::new(|_, _| Err(quota()));
    let pool = Arc::new(CredentialPool::new(["solo"]).unwrap());
    let executor = RequestExecutor::with_policy(
        pool,
        client.clone(),
        ExecutionPolicy {
            attempts_per_credential: 10,
            deadline: Some(Duration::from_secs(5)),
            ..ExecutionPolicy::default()
        },
    );

    let err = executor
        .execute(&call(), &SchemaContract::blueprint())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "deadline_exceeded");
    assert!(client.calls() < 10);
}
