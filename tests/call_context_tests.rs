//! Call context provider behavior through its public handle

mod common;

use anyhow::Result;
use std::time::Duration;

use ari_proxy_core::call_context::ProvideCallContext;
use ari_proxy_core::error::ProxyError;
use common::{eventually, DelayedWriteStore, ProviderHarness, SlowStore, UnreachableStore};

#[tokio::test]
async fn test_register_then_lookup_returns_registered_context() -> Result<()> {
    let harness = ProviderHarness::with_memory_store()?;

    let registered = harness.handle.register("channel-1", "ctx-1").await?;
    assert_eq!(registered.resource_id, "channel-1");
    assert_eq!(registered.call_context, "ctx-1");

    let provided = harness.handle.lookup("channel-1").await?;
    assert_eq!(provided.call_context, "ctx-1");

    harness.shutdown().await
}

#[tokio::test]
async fn test_register_overwrites_previous_mapping() -> Result<()> {
    let harness = ProviderHarness::with_memory_store()?;

    harness.handle.register("channel-1", "first").await?;
    harness.handle.register("channel-1", "second").await?;

    assert_eq!(harness.handle.lookup("channel-1").await?.call_context, "second");
    harness.shutdown().await
}

#[tokio::test]
async fn test_lookup_only_miss_names_resource_id() -> Result<()> {
    let harness = ProviderHarness::with_memory_store()?;

    let err = harness.handle.lookup("never-registered").await.unwrap_err();
    assert_eq!(
        err,
        ProxyError::LookupError {
            resource_id: "never-registered".to_string()
        }
    );
    assert!(err.to_string().contains("never-registered"));

    harness.shutdown().await
}

#[tokio::test]
async fn test_create_if_missing_returns_existing_mapping() -> Result<()> {
    let harness = ProviderHarness::with_memory_store()?;
    harness.handle.register("bridge-7", "existing").await?;

    let provided = harness
        .handle
        .provide(ProvideCallContext::create_if_missing("bridge-7"))
        .await?;
    assert_eq!(provided.call_context, "existing");
    assert_eq!(harness.cache.query("bridge-7").await?, Some("existing".to_string()));

    let stats = harness.handle.stats().await?;
    assert_eq!(stats.contexts_generated, 0);
    harness.shutdown().await
}

#[tokio::test]
async fn test_create_if_missing_generates_and_persists_token() -> Result<()> {
    let harness = ProviderHarness::with_memory_store()?;

    let provided = harness
        .handle
        .provide(ProvideCallContext::create_if_missing("playback-3"))
        .await?;
    let token = provided.call_context;
    assert!(!token.is_empty());
    assert!(uuid::Uuid::parse_str(&token).is_ok());

    // The write is queued before the reply is sent, so it lands first
    assert_eq!(harness.handle.lookup("playback-3").await?.call_context, token);

    // A second create-if-missing now hits the stored token
    let again = harness
        .handle
        .provide(ProvideCallContext::create_if_missing("playback-3"))
        .await?;
    assert_eq!(again.call_context, token);

    harness.shutdown().await
}

#[tokio::test]
async fn test_hint_is_returned_and_eventually_persisted() -> Result<()> {
    let harness = ProviderHarness::with_memory_store()?;
    harness.handle.register("channel-9", "stale").await?;

    let provided = harness
        .handle
        .provide(ProvideCallContext::create_if_missing("channel-9").with_hint("from-vars"))
        .await?;
    assert_eq!(provided.call_context, "from-vars");

    let cache = harness.cache.clone();
    let persisted = eventually(Duration::from_secs(1), || {
        let cache = cache.clone();
        async move { cache.query("channel-9").await.ok().flatten().as_deref() == Some("from-vars") }
    })
    .await;
    assert!(persisted, "hint was never persisted");

    assert_eq!(harness.handle.stats().await?.hints_accepted, 1);
    harness.shutdown().await
}

#[tokio::test]
async fn test_empty_hint_is_returned_without_reading_the_store() -> Result<()> {
    let harness = ProviderHarness::with_store(UnreachableStore)?;

    let provided = harness
        .handle
        .provide(ProvideCallContext::create_if_missing("channel-2").with_hint(""))
        .await?;
    assert_eq!(provided.call_context, "");

    let stats = harness.handle.stats().await?;
    assert_eq!(stats.hints_accepted, 1);
    assert_eq!(stats.store_errors, 0);
    harness.shutdown().await
}

#[tokio::test]
async fn test_registrations_apply_in_arrival_order() -> Result<()> {
    let harness =
        ProviderHarness::with_store(DelayedWriteStore::new("x-first", Duration::from_millis(50)))?;

    let (first, second) = tokio::join!(
        harness.handle.register("channel-4", "x-first"),
        harness.handle.register("channel-4", "x-second"),
    );
    first?;
    second?;

    assert_eq!(harness.handle.lookup("channel-4").await?.call_context, "x-second");
    harness.shutdown().await
}

#[tokio::test]
async fn test_hint_write_does_not_overwrite_later_registration() -> Result<()> {
    let harness =
        ProviderHarness::with_store(DelayedWriteStore::new("from-vars", Duration::from_millis(50)))?;

    let (provided, registered) = tokio::join!(
        harness
            .handle
            .provide(ProvideCallContext::create_if_missing("channel-6").with_hint("from-vars")),
        harness.handle.register("channel-6", "registered"),
    );
    assert_eq!(provided?.call_context, "from-vars");
    registered?;

    assert_eq!(harness.handle.lookup("channel-6").await?.call_context, "registered");
    harness.shutdown().await
}

#[tokio::test]
async fn test_lookup_only_ignores_hint() -> Result<()> {
    let harness = ProviderHarness::with_memory_store()?;

    let err = harness
        .handle
        .provide(ProvideCallContext::lookup_only("channel-5").with_hint("ignored"))
        .await
        .unwrap_err();
    assert!(err.is_lookup_miss());

    harness.shutdown().await
}

#[tokio::test]
async fn test_store_outage_fails_callers_immediately() -> Result<()> {
    let harness = ProviderHarness::with_store(UnreachableStore)?;

    let err = harness.handle.register("r", "c").await.unwrap_err();
    assert!(matches!(err, ProxyError::StoreError(ref msg) if msg.contains("connection refused")));

    let err = harness.handle.lookup("r").await.unwrap_err();
    assert!(matches!(err, ProxyError::StoreError(_)));
    assert!(!err.is_lookup_miss());

    harness.shutdown().await
}

#[tokio::test]
async fn test_health_report_reflects_store_state() -> Result<()> {
    let healthy = ProviderHarness::with_memory_store()?;
    assert!(healthy.handle.provide_health_report().await?.is_healthy());
    healthy.shutdown().await?;

    let broken = ProviderHarness::with_store(UnreachableStore)?;
    let report = broken.handle.provide_health_report().await?;
    assert_eq!(report.errors().len(), 1);
    assert!(report.errors()[0].contains("connection refused"));
    broken.shutdown().await
}

#[tokio::test]
async fn test_slow_store_does_not_block_other_requests() -> Result<()> {
    let harness = ProviderHarness::with_store(SlowStore::new(Duration::from_millis(300)))?;

    let slow_handle = harness.handle.clone();
    let slow = tokio::spawn(async move { slow_handle.lookup("slow").await });

    // Registration never reads, so it completes while the lookup is pending
    let started = tokio::time::Instant::now();
    harness.handle.register("fast", "ctx").await?;
    harness.handle.stats().await?;
    assert!(started.elapsed() < Duration::from_millis(250));

    let err = slow.await?.unwrap_err();
    assert!(err.is_lookup_miss());

    harness.shutdown().await
}

#[tokio::test]
async fn test_handle_after_shutdown_reports_channel_error() -> Result<()> {
    let harness = ProviderHarness::with_memory_store()?;
    let handle = harness.handle.clone();
    harness.shutdown().await?;

    assert!(handle.is_closed());
    let err = handle.register("r", "c").await.unwrap_err();
    assert!(matches!(err, ProxyError::ChannelError(_)));
    Ok(())
}
