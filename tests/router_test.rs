use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Arc;

use clawmini::backends::echo::EchoBackend;
use clawmini::backends::{Backend, BackendRouter};
use clawmini::error::RouterError;

struct Fixed(&'static str);

#[async_trait]
impl Backend for Fixed {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

struct Broken;

#[async_trait]
impl Backend for Broken {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        bail!("backend exploded")
    }
}

fn unknown_name(err: &anyhow::Error) -> Option<Option<String>> {
    match err.downcast_ref::<RouterError>() {
        Some(RouterError::UnknownBackend { name }) => Some(name.clone()),
        None => None,
    }
}

#[tokio::test]
async fn default_is_first_registered_forever() {
    let router = BackendRouter::new();
    router.register("first", Arc::new(Fixed("first"))).await;
    router.register("second", Arc::new(Fixed("second"))).await;
    router.register("third", Arc::new(Fixed("third"))).await;

    assert_eq!(router.route("x", None).await.unwrap(), "first");
    assert_eq!(router.route("x", Some("third")).await.unwrap(), "third");
    assert_eq!(router.route("x", None).await.unwrap(), "first");
}

#[tokio::test]
async fn overwrite_replaces_callable_but_not_default() {
    let router = BackendRouter::new();
    router.register("a", Arc::new(Fixed("old"))).await;
    router.register("b", Arc::new(Fixed("b"))).await;
    router.register("a", Arc::new(Fixed("new"))).await;
    router.register("b", Arc::new(Fixed("b2"))).await;

    assert_eq!(router.default_backend().await.as_deref(), Some("a"));
    assert_eq!(router.route("x", None).await.unwrap(), "new");
}

#[tokio::test]
async fn unregistered_name_is_unknown_backend() {
    let router = BackendRouter::new();
    router.register("echo", Arc::new(EchoBackend)).await;

    let err = router.route("x", Some("nope")).await.unwrap_err();
    assert_eq!(unknown_name(&err), Some(Some("nope".to_string())));
    assert_eq!(err.to_string(), "unknown backend: nope");
}

#[tokio::test]
async fn empty_router_has_no_default() {
    let router = BackendRouter::new();

    let err = router.route("x", None).await.unwrap_err();
    assert_eq!(unknown_name(&err), Some(None));

    let err = router.route("x", Some("x")).await.unwrap_err();
    assert_eq!(unknown_name(&err), Some(Some("x".to_string())));
}

#[tokio::test]
async fn backend_errors_pass_through_unchanged() {
    let router = BackendRouter::new();
    router.register("broken", Arc::new(Broken)).await;

    let err = router.route("x", None).await.unwrap_err();
    assert!(unknown_name(&err).is_none());
    assert_eq!(err.to_string(), "backend exploded");
}

#[tokio::test]
async fn echo_returns_prompt() {
    let router = BackendRouter::new();
    router.register("echo", Arc::new(EchoBackend)).await;
    assert_eq!(router.route("hi", None).await.unwrap(), "hi");
}

#[tokio::test]
async fn contains_reports_registered_names_only() {
    let router = BackendRouter::new();
    assert!(!router.contains("echo").await);

    router.register("echo", Arc::new(EchoBackend)).await;
    assert!(router.contains("echo").await);
    assert!(!router.contains("ghost").await);
}
