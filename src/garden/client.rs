// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{DynamicObject, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{GardenApi, GardenKind};
use crate::progress::ProgressHandle;

/// Timeout for connecting to the garden API server
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for reading API responses
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum attempts for transient failures
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (doubles each retry)
const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// Page size for list requests
const PAGE_SIZE: u32 = 500;

/// Connection to one garden cluster
pub struct GardenClient {
    context: String,
    client: Client,
    progress: ProgressHandle,
}

impl GardenClient {
    /// Connect to the garden cluster behind a kubeconfig context
    ///
    /// Uses the kubeconfig's current context when none is given. The API
    /// server is contacted once so that unreachable gardens fail early.
    pub async fn connect(context: Option<&str>, progress: ProgressHandle) -> Result<Self> {
        let kubeconfig = Kubeconfig::read().context("Failed to read kubeconfig")?;

        let context_name = context
            .map(String::from)
            .or_else(|| kubeconfig.current_context.clone())
            .ok_or_else(|| anyhow!("No garden context given and no current context in kubeconfig"))?;

        if !kubeconfig.contexts.iter().any(|c| c.name == context_name) {
            return Err(anyhow!(
                "Garden context '{}' not found in kubeconfig",
                context_name
            ));
        }

        progress.connecting(&context_name);
        let start = Instant::now();

        let mut config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: Some(context_name.clone()),
                ..Default::default()
            },
        )
        .await
        .with_context(|| format!("Failed to load kubeconfig for context '{}'", context_name))?;

        config.connect_timeout = Some(CONNECT_TIMEOUT);
        config.read_timeout = Some(READ_TIMEOUT);

        let client = Client::try_from(config)
            .with_context(|| format!("Failed to create client for context '{}'", context_name))?;

        let version = client
            .apiserver_version()
            .await
            .with_context(|| format!("Failed to reach garden cluster '{}'", context_name))?;

        info!(
            context = %context_name,
            version = %version.git_version,
            "Connected to garden"
        );
        progress.connected(&context_name, start.elapsed().as_millis() as u64);

        Ok(Self {
            context: context_name,
            client,
            progress,
        })
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    fn dynamic_api(&self, kind: GardenKind, namespace: Option<&str>) -> Api<DynamicObject> {
        let ar = kind.api_resource();
        match namespace {
            Some(ns) if kind.is_namespaced() => Api::namespaced_with(self.client.clone(), ns, &ar),
            _ => Api::all_with(self.client.clone(), &ar),
        }
    }

    /// Run a request, retrying transient failures with exponential backoff
    async fn with_retry<T, F, Fut>(&self, what: &str, mut request: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = kube::Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match request().await {
                Ok(value) => return Ok(value),
                Err(e) if Self::is_retryable_error(&e) => {
                    let delay = RETRY_BASE_DELAY * 2u32.pow(attempt);
                    warn!(
                        request = %what,
                        context = %self.context,
                        attempt = attempt + 1,
                        max_attempts = MAX_RETRIES,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "Retryable error, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => {
                    debug!(request = %what, error = %e, "Non-retryable error");
                    return Err(anyhow!("Garden API error ({}): {}", what, e));
                }
            }
        }

        Err(anyhow!(
            "{} failed after {} attempts: {}",
            what,
            MAX_RETRIES,
            last_error.map(|e| e.to_string()).unwrap_or_default()
        ))
    }

    fn is_retryable_error(err: &kube::Error) -> bool {
        match err {
            kube::Error::HyperError(_) | kube::Error::Service(_) => true,
            // 429 rate limited, 503 unavailable, 504 gateway timeout
            kube::Error::Api(response) => matches!(response.code, 429 | 503 | 504),
            _ => false,
        }
    }
}

#[async_trait]
impl GardenApi for GardenClient {
    async fn list(
        &self,
        kind: GardenKind,
        namespace: Option<&str>,
    ) -> Result<Vec<serde_json::Value>> {
        let api = self.dynamic_api(kind, namespace);
        let what = format!("list {}", kind);
        self.progress.listing(kind.plural());
        let start = Instant::now();

        let mut items: Vec<DynamicObject> = Vec::new();
        let mut continue_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let mut params = ListParams::default().limit(PAGE_SIZE);
            if let Some(ref token) = continue_token {
                params = params.continue_token(token);
            }

            let page = self.with_retry(&what, || api.list(&params)).await?;
            items.extend(page.items);
            pages += 1;

            match page.metadata.continue_ {
                Some(token) if !token.is_empty() => continue_token = Some(token),
                _ => break,
            }
        }

        debug!(
            kind = %kind,
            namespace = ?namespace,
            pages,
            items = items.len(),
            "Listed garden resources"
        );
        self.progress
            .listed(kind.plural(), items.len(), start.elapsed().as_millis() as u64);

        // List items lack apiVersion/kind; put them back for manifest output
        let ar = kind.api_resource();
        items
            .into_iter()
            .map(|item| {
                let mut value = serde_json::to_value(item)
                    .with_context(|| format!("Failed to encode {}", kind))?;
                if let serde_json::Value::Object(ref mut map) = value {
                    map.insert("apiVersion".to_string(), ar.api_version.clone().into());
                    map.insert("kind".to_string(), ar.kind.clone().into());
                }
                Ok(value)
            })
            .collect()
    }

    async fn get(
        &self,
        kind: GardenKind,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Option<serde_json::Value>> {
        let api = self.dynamic_api(kind, namespace);
        let what = format!("get {} {}", kind, name);

        let object = self.with_retry(&what, || api.get_opt(name)).await?;
        debug!(kind = %kind, name = %name, found = object.is_some(), "Fetched garden resource");

        object
            .map(|o| serde_json::to_value(o).with_context(|| format!("Failed to encode {}", kind)))
            .transpose()
    }

    async fn secret_data(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let what = format!("get secret {}/{}", namespace, name);

        let secret = self.with_retry(&what, || api.get_opt(name)).await?;
        Ok(secret
            .and_then(|s| s.data)
            .and_then(|mut data| data.remove(key))
            .map(|bytes| bytes.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "test".to_string(),
            reason: "Test".to_string(),
            code,
        })
    }

    #[test]
    fn test_retryable_status_codes() {
        assert!(GardenClient::is_retryable_error(&api_error(429)));
        assert!(GardenClient::is_retryable_error(&api_error(503)));
        assert!(GardenClient::is_retryable_error(&api_error(504)));
        assert!(!GardenClient::is_retryable_error(&api_error(404)));
        assert!(!GardenClient::is_retryable_error(&api_error(403)));
    }
}
