// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Resource type sources
//!
//! One [`Source`](crate::element::Source) per Gardener resource type, each
//! backed by the garden API. Shoots, seeds and projects are cached per key;
//! cloud profiles are only ever listed as a whole.

mod profile;
mod project;
mod seed;
mod shoot;

pub use profile::{ProfileAdapter, ProfileSource};
pub use project::ProjectSource;
pub use seed::{SeedSource, seed_kubeconfig};
pub use shoot::{ShootSource, shoot_kubeconfig};

use anyhow::Context;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::garden::{GardenApi, GardenKind};

/// Shared handle to the garden cluster
pub type Garden = Arc<dyn GardenApi>;

/// Secret data key holding a kubeconfig
pub const KUBECONFIG_KEY: &str = "kubeconfig";

/// List one kind and parse every item, failing on the first bad manifest
async fn list_parsed<T>(
    garden: &dyn GardenApi,
    kind: GardenKind,
    namespace: Option<&str>,
    parse: fn(Value) -> anyhow::Result<T>,
) -> Result<Vec<T>> {
    let what = match namespace {
        Some(ns) => format!("{} in {}", kind, ns),
        None => kind.to_string(),
    };
    garden
        .list(kind, namespace)
        .await
        .and_then(|items| items.into_iter().map(parse).collect())
        .map_err(|e| Error::fetch(what, e))
}

/// Fetch and parse one object, `None` if it does not exist
async fn get_parsed<T>(
    garden: &dyn GardenApi,
    kind: GardenKind,
    namespace: Option<&str>,
    name: &str,
    parse: fn(Value) -> anyhow::Result<T>,
) -> Result<Option<T>> {
    let what = format!("{} {}", kind.kind(), name);
    garden
        .get(kind, namespace, name)
        .await
        .and_then(|item| item.map(parse).transpose())
        .map_err(|e| Error::fetch(what, e))
}

/// Turn a "not found" from a cache lookup back into `None`
fn found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(elem) => Ok(Some(elem)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Read a kubeconfig secret, failing when it is missing
async fn read_kubeconfig(
    garden: &dyn GardenApi,
    namespace: &str,
    name: &str,
) -> anyhow::Result<Vec<u8>> {
    garden
        .secret_data(namespace, name, KUBECONFIG_KEY)
        .await
        .with_context(|| format!("Failed to read secret {}/{}", namespace, name))?
        .with_context(|| format!("Secret {}/{} has no kubeconfig", namespace, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotFoundOrigin;
    use crate::garden::model::{Seed, fixtures};
    use crate::garden::testing::StaticGarden;

    #[tokio::test]
    async fn test_list_parsed_wraps_bad_manifests() {
        let garden = StaticGarden::new().with(
            GardenKind::Seed,
            vec![fixtures::seed("a", "aws"), serde_json::json!({ "metadata": {} })],
        );
        let err = list_parsed(&garden, GardenKind::Seed, None, Seed::from_value)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
        assert!(err.to_string().starts_with("failed to fetch seeds"));
    }

    #[test]
    fn test_found() {
        assert_eq!(found(Ok(1)).unwrap(), Some(1));
        let missing: Result<i32> = Err(Error::not_found("x", NotFoundOrigin::Source));
        assert_eq!(found(missing).unwrap(), None);
        let failed: Result<i32> = Err(Error::MultipleSelection);
        assert!(found(failed).is_err());
    }

    #[tokio::test]
    async fn test_read_kubeconfig() {
        let garden = StaticGarden::new().with_secret("garden", "seed-a", KUBECONFIG_KEY, b"cfg");
        assert_eq!(
            read_kubeconfig(&garden, "garden", "seed-a").await.unwrap(),
            b"cfg"
        );
        let err = read_kubeconfig(&garden, "garden", "seed-b")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("has no kubeconfig"));
    }
}
