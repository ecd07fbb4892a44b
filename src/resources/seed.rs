// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use anyhow::Context;
use async_trait::async_trait;

use super::{Garden, found, get_parsed, list_parsed, read_kubeconfig};
use crate::data::{BoxIter, Cache, Cacher};
use crate::element::pattern::{glob_match, is_pattern, scope_match};
use crate::element::{Options, Source};
use crate::error::Result;
use crate::garden::GardenKind;
use crate::garden::model::Seed;

pub struct SeedCacher {
    garden: Garden,
}

#[async_trait]
impl Cacher for SeedCacher {
    type Key = String;
    type Elem = Seed;

    async fn get_all(&self) -> Result<Vec<Seed>> {
        list_parsed(self.garden.as_ref(), GardenKind::Seed, None, Seed::from_value).await
    }

    async fn get(&self, key: &String) -> Result<Option<Seed>> {
        get_parsed(self.garden.as_ref(), GardenKind::Seed, None, key, Seed::from_value).await
    }

    fn key(&self, elem: &Seed) -> String {
        elem.name.clone()
    }
}

pub struct SeedSource {
    cache: Cache<SeedCacher>,
}

impl SeedSource {
    pub fn new(garden: Garden) -> Self {
        Self {
            cache: Cache::new(SeedCacher { garden }),
        }
    }
}

#[async_trait]
impl Source for SeedSource {
    type Elem = Seed;

    fn require_scan(&self, name: &str) -> bool {
        is_pattern(name)
    }

    fn match_name(&self, elem: &Seed, name: &str) -> Result<bool> {
        Ok(glob_match(name, &elem.name))
    }

    async fn get(&self, name: &str) -> Result<Option<Seed>> {
        found(self.cache.get(&name.to_string()).await)
    }

    async fn iterator(&self, _opts: &Options) -> Result<BoxIter<Seed>> {
        Ok(Box::new(self.cache.get_all().await?))
    }

    fn matches(&self, elem: &Seed, opts: &Options) -> Result<bool> {
        Ok(scope_match(opts.scope.seed.as_deref(), Some(&elem.name))
            && scope_match(opts.scope.infra.as_deref(), elem.infrastructure.as_deref()))
    }
}

/// Kubeconfig of a seed, from the secret its spec references
pub async fn seed_kubeconfig(garden: &Garden, seed: &Seed) -> anyhow::Result<Vec<u8>> {
    let secret = seed
        .secret_ref
        .as_ref()
        .with_context(|| format!("Seed {} has no secret reference", seed.name))?;
    read_kubeconfig(garden.as_ref(), &secret.namespace, &secret.name).await
}
