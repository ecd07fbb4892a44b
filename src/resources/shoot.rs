// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Shoot clusters
//!
//! Shoots are identified by `<project>/<name>`. A bare name is only exact
//! when a project is in scope; otherwise it may exist in several projects
//! and resolving it means scanning all shoots.
//!
//! Listings always cover every project so that a complete cache agrees with
//! point lookups; project scoping is left to the filter.

use async_trait::async_trait;
use tracing::debug;

use super::{Garden, found, get_parsed, list_parsed, read_kubeconfig};
use crate::data::{BoxIter, Cache, Cacher};
use crate::element::pattern::{glob_match, is_pattern, scope_match};
use crate::element::{Options, Source};
use crate::error::{Error, Result};
use crate::garden::GardenKind;
use crate::garden::model::{Shoot, ShootName};

pub struct ShootCacher {
    garden: Garden,
}

#[async_trait]
impl Cacher for ShootCacher {
    type Key = ShootName;
    type Elem = Shoot;

    async fn get_all(&self) -> Result<Vec<Shoot>> {
        list_parsed(self.garden.as_ref(), GardenKind::Shoot, None, Shoot::from_value).await
    }

    async fn get(&self, key: &ShootName) -> Result<Option<Shoot>> {
        let namespace = key.namespace();
        get_parsed(
            self.garden.as_ref(),
            GardenKind::Shoot,
            Some(namespace.as_str()),
            &key.name,
            Shoot::from_value,
        )
        .await
    }

    fn key(&self, elem: &Shoot) -> ShootName {
        elem.name.clone()
    }
}

pub struct ShootSource {
    cache: Cache<ShootCacher>,
    project: Option<String>,
}

impl ShootSource {
    /// `project` qualifies bare names
    pub fn new(garden: Garden, project: Option<String>) -> Self {
        Self {
            cache: Cache::new(ShootCacher { garden }),
            project: project.filter(|p| !is_pattern(p)),
        }
    }
}

#[async_trait]
impl Source for ShootSource {
    type Elem = Shoot;

    fn require_scan(&self, name: &str) -> bool {
        is_pattern(name) || (!name.contains('/') && self.project.is_none())
    }

    fn match_name(&self, elem: &Shoot, name: &str) -> Result<bool> {
        if name.contains('/') {
            Ok(glob_match(name, &elem.name.to_string()))
        } else {
            Ok(glob_match(name, &elem.name.name))
        }
    }

    async fn get(&self, name: &str) -> Result<Option<Shoot>> {
        let key = ShootName::parse(name, self.project.as_deref()).ok_or_else(|| Error::Match {
            pattern: name.to_string(),
            reason: "expected <project>/<name>".to_string(),
        })?;
        debug!(shoot = %key, "Looking up shoot");
        found(self.cache.get(&key).await)
    }

    async fn iterator(&self, _opts: &Options) -> Result<BoxIter<Shoot>> {
        Ok(Box::new(self.cache.get_all().await?))
    }

    fn matches(&self, elem: &Shoot, opts: &Options) -> Result<bool> {
        let scope = &opts.scope;
        Ok(scope_match(scope.project.as_deref(), Some(elem.project()))
            && scope_match(scope.seed.as_deref(), elem.seed.as_deref())
            && scope_match(scope.profile.as_deref(), elem.profile.as_deref())
            && scope_match(scope.infra.as_deref(), elem.infrastructure.as_deref()))
    }
}

/// Admin kubeconfig of a shoot, from `<name>.kubeconfig` in its namespace
pub async fn shoot_kubeconfig(garden: &Garden, shoot: &Shoot) -> anyhow::Result<Vec<u8>> {
    read_kubeconfig(garden.as_ref(), &shoot.namespace, &shoot.kubeconfig_secret()).await
}
