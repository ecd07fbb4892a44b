// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use async_trait::async_trait;

use super::{Garden, found, get_parsed, list_parsed};
use crate::data::{BoxIter, Cache, Cacher};
use crate::element::pattern::{glob_match, is_pattern, scope_match};
use crate::element::{Options, Source};
use crate::error::Result;
use crate::garden::GardenKind;
use crate::garden::model::Project;

pub struct ProjectCacher {
    garden: Garden,
}

#[async_trait]
impl Cacher for ProjectCacher {
    type Key = String;
    type Elem = Project;

    async fn get_all(&self) -> Result<Vec<Project>> {
        list_parsed(self.garden.as_ref(), GardenKind::Project, None, Project::from_value).await
    }

    async fn get(&self, key: &String) -> Result<Option<Project>> {
        get_parsed(
            self.garden.as_ref(),
            GardenKind::Project,
            None,
            key,
            Project::from_value,
        )
        .await
    }

    fn key(&self, elem: &Project) -> String {
        elem.name.clone()
    }
}

pub struct ProjectSource {
    cache: Cache<ProjectCacher>,
}

impl ProjectSource {
    pub fn new(garden: Garden) -> Self {
        Self {
            cache: Cache::new(ProjectCacher { garden }),
        }
    }
}

#[async_trait]
impl Source for ProjectSource {
    type Elem = Project;

    fn require_scan(&self, name: &str) -> bool {
        is_pattern(name)
    }

    fn match_name(&self, elem: &Project, name: &str) -> Result<bool> {
        Ok(glob_match(name, &elem.name))
    }

    async fn get(&self, name: &str) -> Result<Option<Project>> {
        found(self.cache.get(&name.to_string()).await)
    }

    async fn iterator(&self, _opts: &Options) -> Result<BoxIter<Project>> {
        Ok(Box::new(self.cache.get_all().await?))
    }

    fn matches(&self, elem: &Project, opts: &Options) -> Result<bool> {
        Ok(scope_match(opts.scope.project.as_deref(), Some(&elem.name)))
    }
}
