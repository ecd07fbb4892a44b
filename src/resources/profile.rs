// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Cloud profiles
//!
//! Profiles are few and never looked up on their own, so they are listed
//! once and served from that listing.

use async_trait::async_trait;

use super::{Garden, list_parsed};
use crate::element::pattern::scope_match;
use crate::element::{BasicSource, ListAdapter, Options};
use crate::error::Result;
use crate::garden::GardenKind;
use crate::garden::model::Profile;

pub struct ProfileAdapter {
    garden: Garden,
}

impl ProfileAdapter {
    pub fn new(garden: Garden) -> Self {
        Self { garden }
    }
}

pub type ProfileSource = BasicSource<ProfileAdapter>;

#[async_trait]
impl ListAdapter for ProfileAdapter {
    type Elem = Profile;

    async fn get_all(&self, _opts: &Options) -> Result<Vec<Profile>> {
        let mut profiles = list_parsed(
            self.garden.as_ref(),
            GardenKind::CloudProfile,
            None,
            Profile::from_value,
        )
        .await?;
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }

    fn name<'a>(&self, elem: &'a Profile) -> &'a str {
        &elem.name
    }

    fn filter(&self, elem: &Profile, opts: &Options) -> Result<bool> {
        Ok(scope_match(opts.scope.profile.as_deref(), Some(&elem.name))
            && scope_match(opts.scope.infra.as_deref(), elem.infrastructure.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementHandler, ElementOutput, FilterScope};
    use crate::garden::model::fixtures;
    use crate::garden::testing::StaticGarden;
    use std::sync::Arc;

    fn source(garden: &Arc<StaticGarden>) -> ProfileSource {
        BasicSource::new(ProfileAdapter::new(garden.clone()))
    }

    fn garden() -> Arc<StaticGarden> {
        Arc::new(StaticGarden::new().with(
            GardenKind::CloudProfile,
            vec![
                fixtures::profile("gcp", "gcp"),
                fixtures::profile("aws", "aws"),
                fixtures::profile("aws-china", "aws"),
            ],
        ))
    }

    async fn resolve(source: ProfileSource, args: &[&str], opts: &Options) -> Vec<String> {
        let mut handler = ElementHandler::new(source, ElementOutput::new());
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        handler.resolve(&args, opts).await.unwrap();
        handler
            .into_output()
            .into_elems()
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    #[tokio::test]
    async fn test_listing_is_sorted_and_filtered() {
        let g = garden();
        let opts = Options {
            scope: FilterScope {
                infra: Some("aws".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let found = resolve(source(&g), &[], &opts).await;
        assert_eq!(found, vec!["aws", "aws-china"]);
    }

    #[tokio::test]
    async fn test_exact_names_share_one_listing() {
        let g = garden();
        let found = resolve(source(&g), &["gcp", "aws"], &Options::default()).await;
        assert_eq!(found, vec!["gcp", "aws"]);
        assert_eq!(g.calls(), vec!["list cloudprofiles"]);
    }

    #[tokio::test]
    async fn test_profile_scope_pattern() {
        let opts = Options {
            scope: FilterScope {
                profile: Some("aws*".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let found = resolve(source(&garden()), &["all"], &opts).await;
        assert_eq!(found, vec!["aws", "aws-china"]);
    }
}
