// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Access to the garden cluster
//!
//! [`GardenApi`] is the narrow interface resource sources use; [`GardenClient`]
//! implements it on top of kube-rs.

mod client;
pub mod model;

pub use client::GardenClient;

use anyhow::Result;
use async_trait::async_trait;
use kube::discovery::ApiResource;

/// API group of all Gardener core resources
pub const GARDENER_GROUP: &str = "core.gardener.cloud";
pub const GARDENER_VERSION: &str = "v1beta1";

/// Gardener resource kinds the inspector reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GardenKind {
    Shoot,
    Seed,
    CloudProfile,
    Project,
}

impl GardenKind {
    pub fn kind(&self) -> &'static str {
        match self {
            GardenKind::Shoot => "Shoot",
            GardenKind::Seed => "Seed",
            GardenKind::CloudProfile => "CloudProfile",
            GardenKind::Project => "Project",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            GardenKind::Shoot => "shoots",
            GardenKind::Seed => "seeds",
            GardenKind::CloudProfile => "cloudprofiles",
            GardenKind::Project => "projects",
        }
    }

    /// Only shoots live in (project) namespaces
    pub fn is_namespaced(&self) -> bool {
        matches!(self, GardenKind::Shoot)
    }

    pub fn api_resource(&self) -> ApiResource {
        ApiResource {
            group: GARDENER_GROUP.to_string(),
            version: GARDENER_VERSION.to_string(),
            api_version: format!("{}/{}", GARDENER_GROUP, GARDENER_VERSION),
            kind: self.kind().to_string(),
            plural: self.plural().to_string(),
        }
    }
}

impl std::fmt::Display for GardenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.plural())
    }
}

/// Read access to the garden cluster
#[async_trait]
pub trait GardenApi: Send + Sync {
    /// List all objects of a kind, optionally restricted to one namespace
    async fn list(&self, kind: GardenKind, namespace: Option<&str>)
    -> Result<Vec<serde_json::Value>>;

    /// Fetch one object, `None` if it does not exist
    async fn get(
        &self,
        kind: GardenKind,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Option<serde_json::Value>>;

    /// Read one data entry of a secret, `None` if secret or entry is missing
    async fn secret_data(&self, namespace: &str, name: &str, key: &str)
    -> Result<Option<Vec<u8>>>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_resource() {
        let ar = GardenKind::CloudProfile.api_resource();
        assert_eq!(ar.api_version, "core.gardener.cloud/v1beta1");
        assert_eq!(ar.kind, "CloudProfile");
        assert_eq!(ar.plural, "cloudprofiles");
    }

    #[test]
    fn test_scope() {
        assert!(GardenKind::Shoot.is_namespaced());
        assert!(!GardenKind::Seed.is_namespaced());
        assert!(!GardenKind::Project.is_namespaced());
        assert_eq!(GardenKind::Seed.to_string(), "seeds");
    }
}
