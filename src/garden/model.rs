// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Gardener domain objects
//!
//! Each element keeps the full manifest it was parsed from (for JSON/YAML
//! output) plus the handful of fields the tables and descriptions need.
//! Fields are read with JSON pointers so that manifests from older and newer
//! Gardener API revisions both parse.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Namespace holding a project's shoots
pub fn project_namespace(project: &str) -> String {
    if project == "garden" {
        project.to_string()
    } else {
        format!("garden-{}", project)
    }
}

/// Project owning a shoot namespace
pub fn namespace_project(namespace: &str) -> &str {
    namespace.strip_prefix("garden-").unwrap_or(namespace)
}

fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    str_at(value, pointer).map(String::from)
}

fn required(value: &Value, pointer: &str, kind: &str) -> Result<String> {
    string_at(value, pointer).with_context(|| format!("{} without {}", kind, pointer))
}

/// Conditions whose status is not "True", as (type, message)
fn failing_conditions(value: &Value) -> Vec<(String, String)> {
    value
        .pointer("/status/conditions")
        .and_then(Value::as_array)
        .map(|conditions| {
            conditions
                .iter()
                .filter(|c| str_at(c, "/status") != Some("True"))
                .filter_map(|c| {
                    let kind = str_at(c, "/type")?;
                    let message = str_at(c, "/message").unwrap_or_default();
                    Some((kind.to_string(), message.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Unique shoot identity: project plus shoot name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShootName {
    pub project: String,
    pub name: String,
}

impl ShootName {
    pub fn new(project: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            name: name.into(),
        }
    }

    /// Parse `project/name`, or a bare name qualified by `default_project`
    pub fn parse(input: &str, default_project: Option<&str>) -> Option<Self> {
        match input.split_once('/') {
            Some((project, name)) if !project.is_empty() && !name.is_empty() => {
                Some(Self::new(project, name))
            }
            Some(_) => None,
            None => default_project.map(|p| Self::new(p, input)),
        }
    }

    pub fn namespace(&self) -> String {
        project_namespace(&self.project)
    }
}

impl fmt::Display for ShootName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.name)
    }
}

impl FromStr for ShootName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, None)
            .with_context(|| format!("invalid shoot name '{}', expected <project>/<name>", s))
    }
}

/// Last operation reported by the gardenlet
#[derive(Debug, Clone, PartialEq)]
pub struct LastOperation {
    pub kind: String,
    pub state: String,
    pub progress: Option<i64>,
}

impl fmt::Display for LastOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.progress {
            Some(progress) => write!(f, "{} {} ({}%)", self.kind, self.state, progress),
            None => write!(f, "{} {}", self.kind, self.state),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Shoot {
    pub name: ShootName,
    pub namespace: String,
    pub profile: Option<String>,
    pub infrastructure: Option<String>,
    pub seed: Option<String>,
    pub region: Option<String>,
    pub kubernetes_version: Option<String>,
    pub domain: Option<String>,
    /// Namespace of the control plane in the seed
    pub technical_id: Option<String>,
    pub last_operation: Option<LastOperation>,
    pub conditions: Vec<(String, String)>,
    pub last_error: Option<String>,
    pub manifest: Arc<Value>,
}

impl Shoot {
    pub fn from_value(value: Value) -> Result<Self> {
        let name = required(&value, "/metadata/name", "Shoot")?;
        let namespace = required(&value, "/metadata/namespace", "Shoot")?;
        let project = namespace_project(&namespace).to_string();

        let last_operation = value.pointer("/status/lastOperation").map(|op| LastOperation {
            kind: str_at(op, "/type").unwrap_or("Unknown").to_string(),
            state: str_at(op, "/state").unwrap_or("Unknown").to_string(),
            progress: op.pointer("/progress").and_then(Value::as_i64),
        });

        Ok(Self {
            name: ShootName::new(project, name),
            profile: string_at(&value, "/spec/cloudProfileName")
                .or_else(|| string_at(&value, "/spec/cloudProfile/name")),
            infrastructure: string_at(&value, "/spec/provider/type"),
            seed: string_at(&value, "/spec/seedName")
                .or_else(|| string_at(&value, "/status/seedName")),
            region: string_at(&value, "/spec/region"),
            kubernetes_version: string_at(&value, "/spec/kubernetes/version"),
            domain: string_at(&value, "/spec/dns/domain"),
            technical_id: string_at(&value, "/status/technicalID"),
            conditions: failing_conditions(&value),
            last_error: string_at(&value, "/status/lastErrors/0/description"),
            last_operation,
            namespace,
            manifest: Arc::new(value),
        })
    }

    pub fn project(&self) -> &str {
        &self.name.project
    }

    /// Compact state for tables, e.g. "Reconcile Succeeded (100%)"
    pub fn state(&self) -> String {
        self.last_operation
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn api_server(&self) -> Option<String> {
        self.domain.as_ref().map(|d| format!("https://api.{}", d))
    }

    /// Secret holding the shoot's admin kubeconfig
    pub fn kubeconfig_secret(&self) -> String {
        format!("{}.kubeconfig", self.name.name)
    }
}

/// Reference to a secret in the garden cluster
#[derive(Debug, Clone, PartialEq)]
pub struct SecretRef {
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Seed {
    pub name: String,
    pub infrastructure: Option<String>,
    pub region: Option<String>,
    pub ingress_domain: Option<String>,
    pub secret_ref: Option<SecretRef>,
    pub conditions: Vec<(String, String)>,
    pub manifest: Arc<Value>,
}

impl Seed {
    pub fn from_value(value: Value) -> Result<Self> {
        let secret_ref = match (
            str_at(&value, "/spec/secretRef/namespace"),
            str_at(&value, "/spec/secretRef/name"),
        ) {
            (Some(namespace), Some(name)) => Some(SecretRef {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            _ => None,
        };

        Ok(Self {
            name: required(&value, "/metadata/name", "Seed")?,
            infrastructure: string_at(&value, "/spec/provider/type"),
            region: string_at(&value, "/spec/provider/region"),
            ingress_domain: string_at(&value, "/spec/ingress/domain")
                .or_else(|| string_at(&value, "/spec/dns/ingressDomain")),
            conditions: failing_conditions(&value),
            secret_ref,
            manifest: Arc::new(value),
        })
    }

    pub fn is_ready(&self) -> bool {
        self.conditions.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub infrastructure: Option<String>,
    pub kubernetes_versions: Vec<String>,
    pub regions: Vec<String>,
    pub machine_types: usize,
    pub manifest: Arc<Value>,
}

impl Profile {
    pub fn from_value(value: Value) -> Result<Self> {
        let names = |pointer: &str, field: &str| -> Vec<String> {
            value
                .pointer(pointer)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| item.get(field).and_then(Value::as_str))
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default()
        };

        let kubernetes_versions = names("/spec/kubernetes/versions", "version");
        let regions = names("/spec/regions", "name");
        let machine_types = value
            .pointer("/spec/machineTypes")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        Ok(Self {
            name: required(&value, "/metadata/name", "CloudProfile")?,
            infrastructure: string_at(&value, "/spec/type"),
            kubernetes_versions,
            regions,
            machine_types,
            manifest: Arc::new(value),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub namespace: Option<String>,
    pub owner: Option<String>,
    pub purpose: Option<String>,
    pub description: Option<String>,
    pub phase: Option<String>,
    pub manifest: Arc<Value>,
}

impl Project {
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(Self {
            name: required(&value, "/metadata/name", "Project")?,
            namespace: string_at(&value, "/spec/namespace"),
            owner: string_at(&value, "/spec/owner/name"),
            purpose: string_at(&value, "/spec/purpose"),
            description: string_at(&value, "/spec/description"),
            phase: string_at(&value, "/status/phase"),
            manifest: Arc::new(value),
        })
    }

    /// Namespace of the project's shoots, derived from the name when unset
    pub fn shoot_namespace(&self) -> String {
        self.namespace
            .clone()
            .unwrap_or_else(|| project_namespace(&self.name))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_namespace_roundtrip() {
        assert_eq!(project_namespace("dev"), "garden-dev");
        assert_eq!(project_namespace("garden"), "garden");
        assert_eq!(namespace_project("garden-dev"), "dev");
        assert_eq!(namespace_project("garden"), "garden");
    }

    #[test]
    fn test_shoot_name_parse() {
        assert_eq!(
            ShootName::parse("dev/web", None),
            Some(ShootName::new("dev", "web"))
        );
        assert_eq!(
            ShootName::parse("web", Some("ops")),
            Some(ShootName::new("ops", "web"))
        );
        assert_eq!(ShootName::parse("web", None), None);
        assert_eq!(ShootName::parse("/web", None), None);
        assert_eq!(ShootName::parse("dev/", Some("ops")), None);
        assert_eq!(ShootName::new("dev", "web").to_string(), "dev/web");
        assert!("web".parse::<ShootName>().is_err());
        assert_eq!(ShootName::new("dev", "web").namespace(), "garden-dev");
    }

    #[test]
    fn test_shoot_from_value() {
        let shoot =
            Shoot::from_value(fixtures::shoot("dev", "web", "aws-eu1", "aws", "aws")).unwrap();

        assert_eq!(shoot.name, ShootName::new("dev", "web"));
        assert_eq!(shoot.namespace, "garden-dev");
        assert_eq!(shoot.project(), "dev");
        assert_eq!(shoot.seed.as_deref(), Some("aws-eu1"));
        assert_eq!(shoot.profile.as_deref(), Some("aws"));
        assert_eq!(shoot.infrastructure.as_deref(), Some("aws"));
        assert_eq!(shoot.kubernetes_version.as_deref(), Some("1.31.2"));
        assert_eq!(shoot.technical_id.as_deref(), Some("shoot--dev--web"));
        assert_eq!(shoot.state(), "Reconcile Succeeded (100%)");
        assert_eq!(
            shoot.api_server().as_deref(),
            Some("https://api.web.dev.example.com")
        );
        assert_eq!(
            shoot.conditions,
            vec![("EveryNodeReady".to_string(), "node not ready".to_string())]
        );
        assert_eq!(shoot.kubeconfig_secret(), "web.kubeconfig");
        assert!(shoot.last_error.is_none());
    }

    #[test]
    fn test_shoot_newer_api_fields() {
        let shoot = Shoot::from_value(json!({
            "metadata": { "name": "api", "namespace": "garden-core" },
            "spec": { "cloudProfile": { "kind": "CloudProfile", "name": "gcp" } },
            "status": {
                "seedName": "gcp-eu1",
                "lastErrors": [ { "description": "quota exceeded" } ],
            },
        }))
        .unwrap();

        assert_eq!(shoot.profile.as_deref(), Some("gcp"));
        assert_eq!(shoot.seed.as_deref(), Some("gcp-eu1"));
        assert_eq!(shoot.last_error.as_deref(), Some("quota exceeded"));
        assert_eq!(shoot.state(), "unknown");
    }

    #[test]
    fn test_shoot_requires_metadata() {
        let err = Shoot::from_value(json!({ "metadata": { "name": "x" } })).unwrap_err();
        assert!(err.to_string().contains("/metadata/namespace"));
    }

    #[test]
    fn test_seed_from_value() {
        let seed = Seed::from_value(fixtures::seed("aws-eu1", "aws")).unwrap();
        assert_eq!(seed.name, "aws-eu1");
        assert_eq!(seed.region.as_deref(), Some("eu-west-1"));
        assert_eq!(
            seed.ingress_domain.as_deref(),
            Some("ingress.aws-eu1.example.com")
        );
        assert_eq!(
            seed.secret_ref,
            Some(SecretRef {
                namespace: "garden".to_string(),
                name: "seed-aws-eu1".to_string()
            })
        );
        assert!(seed.is_ready());
    }

    #[test]
    fn test_profile_from_value() {
        let profile = Profile::from_value(fixtures::profile("aws", "aws")).unwrap();
        assert_eq!(profile.infrastructure.as_deref(), Some("aws"));
        assert_eq!(profile.kubernetes_versions, vec!["1.31.2", "1.30.6"]);
        assert_eq!(profile.regions, vec!["eu-west-1", "us-east-1"]);
        assert_eq!(profile.machine_types, 1);
    }

    #[test]
    fn test_project_from_value() {
        let project = Project::from_value(fixtures::project("dev")).unwrap();
        assert_eq!(project.namespace.as_deref(), Some("garden-dev"));
        assert_eq!(project.owner.as_deref(), Some("alice@example.com"));
        assert_eq!(project.phase.as_deref(), Some("Ready"));

        let bare = Project::from_value(json!({ "metadata": { "name": "ops" } })).unwrap();
        assert_eq!(bare.shoot_namespace(), "garden-ops");
    }
}
