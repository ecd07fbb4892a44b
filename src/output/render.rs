// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Per resource type presentation
//!
//! The sinks are generic; what a row, a description or a manifest looks like
//! is decided here, once per element type.

use serde_json::Value;

use crate::garden::model::{Profile, Project, Seed, Shoot};

/// How an element type is shown by the output sinks
pub trait Render {
    /// Column headers, the wide variant appending extra columns
    fn columns(wide: bool) -> Vec<&'static str>;

    /// Cells for one row, same length as [`columns`](Render::columns)
    fn row(&self, wide: bool) -> Vec<String>;

    /// Order of rows in tables
    fn sort_key(&self) -> String;

    /// Full object as read from the garden
    fn manifest(&self) -> &Value;

    /// Labelled attributes for `describe`
    fn describe(&self) -> Vec<(&'static str, String)>;
}

fn or_dash(value: Option<&String>) -> String {
    value.cloned().unwrap_or_else(|| "-".to_string())
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn conditions(failing: &[(String, String)]) -> String {
    if failing.is_empty() {
        return "ok".to_string();
    }
    failing
        .iter()
        .map(|(kind, _)| kind.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn condition_details(failing: &[(String, String)]) -> String {
    if failing.is_empty() {
        return "ok".to_string();
    }
    failing
        .iter()
        .map(|(kind, message)| {
            if message.is_empty() {
                kind.clone()
            } else {
                format!("{}: {}", kind, message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl Render for Shoot {
    fn columns(wide: bool) -> Vec<&'static str> {
        let mut cols = vec!["project", "name", "seed", "infra", "version", "state", "conditions"];
        if wide {
            cols.extend(["profile", "region", "technical id"]);
        }
        cols
    }

    fn row(&self, wide: bool) -> Vec<String> {
        let mut cells = vec![
            self.project().to_string(),
            self.name.name.clone(),
            or_dash(self.seed.as_ref()),
            or_dash(self.infrastructure.as_ref()),
            or_dash(self.kubernetes_version.as_ref()),
            self.state(),
            conditions(&self.conditions),
        ];
        if wide {
            cells.extend([
                or_dash(self.profile.as_ref()),
                or_dash(self.region.as_ref()),
                or_dash(self.technical_id.as_ref()),
            ]);
        }
        cells
    }

    fn sort_key(&self) -> String {
        self.name.to_string()
    }

    fn manifest(&self) -> &Value {
        &self.manifest
    }

    fn describe(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            ("Shoot", self.name.to_string()),
            ("Namespace", self.namespace.clone()),
            ("Seed", or_dash(self.seed.as_ref())),
            ("Cloud Profile", or_dash(self.profile.as_ref())),
            ("Infrastructure", or_dash(self.infrastructure.as_ref())),
            ("Region", or_dash(self.region.as_ref())),
            ("Kubernetes", or_dash(self.kubernetes_version.as_ref())),
            ("API Server", self.api_server().unwrap_or_else(|| "-".to_string())),
            ("Technical ID", or_dash(self.technical_id.as_ref())),
            ("Last Operation", self.state()),
            ("Conditions", condition_details(&self.conditions)),
        ];
        if let Some(error) = &self.last_error {
            attrs.push(("Last Error", error.clone()));
        }
        attrs
    }
}

impl Render for Seed {
    fn columns(wide: bool) -> Vec<&'static str> {
        let mut cols = vec!["name", "infra", "region", "ready"];
        if wide {
            cols.extend(["ingress domain", "conditions"]);
        }
        cols
    }

    fn row(&self, wide: bool) -> Vec<String> {
        let mut cells = vec![
            self.name.clone(),
            or_dash(self.infrastructure.as_ref()),
            or_dash(self.region.as_ref()),
            if self.is_ready() { "yes" } else { "no" }.to_string(),
        ];
        if wide {
            cells.extend([
                or_dash(self.ingress_domain.as_ref()),
                conditions(&self.conditions),
            ]);
        }
        cells
    }

    fn sort_key(&self) -> String {
        self.name.clone()
    }

    fn manifest(&self) -> &Value {
        &self.manifest
    }

    fn describe(&self) -> Vec<(&'static str, String)> {
        let secret = self
            .secret_ref
            .as_ref()
            .map(|s| format!("{}/{}", s.namespace, s.name))
            .unwrap_or_else(|| "-".to_string());
        vec![
            ("Seed", self.name.clone()),
            ("Infrastructure", or_dash(self.infrastructure.as_ref())),
            ("Region", or_dash(self.region.as_ref())),
            ("Ingress Domain", or_dash(self.ingress_domain.as_ref())),
            ("Secret", secret),
            ("Conditions", condition_details(&self.conditions)),
        ]
    }
}

impl Render for Profile {
    fn columns(wide: bool) -> Vec<&'static str> {
        let mut cols = vec!["name", "infra", "latest version"];
        if wide {
            cols.extend(["regions", "machine types"]);
        }
        cols
    }

    fn row(&self, wide: bool) -> Vec<String> {
        let mut cells = vec![
            self.name.clone(),
            or_dash(self.infrastructure.as_ref()),
            or_dash(self.kubernetes_versions.first()),
        ];
        if wide {
            cells.extend([list(&self.regions), self.machine_types.to_string()]);
        }
        cells
    }

    fn sort_key(&self) -> String {
        self.name.clone()
    }

    fn manifest(&self) -> &Value {
        &self.manifest
    }

    fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Cloud Profile", self.name.clone()),
            ("Infrastructure", or_dash(self.infrastructure.as_ref())),
            ("Kubernetes Versions", list(&self.kubernetes_versions)),
            ("Regions", list(&self.regions)),
            ("Machine Types", self.machine_types.to_string()),
        ]
    }
}

impl Render for Project {
    fn columns(wide: bool) -> Vec<&'static str> {
        let mut cols = vec!["name", "namespace", "owner", "phase"];
        if wide {
            cols.extend(["purpose", "description"]);
        }
        cols
    }

    fn row(&self, wide: bool) -> Vec<String> {
        let mut cells = vec![
            self.name.clone(),
            self.shoot_namespace(),
            or_dash(self.owner.as_ref()),
            or_dash(self.phase.as_ref()),
        ];
        if wide {
            cells.extend([
                or_dash(self.purpose.as_ref()),
                or_dash(self.description.as_ref()),
            ]);
        }
        cells
    }

    fn sort_key(&self) -> String {
        self.name.clone()
    }

    fn manifest(&self) -> &Value {
        &self.manifest
    }

    fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Project", self.name.clone()),
            ("Namespace", self.shoot_namespace()),
            ("Owner", or_dash(self.owner.as_ref())),
            ("Purpose", or_dash(self.purpose.as_ref())),
            ("Description", or_dash(self.description.as_ref())),
            ("Phase", or_dash(self.phase.as_ref())),
        ]
    }
}
