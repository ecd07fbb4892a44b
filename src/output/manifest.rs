// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Raw manifests as JSON or YAML
//!
//! A single element is printed as its object; several are printed as a
//! JSON array or as a stream of YAML documents.

use anyhow::Context;
use serde_json::Value;

use super::render::Render;
use crate::element::Output;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

pub struct ManifestOutput<E> {
    elems: Vec<E>,
    format: ManifestFormat,
}

impl<E: Render> ManifestOutput<E> {
    pub fn new(format: ManifestFormat) -> Self {
        Self {
            elems: Vec::new(),
            format,
        }
    }

    pub fn render(&self) -> anyhow::Result<String> {
        match (self.format, self.elems.as_slice()) {
            (ManifestFormat::Json, [single]) => {
                serde_json::to_string_pretty(single.manifest()).context("Failed to encode JSON")
            }
            (ManifestFormat::Json, elems) => {
                let items: Vec<&Value> = elems.iter().map(Render::manifest).collect();
                serde_json::to_string_pretty(&items).context("Failed to encode JSON")
            }
            (ManifestFormat::Yaml, elems) => {
                let docs = elems
                    .iter()
                    .map(|e| serde_yaml::to_string(e.manifest()).context("Failed to encode YAML"))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok(docs.join("---\n"))
            }
        }
    }
}

impl<E: Render + Send> Output<E> for ManifestOutput<E> {
    fn add(&mut self, elem: E) -> Result<()> {
        self.elems.push(elem);
        Ok(())
    }

    fn out(&mut self) -> Result<()> {
        let rendered = self.render().map_err(Error::Output)?;
        print!("{}", rendered);
        if self.format == ManifestFormat::Json {
            println!();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garden::model::{Seed, fixtures};

    fn seed(name: &str) -> Seed {
        Seed::from_value(fixtures::seed(name, "aws")).unwrap()
    }

    #[test]
    fn test_single_json_object() {
        let mut output = ManifestOutput::new(ManifestFormat::Json);
        output.add(seed("a")).unwrap();
        let value: Value = serde_json::from_str(&output.render().unwrap()).unwrap();
        assert_eq!(value["metadata"]["name"], "a");
    }

    #[test]
    fn test_multiple_json_array() {
        let mut output = ManifestOutput::new(ManifestFormat::Json);
        output.add(seed("a")).unwrap();
        output.add(seed("b")).unwrap();
        let value: Value = serde_json::from_str(&output.render().unwrap()).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["kind"], "Seed");
    }

    #[test]
    fn test_yaml_documents() {
        let mut output = ManifestOutput::new(ManifestFormat::Yaml);
        output.add(seed("a")).unwrap();
        output.add(seed("b")).unwrap();
        let rendered = output.render().unwrap();
        assert_eq!(rendered.matches("---\n").count(), 1);
        assert!(rendered.contains("name: a"));
        assert!(rendered.contains("kind: Seed"));
    }

    #[test]
    fn test_empty_json() {
        let output = ManifestOutput::<Seed>::new(ManifestFormat::Json);
        assert_eq!(output.render().unwrap(), "[]");
    }
}
