// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod describe;
mod manifest;
mod render;
mod table;

pub use describe::DescribeOutput;
pub use manifest::{ManifestFormat, ManifestOutput};
pub use render::Render;
pub use table::TableOutput;

use crate::cli::OutputFormat;
use crate::element::Output;

/// Sink for `get`, chosen by the output format
pub fn get_output<E>(format: &OutputFormat) -> Box<dyn Output<E>>
where
    E: Render + Send + 'static,
{
    match format {
        OutputFormat::Table => Box::new(TableOutput::new(false)),
        OutputFormat::Wide => Box::new(TableOutput::new(true)),
        OutputFormat::Json => Box::new(ManifestOutput::new(ManifestFormat::Json)),
        OutputFormat::Yaml => Box::new(ManifestOutput::new(ManifestFormat::Yaml)),
    }
}

/// Sink for `describe`; JSON and YAML still print manifests
pub fn describe_output<E>(format: &OutputFormat) -> Box<dyn Output<E>>
where
    E: Render + Send + 'static,
{
    match format {
        OutputFormat::Table | OutputFormat::Wide => Box::new(DescribeOutput::new()),
        other => get_output(other),
    }
}
