// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "gex")]
#[command(
    author,
    version,
    about = "Inspect Gardener shoots, seeds, cloud profiles and projects"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Garden cluster to use (kubeconfig context). Defaults to the configured
    /// garden, then the kubeconfig's current context.
    #[arg(short, long, global = true, value_name = "CONTEXT")]
    pub garden: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

/// Global filters. Each accepts glob patterns, e.g. --seed "aws-*"
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Only elements of matching projects
    #[arg(long, global = true, value_name = "PROJECT")]
    pub project: Option<String>,

    /// Only elements on matching seeds
    #[arg(long, global = true, value_name = "SEED")]
    pub seed: Option<String>,

    /// Only elements using matching cloud profiles
    #[arg(long, global = true, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Only elements on matching infrastructures (aws, gcp, azure, ...)
    #[arg(long, global = true, value_name = "INFRA")]
    pub infra: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Shoot clusters, named <project>/<name>
    Shoot {
        #[command(subcommand)]
        verb: ClusterVerb,
    },

    /// Seed clusters
    Seed {
        #[command(subcommand)]
        verb: ClusterVerb,
    },

    /// Cloud profiles
    Profile {
        #[command(subcommand)]
        verb: Verb,
    },

    /// Projects
    Project {
        #[command(subcommand)]
        verb: Verb,
    },

    /// Show or change the stored configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

/// Verbs available for every resource type
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Verb {
    /// List elements. Without names the current selection is shown, or every
    /// element if nothing is selected; "all" always lists everything.
    Get { names: Vec<String> },

    /// Show element details
    Describe { names: Vec<String> },

    /// Remember one element as the default for later commands
    Select {
        name: Option<String>,

        /// Forget the current selection instead
        #[arg(long, conflicts_with = "name")]
        clear: bool,
    },
}

/// Verbs for resource types that are clusters themselves
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ClusterVerb {
    #[command(flatten)]
    Common(Verb),

    /// Print the cluster's kubeconfig
    Kubeconfig { name: Option<String> },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Use another garden cluster by default
    SetGarden { context: String },

    /// Forget every selection
    Reset,
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Table,
    /// Table with additional columns
    Wide,
    Json,
    Yaml,
}
