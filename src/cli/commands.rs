// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Command execution
//!
//! Builds resolution options from flags and stored selections, wires each
//! resource source to the sink its verb needs and persists selections.

use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{Args, ClusterVerb, Command, ConfigAction, OutputFormat, ScopeArgs, Verb};
use crate::config::{Config, Selectable, Selections};
use crate::element::{ElementHandler, FilterScope, Options, SingleElementOutput, Source};
use crate::garden::model::{Profile, Project, Seed, Shoot};
use crate::output::{Render, describe_output, get_output};
use crate::resources::{
    Garden, ProfileAdapter, ProfileSource, ProjectSource, SeedSource, ShootSource, seed_kubeconfig,
    shoot_kubeconfig,
};

/// One invocation against one garden
pub struct Session {
    garden: Garden,
    config: Config,
    config_path: PathBuf,
    output: OutputFormat,
    scope: ScopeArgs,
}

impl Session {
    pub fn new(garden: Garden, config: Config, config_path: PathBuf, args: &Args) -> Self {
        Self {
            garden,
            config,
            config_path,
            output: args.output.clone(),
            scope: args.scope.clone(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Shoot { verb } => self.shoot(verb).await,
            Command::Seed { verb } => self.seed(verb).await,
            Command::Profile { verb } => {
                let source = ProfileSource::new(ProfileAdapter::new(self.garden.clone()));
                self.run_verb(source, Selectable::Profile, verb, |p: &Profile| {
                    p.name.clone()
                })
                .await
            }
            Command::Project { verb } => {
                let source = ProjectSource::new(self.garden.clone());
                self.run_verb(source, Selectable::Project, verb, |p: &Project| {
                    p.name.clone()
                })
                .await
            }
            Command::Config { action } => {
                configure(action.as_ref(), &mut self.config, &self.config_path, None)
            }
        }
    }

    /// Options for one resource type
    ///
    /// The stored selection becomes the default name. Shoots are scoped to
    /// the selected project unless `--project` says otherwise.
    fn options(&self, kind: Selectable) -> Result<Options> {
        let mut scope = FilterScope {
            project: self.scope.project.clone(),
            seed: self.scope.seed.clone(),
            profile: self.scope.profile.clone(),
            infra: self.scope.infra.clone(),
        };
        if kind == Selectable::Shoot && scope.project.is_none() {
            scope.project = self.config.selection(Selectable::Project).map(String::from);
        }

        scope.validate()?;

        Ok(Options {
            default: self.config.selection(kind).map(String::from),
            output: self.output.clone(),
            scope,
        })
    }

    fn shoot_source(&self, opts: &Options) -> ShootSource {
        ShootSource::new(self.garden.clone(), opts.scope.project.clone())
    }

    async fn shoot(&mut self, verb: &ClusterVerb) -> Result<()> {
        match verb {
            ClusterVerb::Common(verb) => {
                let source = self.shoot_source(&self.options(Selectable::Shoot)?);
                self.run_verb(source, Selectable::Shoot, verb, |s: &Shoot| {
                    s.name.to_string()
                })
                .await
            }
            ClusterVerb::Kubeconfig { name } => {
                let kubeconfig = self.kubeconfig(Selectable::Shoot, name.as_deref()).await?;
                write_stdout(&kubeconfig)
            }
        }
    }

    async fn seed(&mut self, verb: &ClusterVerb) -> Result<()> {
        match verb {
            ClusterVerb::Common(verb) => {
                let source = SeedSource::new(self.garden.clone());
                self.run_verb(source, Selectable::Seed, verb, |s: &Seed| s.name.clone())
                    .await
            }
            ClusterVerb::Kubeconfig { name } => {
                let kubeconfig = self.kubeconfig(Selectable::Seed, name.as_deref()).await?;
                write_stdout(&kubeconfig)
            }
        }
    }

    /// Kubeconfig of exactly one shoot or seed
    async fn kubeconfig(&self, kind: Selectable, name: Option<&str>) -> Result<Vec<u8>> {
        let opts = self.options(kind)?;
        match kind {
            Selectable::Shoot => {
                let shoot = single(self.shoot_source(&opts), name, &opts).await?;
                info!(shoot = %shoot.name, "Reading shoot kubeconfig");
                shoot_kubeconfig(&self.garden, &shoot).await
            }
            Selectable::Seed => {
                let seed = single(SeedSource::new(self.garden.clone()), name, &opts).await?;
                info!(seed = %seed.name, "Reading seed kubeconfig");
                seed_kubeconfig(&self.garden, &seed).await
            }
            other => Err(anyhow!("{} has no kubeconfig", other)),
        }
    }

    async fn run_verb<S>(
        &mut self,
        source: S,
        kind: Selectable,
        verb: &Verb,
        key: fn(&S::Elem) -> String,
    ) -> Result<()>
    where
        S: Source,
        S::Elem: Render,
    {
        let opts = self.options(kind)?;
        debug!(kind = %kind, verb = ?verb, scope = ?opts.scope, "Running command");

        match verb {
            Verb::Get { names } => {
                let mut handler = ElementHandler::new(source, get_output(&opts.output));
                handler.resolve(names, &opts).await?;
            }
            Verb::Describe { names } => {
                let mut handler = ElementHandler::new(source, describe_output(&opts.output));
                handler.resolve(names, &opts).await?;
            }
            Verb::Select { clear: true, .. } => {
                self.select(kind, None)?;
                println!("Cleared {} selection", kind);
            }
            Verb::Select { name, .. } => {
                let elem = single(source, name.as_deref(), &opts).await?;
                let selected = key(&elem);
                self.select(kind, Some(selected.clone()))?;
                println!("Selected {} {}", kind, selected);
            }
        }
        Ok(())
    }

    /// Persist a selection; selecting a shoot also selects its project
    fn select(&mut self, kind: Selectable, value: Option<String>) -> Result<()> {
        if kind == Selectable::Shoot
            && let Some((project, _)) = value.as_deref().and_then(|v| v.split_once('/'))
        {
            self.config
                .set_selection(Selectable::Project, Some(project.to_string()));
        }
        self.config.set_selection(kind, value);
        self.config.save_to(&self.config_path)?;
        info!(kind = %kind, selection = ?self.config.selection(kind), "Selection saved");
        Ok(())
    }
}

/// Resolve one element through the single-element sink
async fn single<S: Source>(source: S, name: Option<&str>, opts: &Options) -> Result<S::Elem> {
    let mut handler = ElementHandler::new(source, SingleElementOutput::new());
    handler.resolve_single(name, opts).await?;
    handler
        .into_output()
        .into_elem()
        .ok_or_else(|| anyhow!("no element selected"))
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(bytes)
        .and_then(|_| stdout.flush())
        .context("Failed to write to stdout")
}

/// `gex config`: show, switch garden, or reset selections
pub fn configure(
    action: Option<&ConfigAction>,
    config: &mut Config,
    path: &Path,
    garden_override: Option<&str>,
) -> Result<()> {
    match action {
        None => print!("{}", describe_config(config, path, garden_override)),
        Some(ConfigAction::SetGarden { context }) => {
            if config.garden_context.as_deref() != Some(context.as_str()) {
                config.selections = Selections::default();
            }
            config.garden_context = Some(context.clone());
            config.save_to(path)?;
            println!("Using garden {}", context);
        }
        Some(ConfigAction::Reset) => {
            config.selections = Selections::default();
            config.save_to(path)?;
            println!("Cleared all selections");
        }
    }
    Ok(())
}

/// Effective configuration as shown by `gex config`
pub fn describe_config(config: &Config, path: &Path, garden_override: Option<&str>) -> String {
    let garden = match (garden_override, config.garden_context.as_deref()) {
        (Some(garden), _) => format!("{} (from --garden)", garden),
        (None, Some(garden)) => garden.to_string(),
        (None, None) => "(kubeconfig current context)".to_string(),
    };

    let mut lines = vec![
        format!("config:  {}", path.display()),
        format!("garden:  {}", garden),
    ];
    for kind in [
        Selectable::Project,
        Selectable::Shoot,
        Selectable::Seed,
        Selectable::Profile,
    ] {
        lines.push(format!(
            "{:<8} {}",
            format!("{}:", kind),
            config.selection(kind).unwrap_or("-")
        ));
    }
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garden::GardenKind;
    use crate::garden::model::fixtures;
    use crate::garden::testing::StaticGarden;
    use clap::Parser;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn garden() -> Arc<StaticGarden> {
        Arc::new(
            StaticGarden::new()
                .with(
                    GardenKind::Shoot,
                    vec![
                        fixtures::shoot("dev", "web", "aws-eu1", "aws", "aws"),
                        fixtures::shoot("ops", "web", "aws-eu1", "aws", "aws"),
                        fixtures::shoot("ops", "db", "gcp-eu1", "gcp", "gcp"),
                    ],
                )
                .with(
                    GardenKind::Seed,
                    vec![fixtures::seed("aws-eu1", "aws")],
                )
                .with(GardenKind::Project, vec![fixtures::project("dev"), fixtures::project("ops")])
                .with_secret("garden-ops", "db.kubeconfig", "kubeconfig", b"shoot-config")
                .with_secret("garden", "seed-aws-eu1", "kubeconfig", b"seed-config"),
        )
    }

    fn session(dir: &TempDir, argv: &[&str]) -> (Session, Args) {
        let args = Args::try_parse_from(std::iter::once("gex").chain(argv.iter().copied())).unwrap();
        let session = Session::new(
            garden(),
            Config::default(),
            dir.path().join("config.json"),
            &args,
        );
        (session, args)
    }

    #[tokio::test]
    async fn test_select_persists_and_becomes_default() {
        let dir = TempDir::new().unwrap();
        let (mut session, args) = session(&dir, &["shoot", "select", "ops/db"]);
        session.run(&args.command).await.unwrap();

        let saved = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(saved.selection(Selectable::Shoot), Some("ops/db"));
        assert_eq!(saved.selection(Selectable::Project), Some("ops"));

        let opts = session.options(Selectable::Shoot).unwrap();
        assert_eq!(opts.default.as_deref(), Some("ops/db"));
        assert_eq!(opts.scope.project.as_deref(), Some("ops"));
    }

    #[tokio::test]
    async fn test_select_ambiguous_name_fails() {
        let dir = TempDir::new().unwrap();
        let (mut session, args) = session(&dir, &["shoot", "select", "web"]);
        let err = session.run(&args.command).await.unwrap_err();
        assert!(err.to_string().contains("only one element can be selected"));
        assert!(!dir.path().join("config.json").exists());
    }

    #[tokio::test]
    async fn test_select_without_selection() {
        let dir = TempDir::new().unwrap();
        let (mut session, args) = session(&dir, &["seed", "select"]);
        let err = session.run(&args.command).await.unwrap_err();
        assert_eq!(err.to_string(), "no element selected");
    }

    #[tokio::test]
    async fn test_clear_selection() {
        let dir = TempDir::new().unwrap();
        let (mut session, args) = session(&dir, &["project", "select", "dev"]);
        session.run(&args.command).await.unwrap();
        assert_eq!(session.config().selection(Selectable::Project), Some("dev"));

        let (_, clear) = self::session(&dir, &["project", "select", "--clear"]);
        session.run(&clear.command).await.unwrap();
        assert_eq!(session.config().selection(Selectable::Project), None);
    }

    #[tokio::test]
    async fn test_project_flag_overrides_selection() {
        let dir = TempDir::new().unwrap();
        let (mut session, _) = session(&dir, &["--project", "dev", "shoot", "get"]);
        session.select(Selectable::Project, Some("ops".to_string())).unwrap();
        let opts = session.options(Selectable::Shoot).unwrap();
        assert_eq!(opts.scope.project.as_deref(), Some("dev"));

        // Project listings are never scoped by the selection
        let (session, _) = self::session(&dir, &["project", "get"]);
        assert_eq!(
            session.options(Selectable::Project).unwrap().scope.project,
            None
        );
    }

    #[tokio::test]
    async fn test_empty_filter_rejected() {
        let dir = TempDir::new().unwrap();
        let (mut session, args) = session(&dir, &["--seed", "", "shoot", "get"]);
        let err = session.run(&args.command).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid filter --seed: empty pattern");
    }

    #[tokio::test]
    async fn test_kubeconfig() {
        let dir = TempDir::new().unwrap();
        let (session, _) = session(&dir, &["shoot", "kubeconfig", "ops/db"]);
        assert_eq!(
            session.kubeconfig(Selectable::Shoot, Some("ops/db")).await.unwrap(),
            b"shoot-config"
        );
        assert_eq!(
            session.kubeconfig(Selectable::Seed, Some("aws-eu1")).await.unwrap(),
            b"seed-config"
        );
        assert!(session.kubeconfig(Selectable::Shoot, Some("dev/web")).await.is_err());
    }

    #[tokio::test]
    async fn test_get_runs_through_sink() {
        let dir = TempDir::new().unwrap();
        let (mut session, args) = session(&dir, &["shoot", "get", "--infra", "gcp", "all"]);
        session.run(&args.command).await.unwrap();

        let (mut session, args) = self::session(&dir, &["profile", "get", "missing"]);
        let err = session.run(&args.command).await.unwrap_err();
        assert_eq!(err.to_string(), "'missing' not found");
    }

    #[test]
    fn test_set_garden_resets_selections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::default();
        config.set_selection(Selectable::Seed, Some("aws-eu1".to_string()));

        let action = ConfigAction::SetGarden {
            context: "garden-live".to_string(),
        };
        configure(Some(&action), &mut config, &path, None).unwrap();
        assert_eq!(config.garden_context.as_deref(), Some("garden-live"));
        assert_eq!(config.selections, Selections::default());
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_describe_config() {
        let mut config = Config::default();
        config.set_selection(Selectable::Project, Some("dev".to_string()));
        let path = Path::new("/tmp/gex/config.json");

        let text = describe_config(&config, path, None);
        assert!(text.contains("garden:  (kubeconfig current context)\n"));
        assert!(text.contains("project: dev\n"));
        assert!(text.contains("shoot:   -\n"));

        let text = describe_config(&config, path, Some("garden-canary"));
        assert!(text.contains("garden:  garden-canary (from --garden)\n"));
    }
}
