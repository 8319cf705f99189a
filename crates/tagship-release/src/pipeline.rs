//! The release orchestrator.

use crate::build;
use crate::chart::ChartContext;
use crate::identity::{self, Identity, IdentityInputs};
use crate::promote::{self, PromotionSettings};
use crate::resolve::{self, CoordinateInputs};
use crate::source;
use crate::stage::{Progress, Stage};
use crate::{ErrorKind, ReleaseError};
use semver::Version;
use std::path::PathBuf;
use tagship_core::context::{ENV_BUILD_NUMBER, ENV_XDG_CONFIG_HOME};
use tagship_core::{EnvMap, HostEnv, ProjectKind, ReleaseContext, TagshipConfig};
use tagship_tools::{ToolClient, ToolExecutor};

pub const DEFAULT_XDG_CONFIG_HOME: &str = "/home/jenkins";

/// Everything a run needs, collected up front and never mutated.
#[derive(Debug, Clone)]
pub struct ReleaseInputs {
    pub project_dir: PathBuf,
    pub coordinates: CoordinateInputs,
    pub identity: IdentityInputs,
    /// Used only when the host has no `XDG_CONFIG_HOME` of its own.
    pub xdg_config_home: String,
    pub batch_mode: bool,
    pub promotion: PromotionSettings,
    /// Build number; falls back to the host's `BUILD_NUMBER`.
    pub build: Option<String>,
    pub config: TagshipConfig,
    pub host: HostEnv,
}

impl ReleaseInputs {
    /// Inputs with every flag at its default.
    pub fn new(project_dir: impl Into<PathBuf>, config: TagshipConfig, host: HostEnv) -> Self {
        Self {
            project_dir: project_dir.into(),
            coordinates: CoordinateInputs::default(),
            identity: IdentityInputs::default(),
            xdg_config_home: DEFAULT_XDG_CONFIG_HOME.to_owned(),
            batch_mode: true,
            promotion: PromotionSettings::default(),
            build: None,
            config,
            host,
        }
    }

    fn build_number(&self) -> Option<&str> {
        self.build
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .or_else(|| self.host.get(ENV_BUILD_NUMBER))
    }

    fn base_env(&self) -> EnvMap {
        let xdg = self
            .host
            .get(ENV_XDG_CONFIG_HOME)
            .unwrap_or(&self.xdg_config_home);
        EnvMap::from([(ENV_XDG_CONFIG_HOME.to_owned(), xdg.to_owned())])
    }
}

/// A completed release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    pub version: Version,
    pub image_name: String,
    pub identity: Identity,
    /// `false` when the project has no chart and promotion was skipped.
    pub chart_promoted: bool,
    pub completed: Vec<Stage>,
}

/// A failed release together with the stages that had already taken effect.
#[derive(Debug, thiserror::Error)]
#[error("release failed after {} completed stage(s)", .completed.len())]
pub struct ReleaseFailure {
    pub completed: Vec<Stage>,
    #[source]
    pub error: ReleaseError,
}

impl ReleaseFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Run the release pipeline.
///
/// Stages run strictly in sequence and the first failure stops the run.
/// Nothing is rolled back.
pub async fn run<E: ToolExecutor>(
    client: &ToolClient<E>,
    inputs: &ReleaseInputs,
) -> Result<ReleaseOutcome, ReleaseFailure> {
    let mut progress = Progress::default();
    match execute(client, inputs, &mut progress).await {
        Ok(outcome) => Ok(ReleaseOutcome {
            completed: progress.into_stages(),
            ..outcome
        }),
        Err(error) => {
            tracing::error!(kind = ?error.kind(), error = %error, "release failed");
            Err(ReleaseFailure {
                completed: progress.into_stages(),
                error,
            })
        }
    }
}

async fn execute<E: ToolExecutor>(
    client: &ToolClient<E>,
    inputs: &ReleaseInputs,
    progress: &mut Progress,
) -> Result<ReleaseOutcome, ReleaseError> {
    let dir = inputs.project_dir.as_path();
    let config = &inputs.config;
    let kind = ProjectKind::detect(dir);
    tracing::info!(dir = %dir.display(), %kind, "starting release");

    client
        .configure_credential_store(dir, &EnvMap::new())
        .await
        .map_err(|e| ReleaseError::Credentials { source: e })?;
    progress.record(Stage::CredentialStore);

    let base_env = inputs.base_env();

    let identity = identity::bootstrap(
        client,
        dir,
        &base_env,
        &inputs.identity,
        &inputs.host,
        &config.identity,
    )
    .await?;
    progress.record(Stage::Identity);

    let coordinates = resolve::coordinates(
        client,
        dir,
        &base_env,
        &inputs.coordinates,
        &inputs.host,
        &config.registry,
    )
    .await?;
    progress.record(Stage::Coordinates);

    let version = resolve::next_version(client, dir, kind).await?;
    progress.record(Stage::Version);

    let ctx = ReleaseContext::new(
        dir,
        kind,
        coordinates,
        version,
        inputs.batch_mode,
        base_env,
    );

    if source::stamp(client, &ctx).await? {
        progress.record(Stage::StampSource);
    }

    let chart = ChartContext::probe(dir, &config.release.charts_dir, ctx.coordinates())?;
    match &chart {
        Some(chart) => {
            chart.tag(ctx.version())?;
            progress.record(Stage::TagChart);
        }
        None => tracing::info!(
            charts_dir = %config.release.charts_dir,
            application = ctx.coordinates().application(),
            "no chart found, skipping chart tagging"
        ),
    }

    source::tag(client, &ctx).await?;
    progress.record(Stage::TagSource);

    if build::ecosystem(client, &ctx).await? {
        progress.record(Stage::Build);
    }

    let image_name = build::container(client, &ctx, &config.release.skaffold_file).await?;
    progress.record(Stage::ContainerBuild);

    build::notify(client, &ctx, &image_name).await?;
    progress.record(Stage::PostBuild);

    let chart_promoted = match &chart {
        Some(chart) => {
            promote::release_and_promote(
                client,
                &ctx,
                chart,
                &inputs.promotion,
                inputs.build_number(),
                progress,
            )
            .await?;
            true
        }
        None => {
            tracing::info!(
                charts_dir = %config.release.charts_dir,
                application = ctx.coordinates().application(),
                "no charts directory for the application, so not promoting"
            );
            false
        }
    };

    tracing::info!(version = %ctx.version(), image = %image_name, "release complete");
    Ok(ReleaseOutcome {
        version: ctx.version().clone(),
        image_name,
        identity,
        chart_promoted,
        completed: Vec::new(),
    })
}
