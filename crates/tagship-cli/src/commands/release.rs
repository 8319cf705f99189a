use anyhow::Context;
use std::path::PathBuf;
use tagship_core::{HostEnv, TagshipConfig, WaitDuration};
use tagship_release::pipeline::DEFAULT_XDG_CONFIG_HOME;
use tagship_release::promote::{DEFAULT_HELM_REPO_NAME, DEFAULT_HELM_REPO_URL};
use tagship_release::{
    CoordinateInputs, IdentityInputs, PromotionSettings, ReleaseInputs, Stage,
};
use tagship_tools::ToolClient;

#[derive(clap::Args, Debug)]
pub struct ReleaseArgs {
    /// Project directory
    #[arg(long, short = 'd', default_value = ".")]
    dir: PathBuf,

    /// Docker registry host (default: $DOCKER_REGISTRY, then the cluster ConfigMap)
    #[arg(long, short = 'r')]
    docker_registry: Option<String>,

    /// Organisation of the image (default: $ORG, then the git remote)
    #[arg(long, short = 'o')]
    organisation: Option<String>,

    /// Application name (default: $APP_NAME, then the git remote)
    #[arg(long, short = 'a')]
    application: Option<String>,

    /// Git user name, used only when none is configured
    #[arg(long, short = 'u')]
    git_username: Option<String>,

    /// Git email, used only when none is configured
    #[arg(long, short = 'e')]
    git_email: Option<String>,

    /// XDG_CONFIG_HOME for the tools, unless already set
    #[arg(long, default_value = DEFAULT_XDG_CONFIG_HOME)]
    xdg_config_home: String,

    /// Let delegated steps prompt for input
    #[arg(long)]
    no_batch: bool,

    /// How long to wait for promotion to complete
    #[arg(long, short = 't', default_value = "1h")]
    timeout: WaitDuration,

    /// How often to poll the promotion pull request
    #[arg(long, default_value = "20s")]
    pull_request_poll_time: WaitDuration,

    /// Name of the helm chart repository
    #[arg(long, default_value = DEFAULT_HELM_REPO_NAME)]
    helm_repo_name: String,

    /// URL of the helm chart repository
    #[arg(long, default_value = DEFAULT_HELM_REPO_URL)]
    helm_repo_url: String,

    /// Build number (default: $BUILD_NUMBER)
    #[arg(long, short = 'b')]
    build: Option<String>,
}

impl ReleaseArgs {
    fn into_inputs(self, config: TagshipConfig, host: HostEnv) -> ReleaseInputs {
        ReleaseInputs {
            coordinates: CoordinateInputs {
                docker_registry: self.docker_registry,
                organisation: self.organisation,
                application: self.application,
            },
            identity: IdentityInputs {
                username: self.git_username,
                email: self.git_email,
            },
            xdg_config_home: self.xdg_config_home,
            batch_mode: !self.no_batch,
            promotion: PromotionSettings {
                timeout: self.timeout,
                poll_interval: self.pull_request_poll_time,
                helm_repo_name: self.helm_repo_name,
                helm_repo_url: self.helm_repo_url,
            },
            build: self.build,
            ..ReleaseInputs::new(self.dir, config, host)
        }
    }
}

/// Execute the release pipeline.
pub async fn release(args: ReleaseArgs) -> anyhow::Result<()> {
    let config = TagshipConfig::load(&args.dir)
        .with_context(|| format!("failed to load configuration from {}", args.dir.display()))?;
    let client = ToolClient::new(config.tools.clone());
    let inputs = args.into_inputs(config, HostEnv::from_process());

    println!("Releasing {}...", inputs.project_dir.display());

    match tagship_release::run(&client, &inputs).await {
        Ok(outcome) => {
            print_stages(&outcome.completed);
            println!();
            if !outcome.chart_promoted {
                println!("No chart found, promotion skipped");
            }
            println!("Released {}: {}", outcome.version, outcome.image_name);
            Ok(())
        }
        Err(failure) => {
            if failure.completed.is_empty() {
                println!("Release failed before any stage completed");
            } else {
                println!("Release failed. Stages already applied:");
                print_stages(&failure.completed);
            }
            Err(anyhow::Error::new(failure.error))
        }
    }
}

fn print_stages(stages: &[Stage]) {
    for stage in stages {
        println!("  ✓ {stage}");
    }
}
