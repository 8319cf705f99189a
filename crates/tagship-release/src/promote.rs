//! Chart release and promotion: changelog, helm release, promote.

use crate::chart::ChartContext;
use crate::stage::{Progress, Stage};
use crate::ReleaseError;
use semver::Version;
use tagship_core::{ReleaseContext, WaitDuration};
use tagship_tools::{PromotionRequest, ToolClient, ToolExecutor};

pub const DEFAULT_HELM_REPO_NAME: &str = "releases";
pub const DEFAULT_HELM_REPO_URL: &str = "http://jenkins-x-chartmuseum:8080";

/// User-tunable promotion parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionSettings {
    pub timeout: WaitDuration,
    pub poll_interval: WaitDuration,
    pub helm_repo_name: String,
    pub helm_repo_url: String,
}

impl Default for PromotionSettings {
    fn default() -> Self {
        Self {
            timeout: WaitDuration::from_duration(std::time::Duration::from_secs(60 * 60)),
            poll_interval: WaitDuration::from_duration(std::time::Duration::from_secs(20)),
            helm_repo_name: DEFAULT_HELM_REPO_NAME.to_owned(),
            helm_repo_url: DEFAULT_HELM_REPO_URL.to_owned(),
        }
    }
}

impl PromotionSettings {
    /// Promotion always targets every automatic environment and never
    /// prompts, whatever the run's batch mode.
    pub fn request(&self, version: &Version, build: Option<&str>) -> PromotionRequest {
        PromotionRequest {
            all_automatic: true,
            version: version.clone(),
            timeout: self.timeout,
            poll_interval: self.poll_interval,
            helm_repo_name: self.helm_repo_name.clone(),
            helm_repo_url: self.helm_repo_url.clone(),
            build: build.map(str::to_owned),
            batch_mode: true,
        }
    }
}

/// Generate the changelog, release the chart and promote the version.
///
/// Every step runs with the chart directory as its working directory.
pub async fn release_and_promote<E: ToolExecutor>(
    client: &ToolClient<E>,
    ctx: &ReleaseContext,
    chart: &ChartContext,
    settings: &PromotionSettings,
    build: Option<&str>,
    progress: &mut Progress,
) -> Result<(), ReleaseError> {
    let dir = chart.dir();
    let env = ctx.tool_env();

    client
        .changelog(dir, &env, build, ctx.batch_mode())
        .await
        .map_err(|e| ReleaseError::Changelog { source: e })?;
    progress.record(Stage::Changelog);

    client
        .helm_release(dir, &env, ctx.batch_mode())
        .await
        .map_err(|e| ReleaseError::ChartRelease { source: e })?;
    progress.record(Stage::ChartRelease);

    let request = settings.request(ctx.version(), build);
    tracing::info!(
        version = %request.version,
        timeout = %request.timeout,
        helm_repo = %request.helm_repo_name,
        "promoting"
    );
    client
        .promote(dir, &env, &request)
        .await
        .map_err(|e| ReleaseError::Promotion { source: e })?;
    progress.record(Stage::Promotion);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_forces_batch_and_all_auto() {
        let settings = PromotionSettings::default();
        let req = settings.request(&Version::new(1, 2, 4), Some("7"));
        assert!(req.all_automatic);
        assert!(req.batch_mode);
        assert_eq!(req.version, Version::new(1, 2, 4));
        assert_eq!(req.build.as_deref(), Some("7"));
        assert_eq!(req.helm_repo_name, "releases");
        assert_eq!(req.helm_repo_url, "http://jenkins-x-chartmuseum:8080");
    }

    #[test]
    fn default_durations() {
        let settings = PromotionSettings::default();
        assert_eq!(settings.timeout.to_arg(), "3600s");
        assert_eq!(settings.poll_interval.to_arg(), "20s");
    }
}
