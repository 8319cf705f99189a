use crate::executor::{Invocation, RealExecutor, ToolExecutor};
use crate::tool::ToolError;
use semver::Version;
use std::path::Path;
use tagship_core::{EnvMap, RegistryConfig, ToolsConfig, WaitDuration};

pub const GIT_USER_NAME: &str = "user.name";
pub const GIT_USER_EMAIL: &str = "user.email";
const GIT_REMOTE_URL: &str = "remote.origin.url";

/// External tool operations, parameterized over the executor for testability.
///
/// Every method takes the directory to run in; none of them change the
/// process working directory or environment.
pub struct ToolClient<E: ToolExecutor = RealExecutor> {
    executor: E,
    tools: ToolsConfig,
}

impl ToolClient<RealExecutor> {
    pub fn new(tools: ToolsConfig) -> Self {
        Self {
            executor: RealExecutor,
            tools,
        }
    }
}

impl<E: ToolExecutor> ToolClient<E> {
    pub fn with_executor(executor: E, tools: ToolsConfig) -> Self {
        Self { executor, tools }
    }

    fn git(&self, dir: &Path) -> Invocation {
        Invocation::new(&self.tools.git, dir)
    }

    fn workflow(&self, dir: &Path, env: &EnvMap) -> Invocation {
        Invocation::new(&self.tools.workflow, dir).envs(env)
    }

    // ── Git ──

    /// `git config --global credential.helper store`
    pub async fn configure_credential_store(
        &self,
        dir: &Path,
        env: &EnvMap,
    ) -> Result<(), ToolError> {
        self.executor
            .exec_streaming(
                &self
                    .git(dir)
                    .args(["config", "--global", "credential.helper", "store"])
                    .envs(env),
            )
            .await
    }

    /// Read a git config value. Unset (or empty) keys are `None`.
    pub async fn config_value(
        &self,
        dir: &Path,
        env: &EnvMap,
        key: &str,
    ) -> Result<Option<String>, ToolError> {
        let result = self
            .executor
            .exec(&self.git(dir).args(["config", "--get", key]).envs(env))
            .await;

        match result {
            Ok(out) => {
                let value = out.trim();
                Ok((!value.is_empty()).then(|| value.to_owned()))
            }
            // arch-lint: allow(no-error-swallowing) reason="git exits 1 when the key is not set"
            Err(e) if e.exit_code() == Some(1) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write a git config value into the repository config.
    pub async fn set_config_value(
        &self,
        dir: &Path,
        env: &EnvMap,
        key: &str,
        value: &str,
    ) -> Result<(), ToolError> {
        self.executor
            .exec(&self.git(dir).args(["config", key, value]).envs(env))
            .await
            .map(|_| ())
    }

    /// URL of the `origin` remote, if configured.
    pub async fn remote_url(&self, dir: &Path, env: &EnvMap) -> Result<Option<String>, ToolError> {
        self.config_value(dir, env, GIT_REMOTE_URL).await
    }

    /// All tags reachable from HEAD.
    pub async fn merged_tags(&self, dir: &Path) -> Result<Vec<String>, ToolError> {
        let output = self
            .executor
            .exec(&self.git(dir).args(["tag", "--merged", "HEAD"]))
            .await?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect())
    }

    /// Commit the working tree as the release and push an annotated tag.
    pub async fn commit_and_tag(
        &self,
        dir: &Path,
        env: &EnvMap,
        version: &Version,
    ) -> Result<(), ToolError> {
        let tag = tagship_core::version::tag_name(version);
        let commit_message = format!("release {version}");
        let tag_message = format!("Release version {version}");

        self.executor
            .exec(&self.git(dir).args(["add", "--all"]).envs(env))
            .await?;
        self.executor
            .exec(
                &self
                    .git(dir)
                    .args(["commit", "--allow-empty", "-m", commit_message.as_str()])
                    .envs(env),
            )
            .await?;
        self.executor
            .exec(
                &self
                    .git(dir)
                    .args(["tag", "-fa", tag.as_str(), "-m", tag_message.as_str()])
                    .envs(env),
            )
            .await?;
        self.executor
            .exec_streaming(&self.git(dir).args(["push", "origin", tag.as_str()]).envs(env))
            .await
    }

    // ── Cluster config store ──

    /// Read the docker registry host from the cluster ConfigMap.
    ///
    /// `Ok(None)` when the ConfigMap exists but the key is missing or empty.
    pub async fn registry_from_cluster(
        &self,
        dir: &Path,
        env: &EnvMap,
        registry: &RegistryConfig,
    ) -> Result<Option<String>, ToolError> {
        // jsonpath needs dots inside the key escaped
        let jsonpath = format!("jsonpath={{.data.{}}}", registry.key.replace('.', "\\."));
        let output = self
            .executor
            .exec(
                &Invocation::new(&self.tools.kubectl, dir)
                    .args([
                        "get",
                        "configmap",
                        registry.config_map.as_str(),
                        "--namespace",
                        registry.namespace.as_str(),
                        "--output",
                        jsonpath.as_str(),
                    ])
                    .envs(env),
            )
            .await?;

        let host = output.trim();
        Ok((!host.is_empty()).then(|| host.to_owned()))
    }

    // ── Ecosystem builds ──

    /// `mvn versions:set -DnewVersion=<version>`
    pub async fn maven_set_version(
        &self,
        dir: &Path,
        env: &EnvMap,
        version: &Version,
    ) -> Result<(), ToolError> {
        self.executor
            .exec_streaming(
                &Invocation::new(&self.tools.mvn, dir)
                    .args([
                        "versions:set".to_owned(),
                        format!("-DnewVersion={version}"),
                        "-DgenerateBackupPoms=false".to_owned(),
                    ])
                    .envs(env),
            )
            .await
    }

    /// `mvn clean deploy`
    pub async fn maven_deploy(&self, dir: &Path, env: &EnvMap) -> Result<(), ToolError> {
        self.executor
            .exec_streaming(
                &Invocation::new(&self.tools.mvn, dir)
                    .args(["clean", "deploy"])
                    .envs(env),
            )
            .await
    }

    /// `npm version <version> --no-git-tag-version --allow-same-version`
    pub async fn npm_set_version(
        &self,
        dir: &Path,
        env: &EnvMap,
        version: &Version,
    ) -> Result<(), ToolError> {
        self.executor
            .exec_streaming(
                &Invocation::new(&self.tools.npm, dir)
                    .args([
                        "version".to_owned(),
                        version.to_string(),
                        "--no-git-tag-version".to_owned(),
                        "--allow-same-version".to_owned(),
                    ])
                    .envs(env),
            )
            .await
    }

    /// `skaffold build -f <file>`
    pub async fn skaffold_build(
        &self,
        dir: &Path,
        env: &EnvMap,
        skaffold_file: &str,
    ) -> Result<(), ToolError> {
        self.executor
            .exec_streaming(
                &Invocation::new(&self.tools.skaffold, dir)
                    .args(["build", "-f", skaffold_file])
                    .envs(env),
            )
            .await
    }

    // ── Release workflow ──

    /// Record the built image for pipeline activity tracking.
    pub async fn post_build(
        &self,
        dir: &Path,
        env: &EnvMap,
        image_name: &str,
        batch_mode: bool,
    ) -> Result<(), ToolError> {
        let mut cmd = self
            .workflow(dir, env)
            .args(["step", "post", "build", "--image", image_name]);
        if batch_mode {
            cmd = cmd.args(["--batch-mode"]);
        }
        self.executor.exec_streaming(&cmd).await
    }

    /// Generate the changelog for the current build.
    pub async fn changelog(
        &self,
        dir: &Path,
        env: &EnvMap,
        build: Option<&str>,
        batch_mode: bool,
    ) -> Result<(), ToolError> {
        let mut cmd = self.workflow(dir, env).args(["step", "changelog"]);
        if let Some(build) = build {
            cmd = cmd.args(["--build", build]);
        }
        if batch_mode {
            cmd = cmd.args(["--batch-mode"]);
        }
        self.executor.exec_streaming(&cmd).await
    }

    /// Package the chart in `dir` and publish it to the chart repository.
    pub async fn helm_release(
        &self,
        dir: &Path,
        env: &EnvMap,
        batch_mode: bool,
    ) -> Result<(), ToolError> {
        let mut cmd = self.workflow(dir, env).args(["step", "helm", "release"]);
        if batch_mode {
            cmd = cmd.args(["--batch-mode"]);
        }
        self.executor.exec_streaming(&cmd).await
    }

    /// Promote a released version through the environments.
    pub async fn promote(
        &self,
        dir: &Path,
        env: &EnvMap,
        request: &PromotionRequest,
    ) -> Result<(), ToolError> {
        let cmd = self.workflow(dir, env).args(request.to_args());
        self.executor.exec_streaming(&cmd).await
    }
}

/// Parameters of a promotion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionRequest {
    /// Promote to every environment with automatic promotion enabled.
    pub all_automatic: bool,
    pub version: Version,
    pub timeout: WaitDuration,
    /// How often to check whether the promotion pull request merged.
    pub poll_interval: WaitDuration,
    pub helm_repo_name: String,
    pub helm_repo_url: String,
    pub build: Option<String>,
    pub batch_mode: bool,
}

impl PromotionRequest {
    pub fn to_args(&self) -> Vec<String> {
        let mut out = vec!["promote".to_owned()];
        if self.all_automatic {
            out.push("--all-auto".to_owned());
        }
        out.extend([
            "--version".to_owned(),
            self.version.to_string(),
            "--timeout".to_owned(),
            self.timeout.to_arg(),
            "--pull-request-poll-time".to_owned(),
            self.poll_interval.to_arg(),
            "--helm-repo-name".to_owned(),
            self.helm_repo_name.clone(),
            "--helm-repo-url".to_owned(),
            self.helm_repo_url.clone(),
        ]);
        if let Some(build) = &self.build {
            out.push("--build".to_owned());
            out.push(build.clone());
        }
        if self.batch_mode {
            out.push("--batch-mode".to_owned());
        }
        out
    }
}
