//! Release state shared by the pipeline stages.
//!
//! Instead of exporting variables into the process environment, each external
//! tool invocation receives an [`EnvMap`] derived from these values.

use crate::ProjectKind;
use semver::Version;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variables handed to an external tool invocation.
pub type EnvMap = BTreeMap<String, String>;

pub const ENV_XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";
pub const ENV_DOCKER_REGISTRY: &str = "DOCKER_REGISTRY";
pub const ENV_ORG: &str = "ORG";
pub const ENV_APP_NAME: &str = "APP_NAME";
pub const ENV_VERSION: &str = "VERSION";
pub const ENV_BUILD_NUMBER: &str = "BUILD_NUMBER";

/// Host variables consulted as fallback inputs.
const HOST_KEYS: &[&str] = &[
    ENV_XDG_CONFIG_HOME,
    ENV_DOCKER_REGISTRY,
    ENV_ORG,
    ENV_APP_NAME,
    ENV_BUILD_NUMBER,
    "USER",
    "LOGNAME",
];

/// Snapshot of the host environment variables tagship reads.
///
/// Taken once at startup so that resolution is deterministic and testable.
#[derive(Debug, Clone, Default)]
pub struct HostEnv {
    vars: BTreeMap<String, String>,
}

impl HostEnv {
    pub fn from_process() -> Self {
        let vars = std::env::vars()
            .filter(|(k, _)| HOST_KEYS.contains(&k.as_str()))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `key`, treating an empty value as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Login name of the OS user running the release.
    pub fn os_user(&self) -> Option<&str> {
        self.get("USER").or_else(|| self.get("LOGNAME"))
    }
}

/// Registry, organisation and application: the coordinates of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    registry: String,
    organisation: String,
    application: String,
}

impl Coordinates {
    /// All three parts must be non-empty.
    pub fn new(
        registry: impl Into<String>,
        organisation: impl Into<String>,
        application: impl Into<String>,
    ) -> crate::Result<Self> {
        let registry = non_empty(
            registry.into(),
            "docker registry",
            "docker-registry",
            ENV_DOCKER_REGISTRY,
        )?;
        let organisation =
            non_empty(organisation.into(), "organisation", "organisation", ENV_ORG)?;
        let application =
            non_empty(application.into(), "application", "application", ENV_APP_NAME)?;
        Ok(Self {
            registry,
            organisation,
            application,
        })
    }

    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn organisation(&self) -> &str {
        &self.organisation
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    /// `registry/organisation/application`, the image repository.
    pub fn repository(&self) -> String {
        format!(
            "{}/{}/{}",
            self.registry, self.organisation, self.application
        )
    }

    /// `registry/organisation/application:version`
    pub fn image_name(&self, version: &Version) -> String {
        format!("{}:{version}", self.repository())
    }

    /// Variables the container builder reads to name the image.
    pub fn env(&self) -> EnvMap {
        EnvMap::from([
            (ENV_DOCKER_REGISTRY.to_owned(), self.registry.clone()),
            (ENV_ORG.to_owned(), self.organisation.clone()),
            (ENV_APP_NAME.to_owned(), self.application.clone()),
        ])
    }
}

fn non_empty(
    value: String,
    field: &'static str,
    flag: &'static str,
    env: &'static str,
) -> crate::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::Error::MissingCoordinate { field, flag, env });
    }
    Ok(trimmed.to_owned())
}

/// Everything a stage needs once the release version is known.
///
/// Built exactly once per run; the version cannot change afterwards.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    project_dir: PathBuf,
    kind: ProjectKind,
    coordinates: Coordinates,
    version: Version,
    batch_mode: bool,
    base_env: EnvMap,
}

impl ReleaseContext {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        kind: ProjectKind,
        coordinates: Coordinates,
        version: Version,
        batch_mode: bool,
        base_env: EnvMap,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            kind,
            coordinates,
            version,
            batch_mode,
            base_env,
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn batch_mode(&self) -> bool {
        self.batch_mode
    }

    pub fn image_name(&self) -> String {
        self.coordinates.image_name(&self.version)
    }

    /// Environment for external tools: base variables plus
    /// `DOCKER_REGISTRY`, `ORG`, `APP_NAME` and `VERSION`.
    pub fn tool_env(&self) -> EnvMap {
        let mut env = self.base_env.clone();
        env.extend(self.coordinates.env());
        env.insert(ENV_VERSION.to_owned(), self.version.to_string());
        env
    }
}
