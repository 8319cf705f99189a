//! Resolver chains for the image coordinates and the release version.

use crate::ReleaseError;
use semver::Version;
use std::path::Path;
use tagship_core::context::{ENV_APP_NAME, ENV_DOCKER_REGISTRY, ENV_ORG};
use tagship_core::{
    Coordinates, EnvMap, HostEnv, NodeManifest, ProjectKind, RegistryConfig, RemoteRepo,
};
use tagship_tools::{ToolClient, ToolExecutor};

/// Coordinates given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CoordinateInputs {
    pub docker_registry: Option<String>,
    pub organisation: Option<String>,
    pub application: Option<String>,
}

/// Resolve registry, organisation and application.
///
/// Each value comes from the first source that has one: flag, host
/// environment, then the cluster ConfigMap (registry) or the `origin`
/// remote URL (organisation and application).
pub async fn coordinates<E: ToolExecutor>(
    client: &ToolClient<E>,
    dir: &Path,
    env: &EnvMap,
    inputs: &CoordinateInputs,
    host: &HostEnv,
    registry_config: &RegistryConfig,
) -> Result<Coordinates, ReleaseError> {
    let registry = match first_of(&inputs.docker_registry, host.get(ENV_DOCKER_REGISTRY)) {
        Some(r) => r,
        None => {
            tracing::debug!(
                config_map = %registry_config.config_map,
                namespace = %registry_config.namespace,
                "looking up docker registry in cluster"
            );
            client
                .registry_from_cluster(dir, env, registry_config)
                .await
                .map_err(|e| ReleaseError::RegistryLookup {
                    config_map: registry_config.config_map.clone(),
                    namespace: registry_config.namespace.clone(),
                    source: e,
                })?
                .ok_or_else(|| ReleaseError::RegistryMissing {
                    config_map: registry_config.config_map.clone(),
                    key: registry_config.key.clone(),
                })?
        }
    };

    let mut organisation = first_of(&inputs.organisation, host.get(ENV_ORG));
    let mut application = first_of(&inputs.application, host.get(ENV_APP_NAME));

    if organisation.is_none() || application.is_none() {
        let url = client
            .remote_url(dir, env)
            .await
            .map_err(|e| ReleaseError::RemoteLookup { source: e })?;

        match url.as_deref().map(|u| (u, RemoteRepo::parse(u))) {
            Some((_, Some(remote))) => {
                organisation.get_or_insert(remote.organisation);
                application.get_or_insert(remote.name);
            }
            Some((u, None)) => tracing::warn!(url = u, "could not parse git remote URL"),
            None => tracing::warn!("no git remote 'origin' configured"),
        }
    }

    let coords = Coordinates::new(
        registry,
        organisation.unwrap_or_default(),
        application.unwrap_or_default(),
    )
    .map_err(|e| ReleaseError::Coordinates { source: e })?;

    tracing::info!(
        registry = coords.registry(),
        organisation = coords.organisation(),
        application = coords.application(),
        "resolved image coordinates"
    );
    Ok(coords)
}

fn first_of(flag: &Option<String>, env: Option<&str>) -> Option<String> {
    flag.as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or(env)
        .map(str::to_owned)
}

/// Compute the next release version.
///
/// Node projects derive it from `package.json` alone; every other kind uses
/// the highest semantic version tag reachable from HEAD.
pub async fn next_version<E: ToolExecutor>(
    client: &ToolClient<E>,
    dir: &Path,
    kind: ProjectKind,
) -> Result<Version, ReleaseError> {
    let version = if kind.uses_manifest_version() {
        let manifest =
            NodeManifest::load(dir).map_err(|e| ReleaseError::NextVersion { source: e })?;
        tracing::debug!(current = %manifest.version, "version from package.json");
        tagship_core::version::next_patch(&manifest.version)
    } else {
        let tags = client
            .merged_tags(dir)
            .await
            .map_err(|e| ReleaseError::ListTags { source: e })?;
        tracing::debug!(count = tags.len(), "tags reachable from HEAD");
        tagship_core::version::next_from_tags(tags.iter().map(String::as_str))
    }
    .map_err(|e| ReleaseError::NextVersion { source: e })?;

    tracing::info!(%version, %kind, "resolved next version");
    Ok(version)
}
