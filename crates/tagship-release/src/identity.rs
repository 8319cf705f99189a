use crate::ReleaseError;
use std::path::Path;
use tagship_core::{EnvMap, HostEnv, IdentityConfig};
use tagship_tools::{GIT_USER_EMAIL, GIT_USER_NAME, ToolClient, ToolExecutor};

/// The author identity release commits are made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Explicitly requested identity (`--git-username`, `--git-email`).
#[derive(Debug, Clone, Default)]
pub struct IdentityInputs {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Make sure git has a user name and email configured in `dir`.
///
/// An already configured value is kept and never rewritten. Otherwise the
/// name falls back through the explicit input, the OS login name and the
/// configured fallback; the email through the explicit input and the
/// configured fallback. Name and email are resolved independently.
///
/// `env` must carry `XDG_CONFIG_HOME` so git sees the same global config
/// the later stages use.
pub async fn bootstrap<E: ToolExecutor>(
    client: &ToolClient<E>,
    dir: &Path,
    env: &EnvMap,
    inputs: &IdentityInputs,
    host: &HostEnv,
    fallback: &IdentityConfig,
) -> Result<Identity, ReleaseError> {
    let name = ensure(
        client,
        dir,
        env,
        GIT_USER_NAME,
        [
            non_empty(inputs.username.as_deref()),
            host.os_user(),
            Some(fallback.fallback_name.as_str()),
        ],
    )
    .await?;

    let email = ensure(
        client,
        dir,
        env,
        GIT_USER_EMAIL,
        [
            non_empty(inputs.email.as_deref()),
            None,
            Some(fallback.fallback_email.as_str()),
        ],
    )
    .await?;

    Ok(Identity { name, email })
}

async fn ensure<E: ToolExecutor>(
    client: &ToolClient<E>,
    dir: &Path,
    env: &EnvMap,
    key: &'static str,
    candidates: [Option<&str>; 3],
) -> Result<String, ReleaseError> {
    let existing = client
        .config_value(dir, env, key)
        .await
        .map_err(|e| ReleaseError::ReadIdentity { key, source: e })?;

    if let Some(value) = existing {
        tracing::debug!(key, value = %value, "git identity already configured");
        return Ok(value);
    }

    // The last candidate is always the configured fallback
    let value = candidates
        .into_iter()
        .flatten()
        .next()
        .unwrap_or_default()
        .to_owned();

    client
        .set_config_value(dir, env, key, &value)
        .await
        .map_err(|e| ReleaseError::WriteIdentity {
            key,
            value: value.clone(),
            source: e,
        })?;

    tracing::info!(key, value = %value, "configured git identity");
    Ok(value)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
