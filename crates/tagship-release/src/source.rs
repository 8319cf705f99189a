use crate::ReleaseError;
use tagship_core::{ProjectKind, ReleaseContext};
use tagship_tools::{ToolClient, ToolExecutor};

/// Write the release version into the project's own descriptor.
///
/// Returns `false` when the project kind keeps no version in source.
pub async fn stamp<E: ToolExecutor>(
    client: &ToolClient<E>,
    ctx: &ReleaseContext,
) -> Result<bool, ReleaseError> {
    let dir = ctx.project_dir();
    let env = ctx.tool_env();

    let result = match ctx.kind() {
        ProjectKind::Maven => client.maven_set_version(dir, &env, ctx.version()).await,
        ProjectKind::Node => client.npm_set_version(dir, &env, ctx.version()).await,
        ProjectKind::TagOnly => return Ok(false),
    };
    result.map_err(|e| ReleaseError::StampSource { source: e })?;

    tracing::info!(version = %ctx.version(), kind = %ctx.kind(), "stamped version into source");
    Ok(true)
}

/// Commit the release and push its `v<version>` tag.
pub async fn tag<E: ToolExecutor>(
    client: &ToolClient<E>,
    ctx: &ReleaseContext,
) -> Result<(), ReleaseError> {
    client
        .commit_and_tag(ctx.project_dir(), &ctx.tool_env(), ctx.version())
        .await
        .map_err(|e| ReleaseError::SourceTag { source: e })
}
