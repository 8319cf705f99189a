use crate::ReleaseError;
use tagship_core::{ProjectKind, ReleaseContext};
use tagship_tools::{ToolClient, ToolExecutor};

/// Run the ecosystem build for the project kind.
///
/// Only Maven projects have one (`mvn clean deploy`); returns whether a
/// build ran.
pub async fn ecosystem<E: ToolExecutor>(
    client: &ToolClient<E>,
    ctx: &ReleaseContext,
) -> Result<bool, ReleaseError> {
    match ctx.kind() {
        ProjectKind::Maven => {
            client
                .maven_deploy(ctx.project_dir(), &ctx.tool_env())
                .await
                .map_err(|e| ReleaseError::Build { source: e })?;
            Ok(true)
        }
        ProjectKind::Node | ProjectKind::TagOnly => {
            tracing::debug!(kind = %ctx.kind(), "no ecosystem build for project kind");
            Ok(false)
        }
    }
}

/// Build and push the container image, returning its full name.
pub async fn container<E: ToolExecutor>(
    client: &ToolClient<E>,
    ctx: &ReleaseContext,
    skaffold_file: &str,
) -> Result<String, ReleaseError> {
    client
        .skaffold_build(ctx.project_dir(), &ctx.tool_env(), skaffold_file)
        .await
        .map_err(|e| ReleaseError::ContainerBuild { source: e })?;

    let image = ctx.image_name();
    tracing::info!(image = %image, "built container image");
    Ok(image)
}

/// Record the built image with the workflow tool.
pub async fn notify<E: ToolExecutor>(
    client: &ToolClient<E>,
    ctx: &ReleaseContext,
    image_name: &str,
) -> Result<(), ReleaseError> {
    client
        .post_build(
            ctx.project_dir(),
            &ctx.tool_env(),
            image_name,
            ctx.batch_mode(),
        )
        .await
        .map_err(|e| ReleaseError::PostBuild { source: e })
}
