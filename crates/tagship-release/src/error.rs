use std::path::PathBuf;
use tagship_tools::ToolError;

/// Failure categories of the release pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    VersionResolution,
    BuildTool,
    Build,
    ContainerBuild,
    Tagging,
    Notification,
    Changelog,
    ChartRelease,
    Promotion,
}

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    // ── Configuration ──
    #[error("failed to set up git credentials")]
    Credentials { source: ToolError },

    #[error("failed to read git {key}")]
    ReadIdentity {
        key: &'static str,
        source: ToolError,
    },

    #[error("failed to set git {key} to '{value}'")]
    WriteIdentity {
        key: &'static str,
        value: String,
        source: ToolError,
    },

    #[error("could not read ConfigMap {config_map} in namespace {namespace}")]
    RegistryLookup {
        config_map: String,
        namespace: String,
        source: ToolError,
    },

    #[error("could not find the {key} property in the ConfigMap {config_map}")]
    RegistryMissing { config_map: String, key: String },

    #[error("failed to read the git remote")]
    RemoteLookup { source: ToolError },

    #[error("cannot determine the image name")]
    Coordinates { source: tagship_core::Error },

    // ── Version resolution ──
    #[error("failed to create next version")]
    ListTags { source: ToolError },

    #[error("failed to create next version")]
    NextVersion { source: tagship_core::Error },

    // ── Build tools ──
    #[error("failed to update version in source")]
    StampSource { source: ToolError },

    #[error("failed to build source")]
    Build { source: ToolError },

    #[error("failed to run skaffold")]
    ContainerBuild { source: ToolError },

    // ── Tagging ──
    #[error("failed to find chart folder {path}")]
    ChartProbe {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to tag chart descriptor {path}")]
    ChartDescriptor {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to tag source")]
    SourceTag { source: ToolError },

    // ── Notification ──
    #[error("failed to run post build step")]
    PostBuild { source: ToolError },

    // ── Chart release & promotion ──
    #[error("failed to generate changelog")]
    Changelog { source: ToolError },

    #[error("failed to release helm chart")]
    ChartRelease { source: ToolError },

    #[error("failed to promote")]
    Promotion { source: ToolError },
}

impl ReleaseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Credentials { .. }
            | Self::ReadIdentity { .. }
            | Self::WriteIdentity { .. }
            | Self::RegistryLookup { .. }
            | Self::RegistryMissing { .. }
            | Self::RemoteLookup { .. }
            | Self::Coordinates { .. } => ErrorKind::Configuration,
            Self::ListTags { .. } | Self::NextVersion { .. } => ErrorKind::VersionResolution,
            Self::StampSource { .. } => ErrorKind::BuildTool,
            Self::Build { .. } => ErrorKind::Build,
            Self::ContainerBuild { .. } => ErrorKind::ContainerBuild,
            Self::ChartProbe { .. } | Self::ChartDescriptor { .. } | Self::SourceTag { .. } => {
                ErrorKind::Tagging
            }
            Self::PostBuild { .. } => ErrorKind::Notification,
            Self::Changelog { .. } => ErrorKind::Changelog,
            Self::ChartRelease { .. } => ErrorKind::ChartRelease,
            Self::Promotion { .. } => ErrorKind::Promotion,
        }
    }
}
