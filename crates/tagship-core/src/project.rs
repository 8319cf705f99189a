use serde::Deserialize;
use std::path::Path;

pub const NODE_MANIFEST: &str = "package.json";
pub const MAVEN_DESCRIPTOR: &str = "pom.xml";

/// The build ecosystem of the project being released.
///
/// Detected once from marker files at pipeline start; every stage dispatches
/// on this value instead of probing the filesystem again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    /// `pom.xml`: version embedded in the descriptor, built with `mvn`.
    Maven,
    /// `package.json`: next version derived from the manifest.
    Node,
    /// Anything else: version comes from git tags only.
    TagOnly,
}

impl ProjectKind {
    /// Detect the project kind from marker files in `project_dir`.
    ///
    /// A `package.json` wins over a `pom.xml`, since the manifest is then the
    /// authoritative version source.
    pub fn detect(project_dir: &Path) -> Self {
        let kind = if project_dir.join(NODE_MANIFEST).is_file() {
            Self::Node
        } else if project_dir.join(MAVEN_DESCRIPTOR).is_file() {
            Self::Maven
        } else {
            Self::TagOnly
        };
        tracing::debug!(dir = %project_dir.display(), ?kind, "detected project kind");
        kind
    }

    /// Whether the next version is computed from a manifest rather than tags.
    pub fn uses_manifest_version(self) -> bool {
        matches!(self, Self::Node)
    }
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Maven => "maven",
            Self::Node => "node",
            Self::TagOnly => "tag-only",
        };
        f.write_str(name)
    }
}

/// The parts of `package.json` the release cares about.
#[derive(Debug, Clone)]
pub struct NodeManifest {
    pub version: semver::Version,
}

#[derive(Deserialize)]
struct PackageJson {
    version: Option<String>,
}

impl NodeManifest {
    /// Read the current version from `package.json` in `project_dir`.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let path = project_dir.join(NODE_MANIFEST);
        let content = std::fs::read_to_string(&path).map_err(|e| crate::Error::ManifestRead {
            path: path.clone(),
            source: e,
        })?;

        let parsed: PackageJson =
            serde_json::from_str(&content).map_err(|e| crate::Error::ManifestParse {
                path: path.clone(),
                source: e,
            })?;

        let raw = parsed
            .version
            .ok_or_else(|| crate::Error::ManifestMissingVersion { path: path.clone() })?;
        let version = crate::version::parse_version(&raw)?;

        Ok(Self {
            version,
        })
    }
}
