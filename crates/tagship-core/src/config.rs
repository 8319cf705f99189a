use serde::{Deserialize, Serialize};

/// File name of the optional per-project configuration.
pub const CONFIG_FILE: &str = "tagship.toml";

/// tagship.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagshipConfig {
    #[serde(default)]
    pub release: ReleaseConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Directory holding one chart per application (defaults to `charts`)
    #[serde(default = "default_charts_dir")]
    pub charts_dir: String,
    /// Build file passed to the container builder
    #[serde(default = "default_skaffold_file")]
    pub skaffold_file: String,
}

/// Where the cluster keeps the docker registry host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_config_map")]
    pub config_map: String,
    #[serde(default = "default_registry_key")]
    pub key: String,
}

/// Last-resort commit identity when neither git config nor flags provide one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_fallback_name")]
    pub fallback_name: String,
    #[serde(default = "default_fallback_email")]
    pub fallback_email: String,
}

/// Program names of the external tools the pipeline drives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_git")]
    pub git: String,
    #[serde(default = "default_mvn")]
    pub mvn: String,
    #[serde(default = "default_npm")]
    pub npm: String,
    #[serde(default = "default_skaffold")]
    pub skaffold: String,
    #[serde(default = "default_kubectl")]
    pub kubectl: String,
    /// Changelog, chart release, promotion and post-build steps
    #[serde(default = "default_workflow")]
    pub workflow: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            charts_dir: default_charts_dir(),
            skaffold_file: default_skaffold_file(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            config_map: default_config_map(),
            key: default_registry_key(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            fallback_name: default_fallback_name(),
            fallback_email: default_fallback_email(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: default_git(),
            mvn: default_mvn(),
            npm: default_npm(),
            skaffold: default_skaffold(),
            kubectl: default_kubectl(),
            workflow: default_workflow(),
        }
    }
}

impl TagshipConfig {
    /// Load from tagship.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            tracing::debug!(path = %config_path.display(), "loading tagship config");
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }
}

fn default_charts_dir() -> String {
    "charts".to_owned()
}

fn default_skaffold_file() -> String {
    "skaffold.yaml".to_owned()
}

fn default_namespace() -> String {
    "jx".to_owned()
}

fn default_config_map() -> String {
    "jenkins-x-docker-registry".to_owned()
}

fn default_registry_key() -> String {
    "docker.registry".to_owned()
}

fn default_fallback_name() -> String {
    "tagship-bot".to_owned()
}

fn default_fallback_email() -> String {
    "tagship-bot@users.noreply.github.com".to_owned()
}

fn default_git() -> String {
    "git".to_owned()
}

fn default_mvn() -> String {
    "mvn".to_owned()
}

fn default_npm() -> String {
    "npm".to_owned()
}

fn default_skaffold() -> String {
    "skaffold".to_owned()
}

fn default_kubectl() -> String {
    "kubectl".to_owned()
}

fn default_workflow() -> String {
    "jx".to_owned()
}
