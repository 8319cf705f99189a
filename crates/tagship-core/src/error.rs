use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Node manifest ──
    #[error("failed to read {path}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no \"version\" field in {path}")]
    ManifestMissingVersion { path: PathBuf },

    // ── Versions ──
    #[error("'{value}' is not a semantic version")]
    InvalidVersion {
        value: String,
        source: semver::Error,
    },

    #[error("no semantic version tag is reachable from HEAD")]
    NoReleaseTag,

    #[error("cannot increment patch component of {0}")]
    VersionOverflow(semver::Version),

    // ── Coordinates ──
    #[error("{field} could not be resolved; pass --{flag} or set ${env}")]
    MissingCoordinate {
        field: &'static str,
        flag: &'static str,
        env: &'static str,
    },

    #[error("invalid duration '{value}'")]
    InvalidDuration {
        value: String,
        source: humantime::DurationError,
    },
}
