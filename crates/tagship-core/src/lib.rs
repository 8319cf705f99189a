//! Core types and configuration for tagship.
//!
//! This crate defines the `tagship.toml` schema ([`TagshipConfig`]),
//! project kind detection ([`ProjectKind`]), release version arithmetic,
//! and the immutable [`ReleaseContext`] every pipeline stage borrows.

pub mod config;
pub mod context;
pub mod duration;
pub mod error;
pub mod project;
pub mod remote;
pub mod version;

pub use config::{IdentityConfig, RegistryConfig, ReleaseConfig, TagshipConfig, ToolsConfig};
pub use context::{Coordinates, EnvMap, HostEnv, ReleaseContext};
pub use duration::WaitDuration;
pub use error::{Error, Result};
pub use project::{NodeManifest, ProjectKind};
pub use remote::RemoteRepo;
