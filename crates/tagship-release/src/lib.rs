//! Release pipeline stages and orchestrator for tagship.
//!
//! # Release pipeline
//!
//! ```text
//! tagship release
//!    1. Credentials  ── git config --global credential.helper store
//!    2. Identity     ── git config user.name / user.email (only if unset)
//!    3. Coordinates  ── flag → env → cluster ConfigMap / origin remote
//!    4. Version      ── package.json patch bump, or latest merged tag + 1
//!    5. Stamp        ── mvn versions:set / npm version (tag-only: none)
//!    6. Tag chart    ── charts/<app>/Chart.yaml + values.yaml (if present)
//!    7. Tag source   ── git commit, git tag v<version>, git push
//!    8. Build        ── mvn clean deploy (Maven only)
//!    9. Image        ── skaffold build -f skaffold.yaml
//!   10. Post build   ── jx step post build --image <image>
//!   11. Promote      ── jx step changelog → jx step helm release → jx promote
//! ```
//!
//! Step 11 runs in the chart directory and only when a chart exists.
//!
//! # Environment
//!
//! The process environment is never written. Each tool invocation gets an
//! explicit working directory and an [`EnvMap`](tagship_core::EnvMap) built
//! from the [`ReleaseContext`](tagship_core::ReleaseContext).
//!
//! # Failure
//!
//! The first failing stage stops the run. [`ReleaseFailure`] carries the
//! stages that already completed; nothing is undone.

pub mod build;
pub mod chart;
pub mod error;
pub mod identity;
pub mod pipeline;
pub mod promote;
pub mod resolve;
pub mod source;
pub mod stage;

pub use chart::ChartContext;
pub use error::{ErrorKind, ReleaseError};
pub use identity::{Identity, IdentityInputs};
pub use pipeline::{ReleaseFailure, ReleaseInputs, ReleaseOutcome, run};
pub use promote::PromotionSettings;
pub use resolve::CoordinateInputs;
pub use stage::{Progress, Stage};
