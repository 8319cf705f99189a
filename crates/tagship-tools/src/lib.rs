pub mod client;
pub mod executor;
pub mod tool;

pub use client::{GIT_USER_EMAIL, GIT_USER_NAME, PromotionRequest, ToolClient};
pub use executor::{Invocation, RealExecutor, ToolExecutor};
pub use tool::ToolError;
