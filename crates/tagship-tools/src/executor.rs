use crate::tool::ToolError;
use std::path::{Path, PathBuf};
use tagship_core::EnvMap;

/// One external program invocation.
///
/// The working directory and the extra environment are explicit, so no
/// invocation depends on (or changes) process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Added on top of the inherited process environment.
    pub env: EnvMap,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            env: EnvMap::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn envs(mut self, env: &EnvMap) -> Self {
        self.env.extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Whether the arguments contain `needle` as a whole argument.
    pub fn has_arg(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a == needle)
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Abstraction over external tool execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait ToolExecutor: Send + Sync {
    /// Run a command and capture stdout.
    async fn exec(&self, cmd: &Invocation) -> Result<String, ToolError>;

    /// Run a command, streaming its output to the terminal.
    async fn exec_streaming(&self, cmd: &Invocation) -> Result<(), ToolError>;
}

/// Runs commands as child processes via `tokio::process`.
pub struct RealExecutor;

impl RealExecutor {
    fn command(cmd: &Invocation) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&cmd.program);
        command
            .args(&cmd.args)
            .current_dir(&cmd.cwd)
            .envs(&cmd.env);
        command
    }
}

impl ToolExecutor for RealExecutor {
    async fn exec(&self, cmd: &Invocation) -> Result<String, ToolError> {
        use std::process::Stdio;

        tracing::debug!(command = %cmd, cwd = %cmd.cwd.display(), "exec");

        let output = Self::command(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ToolError::NotFound {
                program: cmd.program.clone(),
                source: e,
            })?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| ToolError::InvalidUtf8 {
                program: cmd.program.clone(),
                source: e,
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(ToolError::CommandFailed {
                command: cmd.to_string(),
                code: output.status.code(),
                stderr,
            })
        }
    }

    async fn exec_streaming(&self, cmd: &Invocation) -> Result<(), ToolError> {
        use std::process::Stdio;

        tracing::info!(command = %cmd, cwd = %cmd.cwd.display(), "running");

        let status = Self::command(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ToolError::NotFound {
                program: cmd.program.clone(),
                source: e,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ToolError::CommandFailed {
                command: cmd.to_string(),
                code: status.code(),
                stderr: String::new(),
            })
        }
    }
}
