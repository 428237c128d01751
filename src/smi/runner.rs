// ABOUTME: Builds and runs one nvidia-smi invocation
// ABOUTME: Forces XML output, checks exit status, wraps stdout in a snapshot

use super::error::{Result, SmiError};
use super::snapshot::SmiSnapshot;
use std::process::Command;
use tracing::debug;

/// Executable used when none is configured
pub const DEFAULT_EXECUTABLE: &str = "nvidia-smi";

/// Option requesting the full device report
pub const DEFAULT_OPTION: &str = "-q";

/// Option forcing XML output
pub const XML_OPTION: &str = "-x";

const XML_OPTION_LONG: &str = "--xml-format";

/// Captured result of one external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Seam between the query logic and process spawning
pub trait CommandExecutor {
    fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Runs the command as a child process and waits for it
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| SmiError::Spawn {
                program: program.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Assemble the argument list for one query
///
/// `None` selects [`DEFAULT_OPTION`]. [`XML_OPTION`] is appended unless the
/// caller already asked for XML output.
pub fn build_args(options: Option<&[&str]>) -> Vec<String> {
    let mut args: Vec<String> = match options {
        Some(options) => options.iter().map(|o| o.to_string()).collect(),
        None => vec![DEFAULT_OPTION.to_string()],
    };
    if !args.iter().any(|a| a == XML_OPTION || a == XML_OPTION_LONG) {
        args.push(XML_OPTION.to_string());
    }
    args
}

/// nvidia-smi query runner
///
/// ```rust,no_run
/// # use nvsmi_query::{SmiQuery, SmiError};
/// # fn main() -> Result<(), SmiError> {
/// let snapshot = SmiQuery::new().query(None)?;
/// for gpu in snapshot.devices()? {
///     println!("{}: {:?} C", gpu.product_name()?, gpu.temp_gpu_celsius()?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SmiQuery<E = ProcessExecutor> {
    executable: String,
    executor: E,
}

impl SmiQuery {
    /// Runner for `nvidia-smi` on `PATH`
    pub fn new() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            executor: ProcessExecutor,
        }
    }
}

impl Default for SmiQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> SmiQuery<E> {
    /// Use a different executable path
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Replace the process executor
    pub fn with_executor<X: CommandExecutor>(self, executor: X) -> SmiQuery<X> {
        SmiQuery {
            executable: self.executable,
            executor,
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Run the tool and return its output as text, without parsing
    ///
    /// Blocks until the tool exits. A non-zero exit or blank output fails
    /// with [`SmiError::ExternalToolFailure`].
    pub fn query_raw(&self, options: Option<&[&str]>) -> Result<String> {
        let args = build_args(options);
        debug!("Running {} {}", self.executable, args.join(" "));

        let output = self.executor.execute(&self.executable, &args)?;
        debug!(
            code = ?output.code,
            stdout_bytes = output.stdout.len(),
            "{} finished",
            self.executable
        );

        if !output.success {
            let details = if output.stderr.trim().is_empty() {
                output.stdout.trim().to_string()
            } else {
                output.stderr.trim().to_string()
            };
            return Err(self.tool_failure(args, output.code, details));
        }
        if output.stdout.trim().is_empty() {
            return Err(self.tool_failure(args, output.code, "no output".to_string()));
        }

        Ok(output.stdout)
    }

    /// Run the tool and parse its XML report
    pub fn query(&self, options: Option<&[&str]>) -> Result<SmiSnapshot> {
        SmiSnapshot::parse(self.query_raw(options)?)
    }

    fn tool_failure(&self, args: Vec<String>, code: Option<i32>, details: String) -> SmiError {
        SmiError::ExternalToolFailure {
            program: self.executable.clone(),
            args,
            code,
            details,
        }
    }
}
