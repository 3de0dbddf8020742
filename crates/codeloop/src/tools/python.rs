use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use codeloop_core::tool::{Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tempfile::Builder as TempFileBuilder;
use tokio::process::Command;
use tokio::time::timeout;

/// The default wall-clock budget for one execution.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PythonToolParameters {
    #[schemars(description = "The Python code to execute.")]
    code: String,
}

/// A tool for executing Python code in a subprocess.
///
/// The code runs with the same environment, working directory, and
/// privileges as the host process; process isolation is all the
/// sandboxing there is.
pub struct PythonTool {
    parameter_schema: Value,
    interpreter: PathBuf,
    timeout: Duration,
}

impl PythonTool {
    /// Creates a new Python tool with the default interpreter and
    /// timeout.
    #[inline]
    pub fn new() -> Self {
        PythonTool {
            parameter_schema: schema_for!(PythonToolParameters).to_value(),
            interpreter: PathBuf::from("python3"),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the interpreter to run the code with.
    #[inline]
    pub fn with_interpreter<P: Into<PathBuf>>(mut self, interpreter: P) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Sets the wall-clock budget for one execution.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for PythonTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for PythonTool {
    type Input = PythonToolParameters;

    fn name(&self) -> &str {
        "run_python"
    }

    fn description(&self) -> &str {
        r#"
Executes Python code in a subprocess.
Strings collected from stdout and stderr will be returned as the tool's output, stdout first."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: PythonToolParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let interpreter = self.interpreter.clone();
        let time_limit = self.timeout;
        async move {
            Ok(run_python(&interpreter, &input.code, time_limit).await)
        }
    }
}

/// Removes the longest whitespace prefix common to all non-blank lines,
/// so that code pasted out of an indented context still parses.
fn dedent(code: &str) -> String {
    let mut prefix: Option<&str> = None;
    for line in code.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start().len()];
        prefix = Some(match prefix {
            None => indent,
            Some(prefix) => common_prefix(prefix, indent),
        });
    }

    let prefix = prefix.unwrap_or("");
    if prefix.is_empty() {
        return code.to_owned();
    }

    let mut dedented = code
        .lines()
        .map(|line| line.strip_prefix(prefix).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n");
    if code.ends_with('\n') {
        dedented.push('\n');
    }
    dedented
}

#[inline]
fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .chars()
        .zip(b.chars())
        .take_while(|(lhs, rhs)| lhs == rhs)
        .map(|(ch, _)| ch.len_utf8())
        .sum();
    &a[..len]
}

/// Runs `code` with `interpreter` and collects what it printed.
///
/// This function never fails: timeouts, spawn errors, and IO errors are
/// all reported through the returned string, so the model always gets
/// something to look at.
async fn run_python(
    interpreter: &Path,
    code: &str,
    time_limit: Duration,
) -> String {
    let code = dedent(code);

    // The script lives exactly as long as this scope, including the
    // timeout and error paths.
    let mut script = match TempFileBuilder::new().suffix(".py").tempfile() {
        Ok(script) => script,
        Err(err) => return format!("failed to create a script file: {err}"),
    };
    if let Err(err) = script.write_all(code.as_bytes()) {
        return format!("failed to write the script file: {err}");
    }

    debug!(
        "running a {}-byte script with {}",
        code.len(),
        interpreter.display()
    );
    let mut command = Command::new(interpreter);
    command
        .arg(script.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            return format!(
                "failed to spawn {}: {err}",
                interpreter.display()
            );
        }
    };

    let output = match timeout(time_limit, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(err)) => return format!("failed to run the code: {err}"),
        Err(_) => {
            warn!("killed the interpreter after {}s", time_limit.as_secs());
            return format!(
                "execution timed out after {} seconds",
                time_limit.as_secs()
            );
        }
    };

    let mut result = String::from_utf8_lossy(&output.stdout).into_owned();
    result.push_str(&String::from_utf8_lossy(&output.stderr));
    result
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn python() -> &'static Path {
        Path::new("python3")
    }

    #[test]
    fn test_parameter_schema() {
        let tool = PythonTool::new();
        let schema = tool.parameter_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["code"]["type"], "string");
        assert_eq!(schema["required"], json!(["code"]));
        assert_eq!(schema["additionalProperties"], json!(false));
    }

    #[test]
    fn test_dedent() {
        assert_eq!(dedent("a\nb\n"), "a\nb\n");
        assert_eq!(dedent("    a\n    b\n"), "a\nb\n");
        assert_eq!(dedent("    a\n        b\n"), "a\n    b\n");
        assert_eq!(dedent("\t\ta\n\t\tb"), "a\nb");
        // Blank lines don't pin the common prefix.
        assert_eq!(dedent("    a\n\n    b\n"), "a\n\nb\n");
        assert_eq!(dedent(""), "");
    }

    #[tokio::test]
    async fn test_hello() {
        let result = run_python(
            python(),
            "print(\"hello\")",
            Duration::from_secs(10),
        )
        .await;
        assert_eq!(result, "hello\n");
    }

    #[tokio::test]
    async fn test_indented_code_runs() {
        let result = run_python(
            python(),
            "    x = 2 + 2\n    print(x)\n",
            Duration::from_secs(10),
        )
        .await;
        assert_eq!(result, "4\n");
    }

    #[tokio::test]
    async fn test_stdout_before_stderr() {
        let result = run_python(
            python(),
            "print(\"out\")\nraise RuntimeError(\"boom\")\n",
            Duration::from_secs(10),
        )
        .await;
        assert!(result.starts_with("out\n"));
        assert!(result.contains("RuntimeError: boom"));
    }

    #[tokio::test]
    async fn test_timeout() {
        let result = run_python(
            python(),
            "import time\ntime.sleep(5)\n",
            Duration::from_millis(200),
        )
        .await;
        assert!(result.contains("timed out"));
    }

    #[tokio::test]
    async fn test_missing_interpreter() {
        let result = run_python(
            Path::new("definitely-not-a-python"),
            "print(1)",
            Duration::from_secs(10),
        )
        .await;
        assert!(result.starts_with("failed to spawn"));
    }
}
