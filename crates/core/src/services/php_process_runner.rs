//! Runs composed scripts through the PHP command-line binary

use crate::{
    error::{Error, Result},
    interfaces::{RunOutput, ScriptRunner},
};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Feeds the script to `php` on stdin and captures its output
#[derive(Debug, Clone)]
pub struct PhpProcessRunner {
    binary: String,
    args: Vec<String>,
}

impl PhpProcessRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn to_shell_command(&self) -> String {
        let mut cmd = self.binary.clone();
        for arg in &self.args {
            cmd.push(' ');
            if arg.contains(' ') {
                cmd.push_str(&format!("'{arg}'"));
            } else {
                cmd.push_str(arg);
            }
        }
        cmd
    }
}

impl Default for PhpProcessRunner {
    fn default() -> Self {
        Self::new("php")
    }
}

impl ScriptRunner for PhpProcessRunner {
    fn run(&self, script: &str, working_dir: &Path) -> Result<RunOutput> {
        debug!(
            "Running `{}` in {}",
            self.to_shell_command(),
            working_dir.display()
        );

        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args)
            .current_dir(working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::RunnerError(format!("Failed to start {}: {e}", self.binary)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(script.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            let text = if stdout.is_empty() { stderr } else { stdout };
            return Ok(RunOutput::success(text));
        }

        debug!("PHP exited with {:?}", output.status.code());
        let text = [stdout, stderr]
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(RunOutput::failure(text, output.status.code()))
    }

    fn name(&self) -> &str {
        "php"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_shell_command_quotes_arguments_with_spaces() {
        let runner = PhpProcessRunner::new("php")
            .with_arg("-d")
            .with_arg("error_log=/tmp/php errors.log");
        assert_eq!(
            runner.to_shell_command(),
            "php -d 'error_log=/tmp/php errors.log'"
        );
    }

    #[test]
    fn test_missing_binary_is_runner_error() {
        let temp_dir = TempDir::new().unwrap();
        let runner = PhpProcessRunner::new("tinkersan-no-such-php-binary");
        let err = runner.run("<?php echo 1;", temp_dir.path()).unwrap_err();
        assert!(matches!(err, Error::RunnerError(_)));
    }
}
