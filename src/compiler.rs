//! glslc invocation
//!
//! Runs the external shader compiler once per output mode and captures its
//! stdout. The [`Compiler`] trait is the seam that lets the corpus
//! orchestration run against a fake in tests instead of spawning processes.

use anyhow::Context;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Which encoding to request from glslc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpirvMode {
    /// Compiled SPIR-V as comma-separated numeric words (`-c -mfmt=num`)
    Binary,
    /// Human-readable SPIR-V assembly (`-S`)
    Assembly,
}

/// A failed compiler invocation. Fatal for the whole run.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The compiler process could not be started
    #[error("failed to launch '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The compiler ran but exited non-zero
    #[error("'{command}' {status}:\n{stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The compiler wrote something other than text to stdout
    #[error("'{command}' produced non-UTF-8 output")]
    BadOutput { command: String },
}

/// Compiles one shader variant into the requested encoding.
pub trait Compiler {
    /// Compile the source with the given `-D` flags, returning captured
    /// stdout.
    fn compile(&self, defines: &[String], mode: SpirvMode) -> Result<String, InvocationError>;
}

/// The real glslc subprocess driver.
///
/// Shader stage is fixed to compute; optimization (`-O`) is on unless
/// disabled. `extra_args` are passed through verbatim before the defines.
pub struct Glslc {
    pub glslc: PathBuf,
    pub source: PathBuf,
    pub optimize: bool,
    pub extra_args: Vec<String>,
    pub verbose: bool,
}

impl Glslc {
    pub fn new(glslc: PathBuf, source: PathBuf) -> Self {
        Self {
            glslc,
            source,
            optimize: true,
            extra_args: Vec::new(),
            verbose: false,
        }
    }

    /// Resolve and validate the glslc executable.
    ///
    /// Accepts a concrete path or a bare name searched on `PATH`; the
    /// result must exist and be executable. Called before any enumeration
    /// so a bad compiler path fails the run up front.
    pub fn locate(glslc: &Path) -> anyhow::Result<PathBuf> {
        which::which(glslc)
            .with_context(|| format!("invalid glslc executable: {}", glslc.display()))
    }

    /// Argument vector for one invocation, in the order glslc expects:
    /// mode, optimization, stage, (binary only) numeric format, source,
    /// stdout output, pass-through args, then the combination's defines.
    fn build_args(&self, defines: &[String], mode: SpirvMode) -> Vec<String> {
        let mut args = Vec::new();
        match mode {
            SpirvMode::Binary => args.push("-c".to_string()),
            SpirvMode::Assembly => args.push("-S".to_string()),
        }
        if self.optimize {
            args.push("-O".to_string());
        }
        args.push("-fshader-stage=compute".to_string());
        if mode == SpirvMode::Binary {
            args.push("-mfmt=num".to_string());
        }
        args.push(self.source.display().to_string());
        args.push("-o".to_string());
        args.push("-".to_string());
        args.extend(self.extra_args.iter().cloned());
        args.extend(defines.iter().cloned());
        args
    }
}

impl Compiler for Glslc {
    fn compile(&self, defines: &[String], mode: SpirvMode) -> Result<String, InvocationError> {
        let args = self.build_args(defines, mode);
        let command = render_command(&self.glslc, &args);

        if self.verbose {
            println!("glslc command: '{command}'");
        }

        let output = Command::new(&self.glslc)
            .args(&args)
            .output()
            .map_err(|source| InvocationError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(InvocationError::Failed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| InvocationError::BadOutput { command })
    }
}

/// Full command line for diagnostics and error reporting.
fn render_command(program: &Path, args: &[String]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(args.iter().cloned());
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glslc() -> Glslc {
        Glslc::new(PathBuf::from("/opt/bin/glslc"), PathBuf::from("shader.comp"))
    }

    #[test]
    fn test_binary_args() {
        let args = glslc().build_args(&["-DFOO=1".to_string()], SpirvMode::Binary);
        assert_eq!(
            args,
            [
                "-c",
                "-O",
                "-fshader-stage=compute",
                "-mfmt=num",
                "shader.comp",
                "-o",
                "-",
                "-DFOO=1"
            ]
        );
    }

    #[test]
    fn test_assembly_args() {
        let args = glslc().build_args(&["-DFOO=1".to_string()], SpirvMode::Assembly);
        assert_eq!(
            args,
            ["-S", "-O", "-fshader-stage=compute", "shader.comp", "-o", "-", "-DFOO=1"]
        );
    }

    #[test]
    fn test_no_opt_and_extra_args_ordering() {
        let mut compiler = glslc();
        compiler.optimize = false;
        compiler.extra_args = vec!["--target-env=vulkan1.1".to_string()];

        let args = compiler.build_args(&["-DA=1".to_string(), "-DB=2".to_string()], SpirvMode::Binary);
        assert_eq!(
            args,
            [
                "-c",
                "-fshader-stage=compute",
                "-mfmt=num",
                "shader.comp",
                "-o",
                "-",
                "--target-env=vulkan1.1",
                "-DA=1",
                "-DB=2"
            ]
        );
    }

    #[test]
    fn test_locate_rejects_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("glslc");

        let err = Glslc::locate(&missing).unwrap_err();
        assert!(err.to_string().contains("invalid glslc executable"));
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_accepts_executable_file() {
        let dir = tempfile::tempdir().unwrap();
        let fake = fake_glslc(dir.path(), "#!/bin/sh\n");

        let found = Glslc::locate(&fake).unwrap();
        assert_eq!(found.file_name(), Some(std::ffi::OsStr::new("glslc")));
    }

    #[test]
    fn test_spawn_failure_reports_command() {
        let compiler = Glslc::new(
            PathBuf::from("/nonexistent/glslc"),
            PathBuf::from("shader.comp"),
        );
        let err = compiler.compile(&[], SpirvMode::Binary).unwrap_err();
        match err {
            InvocationError::Spawn { command, .. } => {
                assert!(command.starts_with("/nonexistent/glslc -c"));
            }
            other => panic!("expected spawn error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    fn fake_glslc(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("glslc");
        std::fs::write(&path, script).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let fake = fake_glslc(dir.path(), "#!/bin/sh\nprintf '0x07230203,'\n");

        let compiler = Glslc::new(fake, PathBuf::from("shader.comp"));
        let out = compiler.compile(&[], SpirvMode::Binary).unwrap();
        assert_eq!(out, "0x07230203,");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let fake = fake_glslc(dir.path(), "#!/bin/sh\necho 'error: bad shader' >&2\nexit 1\n");

        let compiler = Glslc::new(fake, PathBuf::from("shader.comp"));
        let err = compiler.compile(&[], SpirvMode::Assembly).unwrap_err();
        match err {
            InvocationError::Failed { stderr, command, .. } => {
                assert!(stderr.contains("error: bad shader"));
                assert!(command.contains("-S"));
            }
            other => panic!("expected failed invocation, got {other:?}"),
        }
    }
}
