use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;

use crate::assemble::SUCCESS_MARKER;

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u128,
    pub timed_out: bool,
}

impl RunOutcome {
    /// Exit codes are unreliable across engine builds; the marker printed by
    /// the export epilogue is the only trusted signal.
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.stdout.contains(SUCCESS_MARKER)
    }
}

/// Resolve the configured engine interpreter. Paths are checked for plain
/// existence; a bare binary name is looked up on PATH.
pub fn resolve_engine(configured: &str) -> Option<PathBuf> {
    let path = Path::new(configured);
    if path.is_absolute() || path.components().count() > 1 {
        return path.exists().then(|| path.to_path_buf());
    }
    which::which(configured).ok()
}

/// Run `interpreter <script>` headless and capture everything it says.
///
/// The script path is the sole argument, matching how the FreeCAD-bundled
/// Python is invoked. Past `limit` the child is killed and the outcome is
/// flagged timed out rather than surfaced as an error, so the caller can
/// report it like any other failed run.
pub async fn run_engine_script(
    interpreter: &Path,
    script: &Path,
    limit: Duration,
) -> Result<RunOutcome> {
    let started = Instant::now();
    let child = Command::new(interpreter)
        .arg(script)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn engine interpreter {}", interpreter.display()))?;

    match timeout(limit, child.wait_with_output()).await {
        Ok(out) => {
            let out = out.context("engine process wait failed")?;
            Ok(RunOutcome {
                status: out.status.code().unwrap_or_default(),
                stdout: String::from_utf8_lossy(&out.stdout).to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).to_string(),
                duration_ms: started.elapsed().as_millis(),
                timed_out: false,
            })
        }
        Err(_) => Ok(RunOutcome {
            status: -1,
            stdout: String::new(),
            stderr: format!("engine run exceeded the {}s limit and was killed", limit.as_secs()),
            duration_ms: started.elapsed().as_millis(),
            timed_out: true,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_does_not_resolve() {
        assert!(resolve_engine("/nonexistent/freecad/bin/python").is_none());
    }

    #[cfg(unix)]
    mod unix {
        use super::super::*;
        use std::os::unix::fs::PermissionsExt;

        fn stub_interpreter(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("engine.sh");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            let mut perm = std::fs::metadata(&path).unwrap().permissions();
            perm.set_mode(0o755);
            std::fs::set_permissions(&path, perm).unwrap();
            path
        }

        #[test]
        fn bare_name_resolves_on_path() {
            let found = resolve_engine("sh").unwrap();
            assert!(found.is_absolute());
        }

        #[tokio::test]
        async fn marker_in_stdout_means_success() {
            let dir = tempfile::tempdir().unwrap();
            let engine = stub_interpreter(dir.path(), "echo SUCCESS");
            let script = dir.path().join("s.py");
            std::fs::write(&script, "doc.recompute()\n").unwrap();

            let out = run_engine_script(&engine, &script, Duration::from_secs(5))
                .await
                .unwrap();
            assert!(out.succeeded());
            assert_eq!(out.status, 0);
        }

        #[tokio::test]
        async fn script_path_is_passed_as_sole_argument() {
            let dir = tempfile::tempdir().unwrap();
            let engine = stub_interpreter(dir.path(), "cat \"$1\"");
            let script = dir.path().join("s.py");
            std::fs::write(&script, "print('SUCCESS')\n").unwrap();

            let out = run_engine_script(&engine, &script, Duration::from_secs(5))
                .await
                .unwrap();
            assert!(out.stdout.contains("print('SUCCESS')"));
        }

        #[tokio::test]
        async fn no_objects_marker_is_not_success() {
            let dir = tempfile::tempdir().unwrap();
            let engine = stub_interpreter(dir.path(), "echo 'ERROR: No objects created'");
            let script = dir.path().join("s.py");
            std::fs::write(&script, "\n").unwrap();

            let out = run_engine_script(&engine, &script, Duration::from_secs(5))
                .await
                .unwrap();
            assert!(!out.succeeded());
        }

        #[tokio::test]
        async fn stderr_is_captured_verbatim() {
            let dir = tempfile::tempdir().unwrap();
            let engine = stub_interpreter(dir.path(), "echo 'Traceback: boom' >&2; exit 1");
            let script = dir.path().join("s.py");
            std::fs::write(&script, "\n").unwrap();

            let out = run_engine_script(&engine, &script, Duration::from_secs(5))
                .await
                .unwrap();
            assert!(!out.succeeded());
            assert!(out.stderr.contains("Traceback: boom"));
            assert_eq!(out.status, 1);
        }

        #[tokio::test]
        async fn overlong_run_is_killed_and_flagged() {
            let dir = tempfile::tempdir().unwrap();
            let engine = stub_interpreter(dir.path(), "sleep 5; echo SUCCESS");
            let script = dir.path().join("s.py");
            std::fs::write(&script, "\n").unwrap();

            let out = run_engine_script(&engine, &script, Duration::from_millis(200))
                .await
                .unwrap();
            assert!(out.timed_out);
            assert!(!out.succeeded());
        }
    }
}
