use anyhow::{Context, Result};
use std::env;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Run the site build command through `sh -c` in `dir`, with `extra_path` appended to `PATH`.
///
/// A non-zero exit status is an error, so callers can refuse to deploy a broken build.
pub fn run_build(command: &str, extra_path: &str, dir: &Path) -> Result<()> {
    info!("Running build: {}", command);

    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(dir)
        .env("PATH", extend_path(env::var_os("PATH"), extra_path))
        .status()
        .with_context(|| format!("Failed to start build command: {}", command))?;

    if !status.success() {
        anyhow::bail!("Build command `{}` failed with {}", command, status);
    }

    Ok(())
}

fn extend_path(current: Option<OsString>, extra: &str) -> OsString {
    let mut path = current.unwrap_or_default();
    if !extra.is_empty() {
        if !path.is_empty() {
            path.push(":");
        }
        path.push(extra);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_path() {
        assert_eq!(
            extend_path(Some("/usr/bin".into()), "/opt/homebrew/bin"),
            OsString::from("/usr/bin:/opt/homebrew/bin")
        );
        assert_eq!(
            extend_path(None, "/opt/homebrew/bin"),
            OsString::from("/opt/homebrew/bin")
        );
        assert_eq!(extend_path(Some("/usr/bin".into()), ""), OsString::from("/usr/bin"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_build_status() {
        let dir = tempfile::tempdir().unwrap();

        run_build("echo built > out.txt", "", dir.path()).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("out.txt")).unwrap(),
            "built\n"
        );

        let err = run_build("exit 3", "", dir.path()).unwrap_err();
        assert!(err.to_string().contains("exit 3"));
    }
}
