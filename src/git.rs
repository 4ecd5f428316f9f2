use anyhow::{anyhow, Context, Result};
use std::process::Command as GitCommand;

/// Which changes to read from the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffSource {
    /// Unstaged changes in the working tree (`git diff`).
    #[default]
    WorkingTree,
    /// Changes in the index (`git diff --cached`).
    Staged,
    /// Staged changes followed by unstaged ones.
    All,
}

impl DiffSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffSource::WorkingTree => "working tree",
            DiffSource::Staged => "staged",
            DiffSource::All => "staged + working tree",
        }
    }
}

/// Run a git command and capture stdout as String.
pub fn git_output(args: &[&str]) -> Result<String> {
    let output = GitCommand::new("git")
        .args(args)
        .output()
        .with_context(|| format!("failed to run git {:?}", args))?;

    if !output.status.success() {
        return Err(anyhow!(
            "git {:?} exited with status {:?}: {}",
            args,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Get the diff text for `source`.
pub fn diff(source: DiffSource) -> Result<String> {
    log::debug!("Reading {} diff", source.as_str());

    match source {
        DiffSource::WorkingTree => git_output(&["diff"]),
        DiffSource::Staged => git_output(&["diff", "--cached"]),
        DiffSource::All => {
            let mut out = git_output(&["diff", "--cached"])?;
            let unstaged = git_output(&["diff"])?;
            if !out.is_empty() && !out.ends_with('\n') && !unstaged.is_empty() {
                out.push('\n');
            }
            out.push_str(&unstaged);
            Ok(out)
        }
    }
}
