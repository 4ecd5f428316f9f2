use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Clipboard commands tried in order; the first one that runs wins.
const CANDIDATES: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
];

/// Copy `text` to the system clipboard.
pub fn copy(text: &str) -> Result<()> {
    for (program, args) in CANDIDATES {
        match pipe_to(program, args, text) {
            Ok(()) => {
                log::debug!("Copied {} bytes to the clipboard with {program}", text.len());
                return Ok(());
            }
            Err(e) => log::trace!("clipboard command {program} unavailable: {e:#}"),
        }
    }

    Err(anyhow!(
        "no clipboard command found (tried {})",
        CANDIDATES
            .iter()
            .map(|(program, _)| *program)
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;

    {
        let stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| anyhow!("{program} has no stdin"))?;
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("failed to write to {program}"))?;
    }
    // Close stdin so the command sees EOF.
    drop(child.stdin.take());

    let status = child
        .wait()
        .with_context(|| format!("failed to wait for {program}"))?;
    if !status.success() {
        return Err(anyhow!("{program} exited with {status}"));
    }

    Ok(())
}
